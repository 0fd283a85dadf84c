// File: multilabel.rs
// Created: 2026-10-16
// Description: Set-based multilabel metrics over sample x parcel label matrices

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{MetricError, Result};

/// 1.0 where `score > threshold`, 0.0 elsewhere
pub fn binarize(y_score: ArrayView2<f64>, threshold: f64) -> Array2<f64> {
    y_score.mapv(|s| if s > threshold { 1.0 } else { 0.0 })
}

fn check_shape(y_true: &ArrayView2<f64>, y_pred: &ArrayView2<f64>) -> Result<()> {
    if y_true.shape() != y_pred.shape() {
        return Err(MetricError::shape_mismatch(y_true.shape(), y_pred.shape()));
    }
    Ok(())
}

/// Fraction of label entries predicted wrong. Lower is better.
pub fn hamming_loss(y_true: ArrayView2<f64>, y_pred: ArrayView2<f64>) -> Result<f64> {
    check_shape(&y_true, &y_pred)?;
    let mut wrong = 0usize;
    Zip::from(&y_true).and(&y_pred).for_each(|&t, &p| {
        if (t != 0.0) != (p != 0.0) {
            wrong += 1;
        }
    });
    Ok(wrong as f64 / y_true.len() as f64)
}

/// Jaccard similarity `|T ∩ P| / |T ∪ P|` per sample, averaged over samples.
///
/// Non-zero entries are positive. A sample with neither true nor predicted
/// positives scores 0.
pub fn jaccard_score(y_true: ArrayView2<f64>, y_pred: ArrayView2<f64>) -> Result<f64> {
    check_shape(&y_true, &y_pred)?;
    let mut total = 0.0;
    for (t_row, p_row) in y_true.outer_iter().zip(y_pred.outer_iter()) {
        let mut intersection = 0usize;
        let mut union = 0usize;
        for (&t, &p) in t_row.iter().zip(p_row.iter()) {
            let (t, p) = (t != 0.0, p != 0.0);
            if t && p {
                intersection += 1;
            }
            if t || p {
                union += 1;
            }
        }
        if union > 0 {
            total += intersection as f64 / union as f64;
        }
    }
    Ok(total / y_true.nrows() as f64)
}
