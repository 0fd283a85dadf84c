// File: froc.rs
// Created: 2026-10-16
// Description: Free-response ROC (FROC) and alternative FROC (AFROC) curves
//
// References
//   http://www.devchakraborty.com/Receiver%20operating%20characteristic.pdf
//   https://www.ncbi.nlm.nih.gov/pmc/articles/PMC3679336/pdf/nihms458993.pdf

use ndarray::ArrayView2;

use crate::error::{MetricError, Result};
use crate::metrics::confusion::Confusion;

/// Points of a FROC or AFROC curve.
///
/// The three vectors are parallel and ordered by decreasing threshold:
/// the first point classifies only the highest scores as positive, the last
/// one classifies every entry as positive. Both axes are non-decreasing along
/// the vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct FrocCurve {
    /// True positives normalized by the number of positive labels
    pub sensitivity: Vec<f64>,
    /// Horizontal axis. Holds false positives per sample after `calc_froc`
    /// and the false positive fraction in [0, 1] after `calc_afroc`.
    pub fp_axis: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl FrocCurve {
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Map false positives per sample `x` to the false positive fraction
    /// `1 - e^(-x)`, assuming false positives arrive as a Poisson process.
    pub fn into_afroc(mut self) -> Self {
        self.fp_axis.iter_mut().for_each(|x| *x = 1.0 - (-*x).exp());
        self
    }

    /// (threshold, fp axis, sensitivity) per point
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.thresholds
            .iter()
            .zip(self.fp_axis.iter())
            .zip(self.sensitivity.iter())
            .map(|((&t, &fp), &s)| (t, fp, s))
    }
}

/// Sorted distinct values
pub(crate) fn unique_sorted<I: IntoIterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut values: Vec<f64> = values.into_iter().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup_by(|a, b| a == b);
    values
}

/// Compute the free-response receiver operating characteristic curve.
///
/// Restricted to binary classification: `y_true` must hold exactly two
/// distinct values, the higher one being the positive class.
///
/// # Arguments
/// * `y_true` - true labels, shape = [n_samples x n_sources]
/// * `y_score` - target scores (probability estimates or raw confidence values), same shape
///
/// Every distinct score is a threshold. At threshold `t` the entries with
/// `score >= t` are predicted positive. Sensitivity is the number of true
/// positives over the number of positive labels; the false positive axis is
/// the number of false positives over `n_samples`, the row count and not the
/// number of entries. Zero positives or zero rows give non-finite values.
pub fn calc_froc(y_true: ArrayView2<f64>, y_score: ArrayView2<f64>) -> Result<FrocCurve> {
    if y_true.shape() != y_score.shape() {
        return Err(MetricError::shape_mismatch(y_true.shape(), y_score.shape()));
    }
    let n_samples = y_true.nrows() as f64;

    let classes = unique_sorted(y_true.iter().copied());
    if classes.len() != 2 {
        return Err(MetricError::NotBinary { n_classes: classes.len() });
    }
    let positive = classes[1];

    let truth: Vec<bool> = y_true.iter().map(|&v| v == positive).collect();
    let scores: Vec<f64> = y_score.iter().copied().collect();
    if scores.iter().any(|s| s.is_nan()) {
        return Err(MetricError::NanScore);
    }

    let n_entries = truth.len();
    let n_true_pos = truth.iter().filter(|&&t| t).count();
    let n_true_neg = n_entries - n_true_pos;
    let n_pos = n_true_pos as f64;

    // Entries by decreasing score. Lowering the threshold to the next distinct
    // score adds exactly the entries holding that score to the positive set.
    let mut order: Vec<usize> = (0..n_entries).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut curve = FrocCurve {
        sensitivity: Vec::new(),
        fp_axis: Vec::new(),
        thresholds: Vec::new(),
    };
    let mut true_pos = 0usize;
    let mut false_pos = 0usize;
    let mut i = 0usize;
    while i < n_entries {
        let threshold = scores[order[i]];
        while i < n_entries && scores[order[i]] == threshold {
            if truth[order[i]] {
                true_pos += 1;
            } else {
                false_pos += 1;
            }
            i += 1;
        }
        let confusion = Confusion::new(
            true_pos,
            n_true_neg - false_pos,
            false_pos,
            n_true_pos - true_pos,
        );
        confusion.ensure_total(n_entries)?;

        curve.sensitivity.push(confusion.matched_positive as f64 / n_pos);
        curve.fp_axis.push(confusion.spurious as f64 / n_samples);
        curve.thresholds.push(threshold);
    }
    Ok(curve)
}

/// Compute the alternative free-response receiver operating characteristic
/// curve: sensitivity against false positive fraction.
///
/// Same inputs, thresholds and sensitivity as [`calc_froc`]; false positives
/// per sample `x` become `1 - e^(-x)`, so the curve lies in the unit square.
pub fn calc_afroc(y_true: ArrayView2<f64>, y_score: ArrayView2<f64>) -> Result<FrocCurve> {
    calc_froc(y_true, y_score).map(FrocCurve::into_afroc)
}
