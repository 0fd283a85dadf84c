// File: auc.rs
// Created: 2026-10-16
// Description: Area under FROC / AFROC curves with the composite trapezoidal rule

use ndarray::ArrayView2;

use crate::error::Result;
use crate::metrics::froc::{calc_afroc, calc_froc};

/// Composite trapezoidal rule, `sum((x[i+1] - x[i]) * (y[i+1] + y[i]) / 2)`.
///
/// Points are taken in the given order; a decreasing `x` contributes negative
/// area. Fewer than two points give 0.
pub fn trapz(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(y, x)| (x[1] - x[0]) * (y[1] + y[0]) / 2.0)
        .sum()
}

/// Area under the free-response ROC curve computed from raw prediction scores.
///
/// Greater is better. The false positive axis is unbounded, so the area is
/// bounded by the number of false positives per sample at the lowest threshold.
pub fn froc_score(y_true: ArrayView2<f64>, y_score: ArrayView2<f64>) -> Result<f64> {
    let curve = calc_froc(y_true, y_score)?;
    Ok(trapz(&curve.sensitivity, &curve.fp_axis))
}

/// Area under the alternative FROC curve (true positive fraction against
/// false positive fraction).
///
/// The AFROC curve lies within the unit square, so like the area under a ROC
/// curve this area can be used as a figure of merit for FROC performance.
pub fn afroc_score(y_true: ArrayView2<f64>, y_score: ArrayView2<f64>) -> Result<f64> {
    let curve = calc_afroc(y_true, y_score)?;
    Ok(trapz(&curve.sensitivity, &curve.fp_axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_trapz() {
        assert_eq!(trapz(&[], &[]), 0.0);
        assert_eq!(trapz(&[1.0], &[3.0]), 0.0);
        assert_abs_diff_eq!(trapz(&[1.0, 2.0, 3.0], &[0.0, 1.0, 2.0]), 4.0);
        // signed accumulation when x runs backwards
        assert_abs_diff_eq!(trapz(&[1.0, 1.0], &[1.0, 0.0]), -1.0);
        assert_abs_diff_eq!(trapz(&[1.0, 1.0, 1.0], &[0.0, 2.0, 1.0]), 1.0);
    }

    #[test]
    fn test_froc_score_four_samples() {
        let y_true = array![[0.0], [0.0], [1.0], [1.0]];
        let y_score = array![[0.1], [0.4], [0.35], [0.8]];
        assert_abs_diff_eq!(froc_score(y_true.view(), y_score.view()).unwrap(), 0.375, epsilon = 1e-12);
    }

    #[test]
    fn test_afroc_score_four_samples() {
        let y_true = array![[0.0], [0.0], [1.0], [1.0]];
        let y_score = array![[0.1], [0.4], [0.35], [0.8]];
        let quarter = 1.0 - (-0.25f64).exp();
        let half = 1.0 - (-0.5f64).exp();
        let expected = quarter * 0.5 + (half - quarter) * 1.0;
        assert_abs_diff_eq!(afroc_score(y_true.view(), y_score.view()).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_input_rejected() {
        // no entries, no classes
        let y = ndarray::Array2::<f64>::zeros((0, 3));
        assert!(froc_score(y.view(), y.view()).is_err());
    }
}
