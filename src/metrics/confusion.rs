// File: confusion.rs
// Created: 2026-10-16
// Description: Confusion counts between a true and a predicted 0/1 signal
//
// Counting goes through two derived signals, `diff = true - pred` and
// `sum = true + pred`, and the codes are mapped to the legacy labels as:
//   diff == -1 -> false_positive
//   diff ==  1 -> true_negative
//   sum  ==  2 -> true_positive
//   sum  ==  0 -> false_negative
// Scores produced with this tool have always used that mapping, so
// `get_true_false` keeps it. `Confusion` exposes the same four buckets under
// names describing what was actually compared.

use crate::error::{MetricError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Confusion {
    /// true == 1 and pred == 1 (`sum == 2`)
    pub matched_positive: usize,
    /// true == 0 and pred == 0 (`sum == 0`)
    pub matched_negative: usize,
    /// true == 0 and pred == 1 (`diff == -1`)
    pub spurious: usize,
    /// true == 1 and pred == 0 (`diff == 1`)
    pub missed: usize,
}

impl Confusion {
    pub fn new(matched_positive: usize, matched_negative: usize, spurious: usize, missed: usize) -> Self {
        Self {
            matched_positive,
            matched_negative,
            spurious,
            missed,
        }
    }

    /// Count the four buckets of two equal-length 0/1 signals.
    ///
    /// Fails with `LengthMismatch` when the signals differ in length and with
    /// `InvariantViolation` when the buckets do not cover every sample exactly
    /// once, which happens when a signal is not 0/1 encoded.
    pub fn count(true_signal: &[f64], pred_signal: &[f64]) -> Result<Self> {
        if true_signal.len() != pred_signal.len() {
            return Err(MetricError::LengthMismatch {
                expected: true_signal.len(),
                found: pred_signal.len(),
            });
        }
        let mut confusion = Confusion::default();
        for (&t, &p) in true_signal.iter().zip(pred_signal.iter()) {
            let diff = t - p;
            let sum = t + p;
            if diff == -1.0 {
                confusion.spurious += 1;
            }
            if diff == 1.0 {
                confusion.missed += 1;
            }
            if sum == 2.0 {
                confusion.matched_positive += 1;
            }
            if sum == 0.0 {
                confusion.matched_negative += 1;
            }
        }
        confusion.ensure_total(true_signal.len())?;
        Ok(confusion)
    }

    pub fn total(&self) -> usize {
        self.matched_positive + self.matched_negative + self.spurious + self.missed
    }

    pub fn ensure_total(&self, expected: usize) -> Result<()> {
        let counted = self.total();
        if counted != expected {
            return Err(MetricError::InvariantViolation { counted, expected });
        }
        Ok(())
    }

    /// `(true_positive, true_negative, false_positive, false_negative)` in the
    /// legacy labelling.
    pub fn legacy_tuple(&self) -> (usize, usize, usize, usize) {
        (self.matched_positive, self.missed, self.spurious, self.matched_negative)
    }

    pub fn precision(&self) -> f64 {
        self.matched_positive as f64 / (self.matched_positive + self.spurious) as f64
    }

    pub fn recall(&self) -> f64 {
        self.matched_positive as f64 / (self.matched_positive + self.missed) as f64
    }

    pub fn accuracy(&self) -> f64 {
        (self.matched_positive + self.matched_negative) as f64 / self.total() as f64
    }

    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        2.0 * (precision * recall) / (precision + recall)
    }
}

/// Confusion counts of a true and a predicted 0/1 signal.
///
/// Returns `(true_positive, true_negative, false_positive, false_negative)`
/// using the `diff`/`sum` mapping described at the top of this file.
pub fn get_true_false(true_signal: &[f64], pred_signal: &[f64]) -> Result<(usize, usize, usize, usize)> {
    Confusion::count(true_signal, pred_signal).map(|c| c.legacy_tuple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_legacy_mapping() {
        let truth = [1.0, 1.0, 0.0, 0.0, 1.0];
        let pred = [1.0, 0.0, 1.0, 0.0, 1.0];
        // sum==2: idx 0,4; diff==1: idx 1; diff==-1: idx 2; sum==0: idx 3
        assert_eq!(get_true_false(&truth, &pred).unwrap(), (2, 1, 1, 1));
    }

    #[test]
    fn test_counts_cover_every_sample() {
        let mut rng = rand::thread_rng();
        for len in [0usize, 1, 7, 64, 513] {
            let truth: Vec<f64> = (0..len).map(|_| rng.gen_range(0..2) as f64).collect();
            let pred: Vec<f64> = (0..len).map(|_| rng.gen_range(0..2) as f64).collect();
            let (tp, tn, fp, fn_) = get_true_false(&truth, &pred).unwrap();
            assert_eq!(tp + tn + fp + fn_, len);
        }
        let zeros = vec![0.0; 10];
        let ones = vec![1.0; 10];
        for (a, b) in [(&zeros, &zeros), (&ones, &ones), (&zeros, &ones), (&ones, &zeros)] {
            let (tp, tn, fp, fn_) = get_true_false(a, b).unwrap();
            assert_eq!(tp + tn + fp + fn_, 10);
        }
    }

    #[test]
    fn test_all_correct() {
        let truth = [1.0, 0.0, 0.0, 1.0, 0.0];
        let c = Confusion::count(&truth, &truth).unwrap();
        assert_eq!(c.spurious, 0);
        assert_eq!(c.missed, 0);
        assert_eq!(c.matched_positive, 2);
        assert_eq!(c.matched_negative, 3);
    }

    #[test]
    fn test_all_incorrect() {
        let truth = [1.0, 0.0, 0.0, 1.0, 0.0];
        let pred: Vec<f64> = truth.iter().map(|t| 1.0 - t).collect();
        let c = Confusion::count(&truth, &pred).unwrap();
        assert_eq!(c.matched_positive, 0);
        assert_eq!(c.matched_negative, 0);
        assert_eq!(c.spurious, 3);
        assert_eq!(c.missed, 2);
    }

    #[test]
    fn test_length_mismatch() {
        let err = get_true_false(&[0.0, 1.0], &[0.0]).unwrap_err();
        assert!(matches!(err, MetricError::LengthMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_non_binary_violates_invariant() {
        // 1.5 vs 0.5 hits both diff==1 and sum==2
        let err = get_true_false(&[1.5, 0.0], &[0.5, 0.0]).unwrap_err();
        assert!(matches!(err, MetricError::InvariantViolation { counted: 3, expected: 2 }));
        // 3 vs 0 hits no code at all
        let err = get_true_false(&[3.0], &[0.0]).unwrap_err();
        assert!(matches!(err, MetricError::InvariantViolation { counted: 0, expected: 1 }));
    }

    #[test]
    fn test_rates() {
        let c = Confusion::new(8, 80, 2, 10);
        assert!((c.precision() - 0.8).abs() < 1e-12);
        assert!((c.recall() - 8.0 / 18.0).abs() < 1e-12);
        assert!((c.accuracy() - 0.88).abs() < 1e-12);
    }
}
