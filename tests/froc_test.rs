// File: froc_test.rs
// Created: 2026-10-16
// Description: FROC/AFROC curves and their areas through the public API

mod common;

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use parcelscore::metrics::trapz;
use parcelscore::prelude::*;

use common::loader::random_labels_and_scores;

#[test]
fn test_four_sample_scenario() {
    let y_true = array![[0.0], [0.0], [1.0], [1.0]];
    let y_score = array![[0.1], [0.4], [0.35], [0.8]];
    let curve = calc_froc(y_true.view(), y_score.view()).unwrap();

    let mut thresholds = curve.thresholds.clone();
    thresholds.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(thresholds, vec![0.1, 0.35, 0.4, 0.8]);
    assert_eq!(curve.sensitivity, vec![0.5, 0.5, 1.0, 1.0]);
    assert_eq!(curve.fp_axis, vec![0.0, 0.25, 0.25, 0.5]);
    assert_abs_diff_eq!(froc_score(y_true.view(), y_score.view()).unwrap(), 0.375, epsilon = 1e-12);
}

#[test]
fn test_perfect_separation() {
    let y_true = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    let y_score = array![[0.9, 0.2, 0.1], [0.3, 0.8, 0.2], [0.1, 0.05, 0.95]];
    let curve = calc_froc(y_true.view(), y_score.view()).unwrap();

    assert_eq!(*curve.sensitivity.last().unwrap(), 1.0);
    let max_fp = curve.fp_axis.iter().cloned().fold(f64::MIN, f64::max);
    assert_eq!(*curve.fp_axis.last().unwrap(), max_fp);
    // six negatives over three samples
    assert_eq!(max_fp, 2.0);
    // full sensitivity is reached before the first false positive
    let first_full = curve.sensitivity.iter().position(|&s| s == 1.0).unwrap();
    assert_eq!(curve.fp_axis[first_full], 0.0);
}

#[test]
fn test_afroc_score_matches_direct_integration() {
    for seed in 0..5 {
        let (y_true, y_score) = random_labels_and_scores(seed, 12, 7);
        let froc = calc_froc(y_true.view(), y_score.view()).unwrap();
        let mapped: Vec<f64> = froc.fp_axis.iter().map(|x| 1.0 - (-x).exp()).collect();
        let expected = trapz(&froc.sensitivity, &mapped);
        let score = afroc_score(y_true.view(), y_score.view()).unwrap();
        assert_abs_diff_eq!(score, expected, epsilon = 1e-12);
        assert!(score >= 0.0 && score <= 1.0);
    }
}

#[test]
fn test_curve_matches_thresholded_confusion() {
    let (y_true, y_score) = random_labels_and_scores(42, 15, 6);
    let curve = calc_froc(y_true.view(), y_score.view()).unwrap();
    let flat_true: Vec<f64> = y_true.iter().cloned().collect();
    let n_pos = flat_true.iter().filter(|&&t| t == 1.0).count() as f64;

    for (threshold, fp, sensitivity) in curve.points() {
        let pred: Vec<f64> = y_score.iter().map(|&s| if s >= threshold { 1.0 } else { 0.0 }).collect();
        let confusion = Confusion::count(&flat_true, &pred).unwrap();
        assert_abs_diff_eq!(sensitivity, confusion.matched_positive as f64 / n_pos, epsilon = 1e-12);
        assert_abs_diff_eq!(fp, confusion.spurious as f64 / y_true.nrows() as f64, epsilon = 1e-12);
    }
}

#[test]
fn test_single_class_is_rejected() {
    let y_true = Array2::<f64>::zeros((3, 2));
    let y_score = array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]];
    assert!(matches!(
        calc_froc(y_true.view(), y_score.view()),
        Err(MetricError::NotBinary { n_classes: 1 })
    ));
}

#[test]
fn test_get_true_false_invariants() {
    let truth = [1.0, 0.0, 1.0, 0.0, 0.0];
    let (tp, tn, fp, fn_) = get_true_false(&truth, &truth).unwrap();
    assert_eq!(tp + tn + fp + fn_, truth.len());
    let inverted: Vec<f64> = truth.iter().map(|t| 1.0 - t).collect();
    let wrong = Confusion::count(&truth, &inverted).unwrap();
    assert_eq!(wrong.matched_positive, 0);
    assert_eq!(wrong.matched_negative, 0);
    assert_eq!(wrong.spurious + wrong.missed, truth.len());
}
