// File: emd_test.rs
// Created: 2026-10-16
// Description: Subject-weighted EMD scores with parcel geometries read from disk

mod common;

use approx::assert_abs_diff_eq;
use ndarray::{array, concatenate, Axis};
use parcelscore::prelude::*;

use common::loader::{line_positions, random_activations, rng, write_labels};

#[test]
fn test_single_subject_equals_subject_score() {
    let dir = tempfile::tempdir().unwrap();
    write_labels(dir.path(), "sub-01", line_positions(6, 2.0).view());
    let mut rng = rng(7);
    let y_true = random_activations(&mut rng, 5, 6);
    let y_pred = random_activations(&mut rng, 5, 6);
    let subjects = vec!["sub-01"; 5];

    let dataset = emd_score_subjects(&subjects, y_true.view(), y_pred.view(), dir.path()).unwrap();
    let single = emd_score_subj(y_true.view(), y_pred.view(), dir.path(), "sub-01").unwrap();
    assert_abs_diff_eq!(dataset, single, epsilon = 1e-9);
    assert!(single > 0.0);
}

#[test]
fn test_subjects_weighted_by_row_count() {
    let dir = tempfile::tempdir().unwrap();
    write_labels(dir.path(), "a", line_positions(4, 1.0).view());
    write_labels(dir.path(), "b", line_positions(4, 10.0).view());
    let mut rng = rng(11);
    let true_a = random_activations(&mut rng, 1, 4);
    let pred_a = random_activations(&mut rng, 1, 4);
    let true_b = random_activations(&mut rng, 3, 4);
    let pred_b = random_activations(&mut rng, 3, 4);

    let score_a = emd_score_subj(true_a.view(), pred_a.view(), dir.path(), "a").unwrap();
    let score_b = emd_score_subj(true_b.view(), pred_b.view(), dir.path(), "b").unwrap();

    // rows of the two subjects interleaved: b a b b
    let y_true = concatenate![Axis(0), true_b.slice(ndarray::s![0..1, ..]), true_a, true_b.slice(ndarray::s![1.., ..])];
    let y_pred = concatenate![Axis(0), pred_b.slice(ndarray::s![0..1, ..]), pred_a, pred_b.slice(ndarray::s![1.., ..])];
    let subjects = ["b", "a", "b", "b"];
    let score = emd_score_subjects(&subjects, y_true.view(), y_pred.view(), dir.path()).unwrap();
    assert_abs_diff_eq!(score, 0.25 * score_a + 0.75 * score_b, epsilon = 1e-9);
}

#[test]
fn test_point_masses_move_by_parcel_distance() {
    let dir = tempfile::tempdir().unwrap();
    let positions = array![[0.0, 0.0, 0.0], [3.0, 4.0, 0.0], [0.0, 0.0, 12.0]];
    write_labels(dir.path(), "sub-02", positions.view());
    let y_true = array![[1.0, 0.0, 0.0], [0.0, 0.0, 2.0]];
    let y_pred = array![[0.0, 1.0, 0.0], [0.0, 0.0, 5.0]];
    let score = emd_score_subj(y_true.view(), y_pred.view(), dir.path(), "sub-02").unwrap();
    // 5.0 for the first row, identical distributions for the second
    assert_abs_diff_eq!(score, 2.5, epsilon = 1e-12);
}

#[test]
fn test_missing_label_file() {
    let dir = tempfile::tempdir().unwrap();
    write_labels(dir.path(), "present", line_positions(2, 1.0).view());
    let y = array![[1.0, 0.0], [0.0, 1.0]];
    let err = emd_score_subjects(&["present", "absent"], y.view(), y.view(), dir.path()).unwrap_err();
    match err {
        MetricError::MissingLabelFile { subject, path } => {
            assert_eq!(subject, "absent");
            assert_eq!(path, label_path(dir.path(), "absent"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_geometry_read_back_from_npz() {
    let dir = tempfile::tempdir().unwrap();
    let positions = line_positions(5, 0.5);
    write_labels(dir.path(), "sub-03", positions.view());
    let geometry = ParcelGeometry::load(label_path(dir.path(), "sub-03")).unwrap();
    assert_eq!(geometry.positions, positions);
    assert_eq!(geometry.n_parcels(), 5);
    assert_eq!(geometry.get_distance(0, 4), 2.0);
}
