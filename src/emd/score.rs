// File: score.rs
// Created: 2026-10-16
// Description: EMD scores of parcel activations, per subject and over a dataset
//
// The EMD score measures how far, in space, the predicted activation lies from
// the true one. The ideal score is 0.0.

use std::path::{Path, PathBuf};

use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::emd::geometry::ParcelGeometry;
use crate::emd::transport::emd;
use crate::error::{MetricError, Result};

/// Path of the parcel geometry of `subject`: `<data_dir>/<subject>_labels.npz`
pub fn label_path(data_dir: &Path, subject: &str) -> PathBuf {
    data_dir.join(format!("{}_labels.npz", subject))
}

// Unit-mass distribution of one row. An empty row carries no localisation
// information and becomes uniform over all parcels.
fn to_distribution(row: ArrayView1<f64>, row_idx: usize) -> Result<Vec<f64>> {
    for (col, &value) in row.iter().enumerate() {
        if value.is_nan() || value < 0.0 {
            return Err(MetricError::InvalidWeight { row: row_idx, col, value });
        }
    }
    let mass: f64 = row.sum();
    if mass > 0.0 {
        Ok(row.iter().map(|v| v / mass).collect())
    } else {
        let n = row.len() as f64;
        Ok(vec![1.0 / n; row.len()])
    }
}

/// Mean EMD between true and predicted activations of the rows of one subject.
///
/// Each row is normalised to unit mass and compared with Euclidean ground
/// distance between the parcel positions of `geometry`. Zero rows give NaN.
pub fn emd_score(y_true: ArrayView2<f64>, y_pred: ArrayView2<f64>, geometry: &ParcelGeometry) -> Result<f64> {
    if y_true.shape() != y_pred.shape() {
        return Err(MetricError::shape_mismatch(y_true.shape(), y_pred.shape()));
    }
    if y_true.ncols() != geometry.n_parcels() {
        return Err(MetricError::shape_mismatch(&[y_true.ncols()], &[geometry.n_parcels()]));
    }

    let mut total = 0.0;
    for (row_idx, (t_row, p_row)) in y_true.outer_iter().zip(y_pred.outer_iter()).enumerate() {
        let supply = to_distribution(t_row, row_idx)?;
        let demand = to_distribution(p_row, row_idx)?;
        total += emd(&supply, &demand, |i, j| geometry.get_distance(i, j))?;
    }
    Ok(total / y_true.nrows() as f64)
}

/// EMD score of one subject, with the parcel geometry read from
/// `<data_dir>/<subject>_labels.npz`.
pub fn emd_score_subj(y_true: ArrayView2<f64>, y_pred: ArrayView2<f64>, data_dir: &Path, subject: &str) -> Result<f64> {
    let path = label_path(data_dir, subject);
    if !path.is_file() {
        return Err(MetricError::MissingLabelFile {
            subject: subject.to_string(),
            path,
        });
    }
    let geometry = ParcelGeometry::load(&path)?;
    emd_score(y_true, y_pred, &geometry)
}

/// EMD score over a dataset mixing several subjects.
///
/// `subjects[i]` names the subject of row `i` of `y_true` and `y_pred`. Every
/// subject is scored on its own rows with [`emd_score_subj`] and the scores
/// are combined weighted by the share of rows each subject contributes.
pub fn emd_score_subjects<S>(subjects: &[S], y_true: ArrayView2<f64>, y_pred: ArrayView2<f64>, data_dir: &Path) -> Result<f64>
where
    S: AsRef<str> + Sync,
{
    check_subject_inputs(subjects, &y_true, &y_pred)?;
    if !data_dir.is_dir() {
        return Err(MetricError::MissingDirectory(data_dir.to_path_buf()));
    }
    emd_score_subjects_with(subjects, y_true, y_pred, |subject, t, p| {
        emd_score_subj(t, p, data_dir, subject)
    })
}

fn check_subject_inputs<S>(subjects: &[S], y_true: &ArrayView2<f64>, y_pred: &ArrayView2<f64>) -> Result<()> {
    if subjects.len() != y_true.nrows() {
        return Err(MetricError::LengthMismatch {
            expected: subjects.len(),
            found: y_true.nrows(),
        });
    }
    if y_true.shape() != y_pred.shape() {
        return Err(MetricError::shape_mismatch(y_true.shape(), y_pred.shape()));
    }
    Ok(())
}

/// Row-count weighted combination of per-subject scores.
///
/// `scorer` receives a subject name and the rows of that subject. Subjects
/// are scored in parallel; the weighted sum is accumulated in sorted subject
/// order.
pub fn emd_score_subjects_with<S, F>(subjects: &[S], y_true: ArrayView2<f64>, y_pred: ArrayView2<f64>, scorer: F) -> Result<f64>
where
    S: AsRef<str> + Sync,
    F: Fn(&str, ArrayView2<f64>, ArrayView2<f64>) -> Result<f64> + Sync,
{
    check_subject_inputs(subjects, &y_true, &y_pred)?;

    let mut rows_by_subject: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for (row, subject) in subjects.iter().enumerate() {
        rows_by_subject.entry(subject.as_ref()).or_default().push(row);
    }
    let mut groups: Vec<(&str, Vec<usize>)> = rows_by_subject.into_iter().collect();
    groups.sort_by(|a, b| a.0.cmp(b.0));

    let n_rows = subjects.len() as f64;
    let weighted: Vec<f64> = groups
        .par_iter()
        .map(|(subject, rows)| -> Result<f64> {
            let t = y_true.select(Axis(0), rows);
            let p = y_pred.select(Axis(0), rows);
            let score = scorer(*subject, t.view(), p.view())?;
            Ok(score * (rows.len() as f64 / n_rows))
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(weighted.iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn line_geometry() -> ParcelGeometry {
        ParcelGeometry::new(array![[0.0], [1.0], [3.0]])
    }

    #[test]
    fn test_emd_score_perfect_prediction() {
        let y = array![[1.0, 0.0, 0.0], [0.0, 1.0, 1.0]];
        assert_eq!(emd_score(y.view(), y.view(), &line_geometry()).unwrap(), 0.0);
    }

    #[test]
    fn test_emd_score_mean_over_rows() {
        let y_true = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let y_pred = array![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0]];
        // 3.0 and 0.0
        assert_eq!(emd_score(y_true.view(), y_pred.view(), &line_geometry()).unwrap(), 1.5);
    }

    #[test]
    fn test_empty_prediction_is_uniform() {
        let y_true = array![[1.0, 0.0, 0.0]];
        let y_pred = array![[0.0, 0.0, 0.0]];
        // a third of the mass to each parcel: (0 + 1 + 3) / 3
        let score = emd_score(y_true.view(), y_pred.view(), &line_geometry()).unwrap();
        assert!((score - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_scale_free() {
        let y_true = array![[2.0, 0.0, 0.0]];
        let y_pred = array![[0.0, 0.5, 0.5]];
        let score = emd_score(y_true.view(), y_pred.view(), &line_geometry()).unwrap();
        assert!((score - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        let geometry = line_geometry();
        let y_true = array![[1.0, 0.0, 0.0]];
        let negative = array![[0.0, -1.0, 0.0]];
        assert!(matches!(
            emd_score(y_true.view(), negative.view(), &geometry),
            Err(MetricError::InvalidWeight { row: 0, col: 1, .. })
        ));
        let narrow = array![[1.0, 0.0]];
        assert!(matches!(
            emd_score(narrow.view(), narrow.view(), &geometry),
            Err(MetricError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_subject_weighting() {
        let subjects = ["b", "a", "b", "b"];
        let y = array![[1.0], [1.0], [1.0], [1.0]];
        let score = emd_score_subjects_with(&subjects, y.view(), y.view(), |subject, t, _| {
            match subject {
                "a" => {
                    assert_eq!(t.nrows(), 1);
                    Ok(2.0)
                }
                _ => {
                    assert_eq!(t.nrows(), 3);
                    Ok(6.0)
                }
            }
        })
        .unwrap();
        // 2 * 1/4 + 6 * 3/4
        assert_eq!(score, 5.0);
    }

    #[test]
    fn test_subject_length_mismatch() {
        let y = array![[1.0], [1.0]];
        let err = emd_score_subjects_with(&["a"], y.view(), y.view(), |_, _, _| Ok(0.0)).unwrap_err();
        assert!(matches!(err, MetricError::LengthMismatch { expected: 1, found: 2 }));
    }

    #[test]
    fn test_missing_data_dir() {
        let y = array![[1.0]];
        let err = emd_score_subjects(&["a"], y.view(), y.view(), Path::new("/nonexistent/parcelscore")).unwrap_err();
        assert!(matches!(err, MetricError::MissingDirectory(_)));
    }

    #[test]
    fn test_subject_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let y_true = Array2::<f64>::ones((2, 3));
        let y_pred = Array2::<f64>::ones((2, 2));
        let err = emd_score_subjects(&["a", "a"], y_true.view(), y_pred.view(), dir.path()).unwrap_err();
        assert!(matches!(err, MetricError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_zero_rows_is_nan() {
        let empty = Array2::<f64>::zeros((0, 3));
        let score = emd_score(empty.view(), empty.view(), &line_geometry()).unwrap();
        assert!(score.is_nan());
    }
}
