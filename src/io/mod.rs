//! # Input and output
//! Readers for label and score matrices (.npy, .npz and tsv) and writers for
//! numpy arrays.

use std::path::Path;

use ndarray::{Array2, ArrayD, Ix2};

use crate::error::{MetricError, Result};

pub mod npy;
pub mod npz;
pub mod tsv;

/// View an array of at most two dimensions as a matrix.
/// A vector becomes a single column and a scalar a 1x1 matrix.
pub fn into_matrix(array: ArrayD<f64>) -> Result<Array2<f64>> {
    let shape = array.shape().to_vec();
    let reshaped = match shape.len() {
        2 => array.into_dimensionality::<Ix2>(),
        1 => array.into_shape((shape[0], 1)),
        0 => array.into_shape((1, 1)),
        n => return Err(MetricError::Dimensionality(n)),
    };
    reshaped.map_err(|e| MetricError::Npy(e.to_string()))
}

/// Load a matrix, choosing the reader from the file extension.
/// `.npy` and `.npz` (first array) are read as numpy files, anything else as tsv.
pub fn load_matrix<P: AsRef<Path>>(path: P, header: bool) -> Result<Array2<f64>> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("npy") => into_matrix(npy::read_npy(path)?),
        Some("npz") => into_matrix(npz::read_npz_first(path)?),
        _ => tsv::read_matrix_tsv(path, header),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    #[test]
    fn test_into_matrix() {
        let v = array![1.0, 2.0, 3.0].into_dyn();
        assert_eq!(into_matrix(v).unwrap(), array![[1.0], [2.0], [3.0]]);
        let s = ArrayD::from_elem(IxDyn(&[]), 4.0);
        assert_eq!(into_matrix(s).unwrap(), array![[4.0]]);
        let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));
        assert!(matches!(into_matrix(cube), Err(MetricError::Dimensionality(3))));
    }

    #[test]
    fn test_load_matrix_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let m = array![[0.0, 1.0], [1.0, 0.0]];
        let npy_path = dir.path().join("y_true.npy");
        npy::write_npy(&npy_path, m.view()).unwrap();
        assert_eq!(load_matrix(&npy_path, false).unwrap(), m);
        let npz_path = dir.path().join("y_true.npz");
        npz::write_npz(&npz_path, &[("arr_0", m.view().into_dyn())]).unwrap();
        assert_eq!(load_matrix(&npz_path, false).unwrap(), m);
        let tsv_path = dir.path().join("y_true.tsv");
        std::fs::write(&tsv_path, "0\t1\n1\t0\n").unwrap();
        assert_eq!(load_matrix(&tsv_path, false).unwrap(), m);
    }
}
