// File: error.rs
// Created: 2026-10-16
// Description: Error type shared by metrics, EMD scoring and array I/O

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricError {
    /// Two sequences that must be paired element-wise have different lengths.
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Two matrices that must be paired entry-wise have different shapes.
    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("FROC is defined for binary classification only, found {n_classes} distinct label value(s)")]
    NotBinary { n_classes: usize },

    /// The four confusion counts do not add up to the number of samples.
    /// Raised for inputs that are not 0/1 encoded.
    #[error("Confusion counts sum to {counted}, expected {expected}")]
    InvariantViolation { counted: usize, expected: usize },

    #[error("Expected an array with at most 2 dimensions, found {0}")]
    Dimensionality(usize),

    #[error("Score matrix contains NaN")]
    NanScore,

    #[error("Invalid activation weight {value} at row {row}, column {col}")]
    InvalidWeight { row: usize, col: usize, value: f64 },

    #[error("Data directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Label file for subject {subject} not found: {path}")]
    MissingLabelFile { subject: String, path: PathBuf },

    #[error("Transport problem did not converge after {0} augmentations")]
    TransportDidNotConverge(usize),

    #[error("Invalid npy data: {0}")]
    Npy(String),

    #[error("Invalid npz archive: {0}")]
    Archive(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetricError>;

impl MetricError {
    pub fn shape_mismatch(left: &[usize], right: &[usize]) -> Self {
        MetricError::ShapeMismatch {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }
}
