// File: scorer.rs
// Created: 2026-10-16
// Description: Named scorers for cross-validation harnesses and the CLI

use ndarray::ArrayView2;

use crate::error::Result;
use crate::metrics::auc::{afroc_score, froc_score};
use crate::metrics::multilabel::{binarize, hamming_loss, jaccard_score};

/// Decision threshold applied to raw scores by scorers that need labels.
/// Matches `decision_function(X) > 0` of the sparse regressor.
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScorerKind {
    Froc,
    Afroc,
    Jaccard,
    Hamming,
}

impl ScorerKind {
    pub const ALL: [ScorerKind; 4] = [
        ScorerKind::Froc,
        ScorerKind::Afroc,
        ScorerKind::Jaccard,
        ScorerKind::Hamming,
    ];

    pub fn get_with_str(name: &str) -> Option<Self> {
        match name {
            "froc" | "froc_score" => Some(ScorerKind::Froc),
            "afroc" | "afroc_score" => Some(ScorerKind::Afroc),
            "jaccard" | "jaccard_score" => Some(ScorerKind::Jaccard),
            "hamming" | "hamming_loss" => Some(ScorerKind::Hamming),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            ScorerKind::Froc => "froc_score".to_string(),
            ScorerKind::Afroc => "afroc_score".to_string(),
            ScorerKind::Jaccard => "jaccard".to_string(),
            ScorerKind::Hamming => "hamming_loss".to_string(),
        }
    }

    pub fn greater_is_better(&self) -> bool {
        !matches!(self, ScorerKind::Hamming)
    }

    /// Whether the scorer consumes raw scores instead of thresholded labels
    pub fn needs_threshold(&self) -> bool {
        matches!(self, ScorerKind::Froc | ScorerKind::Afroc)
    }

    /// Score raw predictions. Scorers working on labels binarize `y_score`
    /// with `score > threshold` first.
    pub fn score(&self, y_true: ArrayView2<f64>, y_score: ArrayView2<f64>, threshold: f64) -> Result<f64> {
        match self {
            ScorerKind::Froc => froc_score(y_true, y_score),
            ScorerKind::Afroc => afroc_score(y_true, y_score),
            ScorerKind::Jaccard => {
                let y_pred = binarize(y_score, threshold);
                jaccard_score(y_true, y_pred.view())
            }
            ScorerKind::Hamming => {
                let y_pred = binarize(y_score, threshold);
                hamming_loss(y_true, y_pred.view())
            }
        }
    }
}
