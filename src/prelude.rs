// File: prelude.rs
// Created: 2026-10-16
// Description: Re-exports of the items used throughout the crate and the CLI

pub use crate::emd::{emd_score, emd_score_subj, emd_score_subjects, emd_score_subjects_with, label_path, ParcelGeometry};
pub use crate::error::MetricError;
pub use crate::io::{into_matrix, load_matrix};
pub use crate::metrics::scorer::DEFAULT_DECISION_THRESHOLD;
pub use crate::metrics::{
    afroc_score, calc_afroc, calc_froc, froc_score, get_true_false, hamming_loss, jaccard_score, Confusion,
    FrocCurve, ScorerKind,
};
pub use crate::utils::log::{log_msg, print_log_msg, DONE, FAIL, INFO, WARN};
