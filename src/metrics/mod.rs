//! # Metrics
//! Detection-theoretic scoring of parcel predictions: confusion counts,
//! FROC/AFROC curves and their areas, multilabel set metrics, and the named
//! scorer registry.

pub mod auc;
pub mod confusion;
pub mod froc;
pub mod multilabel;
pub mod scorer;

pub use auc::{afroc_score, froc_score, trapz};
pub use confusion::{get_true_false, Confusion};
pub use froc::{calc_afroc, calc_froc, FrocCurve};
pub use multilabel::{binarize, hamming_loss, jaccard_score};
pub use scorer::ScorerKind;
