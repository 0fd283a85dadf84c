//! # Spatial scoring
//! Earth mover's distance between true and predicted parcel activations,
//! per subject and aggregated over a dataset of several subjects.

pub mod geometry;
pub mod score;
pub mod transport;

pub use geometry::ParcelGeometry;
pub use score::{emd_score, emd_score_subj, emd_score_subjects, emd_score_subjects_with, label_path};
