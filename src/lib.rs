//! # About project
//!
//! Parcelscore evaluates source localisation of MEG/EEG inverse solutions.
//! Predictions over brain parcels are scored against the true active parcels
//! with detection metrics (FROC and AFROC curves and their areas) and with a
//! spatial metric, the earth mover's distance between true and predicted
//! activations on the parcel positions of each subject.

pub mod cli;
pub mod emd;
pub mod error;
pub mod io;
pub mod metrics;
pub mod prelude;
pub mod utils;
