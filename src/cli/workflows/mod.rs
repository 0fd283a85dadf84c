// File: mod.rs
// Created: 2026-10-16
// Description: Workflows behind the subcommands of the CLI

//! # Workflows
//! `score` prints every configured metric for one prediction, `curve` exports
//! the FROC or AFROC curve and `emd` prints the subject-weighted EMD score.

pub mod curve;
pub mod emd;
pub mod score;

use std::path::{Path, PathBuf};

use crate::cli::config::EvalConfig;
use crate::error::{MetricError, Result};
use crate::io::tsv::read_one_column_of_tsv_as_vec;
use crate::utils::log::{log_msg, print_log_msg, FAIL, INFO, WARN};

/// Size the global rayon pool from the configuration
pub fn set_thread_pool(config: &EvalConfig) {
    let threads = config.num_threads();
    if config.verbose {
        print_log_msg(INFO, &format!("Using {} thread(s)", threads));
    }
    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        print_log_msg(WARN, &format!("Thread pool already initialized: {}", e));
    }
}

/// Subject of every row, read from one column of a tsv file
pub fn load_subjects(path: &str, column: usize, config: &EvalConfig) -> Result<Vec<String>> {
    read_one_column_of_tsv_as_vec(path, column, config.header)
}

/// Data directory from the command line, falling back to the config file
pub fn resolve_data_dir(data_dir: Option<String>, config: &EvalConfig) -> Option<PathBuf> {
    data_dir.or_else(|| config.data_dir.clone()).map(PathBuf::from)
}

pub fn require<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| MetricError::Config(format!("{} must be provided", what)))
}

pub fn require_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = data_dir.ok_or_else(|| MetricError::Config("data directory must be provided".to_string()))?;
    if !Path::new(&dir).is_dir() {
        return Err(MetricError::MissingDirectory(dir));
    }
    Ok(dir)
}

/// Report a failed workflow and exit with status 1
pub fn exit_on_error(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("{}", log_msg(FAIL, &e.to_string()));
        std::process::exit(1);
    }
}
