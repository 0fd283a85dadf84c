// File: score.rs
// Created: 2026-10-16
// Description: Workflow printing every configured metric of one prediction
// The raw scores are thresholded for label based metrics and the confusion
// counts at that threshold are printed alongside.

use std::path::PathBuf;

use ndarray::ArrayView2;

use crate::cli::config::EvalConfig;
use crate::cli::workflows::{exit_on_error, load_subjects, require, require_dir, resolve_data_dir, set_thread_pool};
use crate::cli::{AppArgs, CommonArgs};
use crate::error::Result;
use crate::prelude::*;

pub const HELP_SCORE: &str = "\
usage: parcelscore score -t <i:Y_TRUE> -s <i:Y_SCORE> [OPTIONS]

input:
 -t, --true <PATH>          True labels, samples x parcels (.npy, .npz or tsv) [REQUIRED]
 -s, --score <PATH>         Raw prediction scores with the same shape [REQUIRED]
 --subjects <PATH>          tsv file with the subject of every sample; enables the EMD score
 --subject-column <INT>     Column of the subject tsv [0]
 -d, --data-dir <PATH>      Directory with <subject>_labels.npz parcel positions

options:
 -c, --config <PATH>        TOML configuration file
 --threshold <FLOAT>        Decision threshold for label based metrics [0.0]
 --threads <INT>            Number of threads [1, all cores with --headless]
 --headless                 Batch mode
 -f, --format <STR>         Output format: default or tsv [default]
 --header                   Input tsv files and tsv output have a header line
 -v, --verbose              Print progress messages
 -h, --help                 Print this help menu
";

#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub scores: Vec<(String, f64)>,
    pub confusion: Option<Confusion>,
    pub threshold: f64,
}

/// Every metric of `config`, the confusion at the decision threshold and,
/// when subjects are given, the EMD of the thresholded prediction.
pub fn compute_scores(
    y_true: ArrayView2<f64>,
    y_score: ArrayView2<f64>,
    subjects: Option<(&[String], PathBuf)>,
    config: &EvalConfig,
) -> Result<ScoreReport> {
    let mut scores = Vec::with_capacity(config.metrics.len() + 1);
    for metric in &config.metrics {
        let value = crate::measure_time!(metric.score(y_true, y_score, config.threshold), config.verbose)?;
        scores.push((metric.to_string(), value));
    }

    let y_pred = crate::metrics::binarize(y_score, config.threshold);
    let confusion = match (y_true.as_slice(), y_pred.as_slice()) {
        (Some(t), Some(p)) => Confusion::count(t, p).ok(),
        _ => {
            let t: Vec<f64> = y_true.iter().cloned().collect();
            let p: Vec<f64> = y_pred.iter().cloned().collect();
            Confusion::count(&t, &p).ok()
        }
    };
    if confusion.is_none() && config.verbose {
        print_log_msg(WARN, "True labels are not 0/1 encoded; skipping confusion counts");
    }

    if let Some((subjects, data_dir)) = subjects {
        let value = crate::measure_time!(
            emd_score_subjects(subjects, y_true, y_pred.view(), &data_dir),
            config.verbose
        )?;
        scores.push(("emd_score".to_string(), value));
    }

    Ok(ScoreReport {
        scores,
        confusion,
        threshold: config.threshold,
    })
}

pub fn format_report(report: &ScoreReport, format: &str, header: bool) -> String {
    let mut out = String::new();
    match format {
        "tsv" => {
            let mut names: Vec<String> = report.scores.iter().map(|(name, _)| name.clone()).collect();
            let mut values: Vec<String> = report.scores.iter().map(|(_, v)| format!("{:.4}", v)).collect();
            if let Some(c) = &report.confusion {
                names.extend(["threshold", "tp", "tn", "fp", "fn", "precision", "recall", "f1_score"].map(String::from));
                values.extend([
                    format!("{}", report.threshold),
                    c.matched_positive.to_string(),
                    c.matched_negative.to_string(),
                    c.spurious.to_string(),
                    c.missed.to_string(),
                    format!("{:.4}", c.precision()),
                    format!("{:.4}", c.recall()),
                    format!("{:.4}", c.f1_score()),
                ]);
            }
            if header {
                out.push_str(&names.join("\t"));
                out.push('\n');
            }
            out.push_str(&values.join("\t"));
            out.push('\n');
        }
        _ => {
            for (name, value) in &report.scores {
                out.push_str(&format!("{}: {:.4}\n", name, value));
            }
            if let Some(c) = &report.confusion {
                out.push_str(&format!("Threshold: {}\n", report.threshold));
                out.push_str(&format!("TP: {}\n", c.matched_positive));
                out.push_str(&format!("TN: {}\n", c.matched_negative));
                out.push_str(&format!("FP: {}\n", c.spurious));
                out.push_str(&format!("FN: {}\n", c.missed));
                // Print float with 4 decimal places
                out.push_str(&format!("Precision: {:.4}\n", c.precision()));
                out.push_str(&format!("Recall: {:.4}\n", c.recall()));
                out.push_str(&format!("F1 score: {:.4}\n", c.f1_score()));
            }
        }
    }
    out
}

fn run_score(
    y_true: &Option<String>,
    y_score: &Option<String>,
    subjects: &Option<String>,
    data_dir: Option<String>,
    column_subject: usize,
    common: &CommonArgs,
) -> Result<()> {
    let config = common.resolve()?;
    set_thread_pool(&config);
    let true_path = require(y_true, "True label file (-t)")?;
    let score_path = require(y_score, "Score file (-s)")?;
    if config.verbose {
        print_log_msg(INFO, &format!("Scoring {} against {}", score_path, true_path));
    }
    let y_true = load_matrix(true_path, config.header)?;
    let y_score = load_matrix(score_path, config.header)?;

    let subject_list = match subjects {
        Some(path) => Some(load_subjects(path, column_subject, &config)?),
        None => None,
    };
    let subjects = match &subject_list {
        Some(list) => Some((list.as_slice(), require_dir(resolve_data_dir(data_dir, &config))?)),
        None => None,
    };

    let report = compute_scores(y_true.view(), y_score.view(), subjects, &config)?;
    print!("{}", format_report(&report, &config.format, config.header));
    if config.verbose {
        print_log_msg(DONE, "Scoring finished");
    }
    Ok(())
}

// usage: parcelscore score -t <y_true.npy> -s <y_score.npy> -f tsv
// usage: parcelscore score -t <y_true.npy> -s <y_score.npy> --subjects <subjects.tsv> -d <data_dir>
pub fn score(env: AppArgs) {
    match env {
        AppArgs::Score {
            y_true,
            y_score,
            subjects,
            data_dir,
            column_subject,
            common,
            help,
        } => {
            if help {
                eprintln!("{}", HELP_SCORE);
                std::process::exit(0);
            }
            exit_on_error(run_score(&y_true, &y_score, &subjects, data_dir, column_subject, &common));
        }
        _ => {
            eprintln!("{}", HELP_SCORE);
            std::process::exit(1);
        }
    }
}
