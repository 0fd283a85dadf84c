// File: emd.rs
// Created: 2026-10-16
// Description: Workflow printing the subject-weighted EMD score of a prediction

use crate::cli::workflows::{exit_on_error, load_subjects, require, require_dir, resolve_data_dir, set_thread_pool};
use crate::cli::{AppArgs, CommonArgs};
use crate::error::Result;
use crate::prelude::*;

pub const HELP_EMD: &str = "\
usage: parcelscore emd -t <i:Y_TRUE> -p <i:Y_PRED> --subjects <i:TSV> -d <i:DATA_DIR> [OPTIONS]

input:
 -t, --true <PATH>          True activations, samples x parcels (.npy, .npz or tsv) [REQUIRED]
 -p, --pred <PATH>          Predicted activations with the same shape [REQUIRED]
 --subjects <PATH>          tsv file with the subject of every sample [REQUIRED]
 --subject-column <INT>     Column of the subject tsv [0]
 -d, --data-dir <PATH>      Directory with <subject>_labels.npz parcel positions [REQUIRED]

options:
 -c, --config <PATH>        TOML configuration file
 --threads <INT>            Number of threads [1, all cores with --headless]
 --headless                 Batch mode
 -f, --format <STR>         Output format: default or tsv [default]
 --header                   Input tsv files and tsv output have a header line
 -v, --verbose              Print progress messages
 -h, --help                 Print this help menu
";

fn run_emd(
    y_true: &Option<String>,
    y_pred: &Option<String>,
    subjects: &Option<String>,
    data_dir: Option<String>,
    column_subject: usize,
    common: &CommonArgs,
) -> Result<()> {
    let config = common.resolve()?;
    set_thread_pool(&config);
    let true_path = require(y_true, "True activation file (-t)")?;
    let pred_path = require(y_pred, "Predicted activation file (-p)")?;
    let subjects_path = require(subjects, "Subject file (--subjects)")?;
    let data_dir = require_dir(resolve_data_dir(data_dir, &config))?;

    let y_true = load_matrix(true_path, config.header)?;
    let y_pred = load_matrix(pred_path, config.header)?;
    let subjects = load_subjects(subjects_path, column_subject, &config)?;
    if config.verbose {
        let mut distinct = subjects.clone();
        distinct.sort();
        distinct.dedup();
        print_log_msg(INFO, &format!(
            "Scoring {} samples of {} subject(s) with parcels from {}",
            subjects.len(), distinct.len(), data_dir.display()
        ));
    }

    let score = crate::measure_time!(
        emd_score_subjects(&subjects, y_true.view(), y_pred.view(), &data_dir),
        config.verbose
    )?;
    match config.format.as_str() {
        "tsv" => {
            if config.header {
                println!("true\tpred\tsamples\temd_score");
            }
            println!("{}\t{}\t{}\t{:.4}", true_path, pred_path, subjects.len(), score);
        }
        _ => {
            println!("True: {}", true_path);
            println!("Prediction: {}", pred_path);
            println!("Samples: {}", subjects.len());
            println!("EMD score: {:.4}", score);
        }
    }
    Ok(())
}

// usage: parcelscore emd -t <y_true.npy> -p <y_pred.npy> --subjects <subjects.tsv> -d <data_dir>
pub fn emd(env: AppArgs) {
    match env {
        AppArgs::Emd {
            y_true,
            y_pred,
            subjects,
            data_dir,
            column_subject,
            common,
            help,
        } => {
            if help {
                eprintln!("{}", HELP_EMD);
                std::process::exit(0);
            }
            exit_on_error(run_emd(&y_true, &y_pred, &subjects, data_dir, column_subject, &common));
        }
        _ => {
            eprintln!("{}", HELP_EMD);
            std::process::exit(1);
        }
    }
}
