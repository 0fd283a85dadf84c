// File: curve.rs
// Created: 2026-10-16
// Description: Workflow exporting the FROC or AFROC curve of a prediction as tsv

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::cli::workflows::{exit_on_error, require, set_thread_pool};
use crate::cli::{AppArgs, CommonArgs};
use crate::error::Result;
use crate::prelude::*;

pub const HELP_CURVE: &str = "\
usage: parcelscore curve -t <i:Y_TRUE> -s <i:Y_SCORE> [OPTIONS]

input/output:
 -t, --true <PATH>          True labels, samples x parcels (.npy, .npz or tsv) [REQUIRED]
 -s, --score <PATH>         Raw prediction scores with the same shape [REQUIRED]
 -o, --output <PATH>        Output tsv path [stdout]

options:
 --afroc                    Export the AFROC curve instead of the FROC curve
 -c, --config <PATH>        TOML configuration file
 --header                   Input tsv files have a header line; print column names
 -v, --verbose              Print progress messages
 -h, --help                 Print this help menu
";

/// One line per operating point, from the strictest threshold to the loosest
pub fn write_curve<W: Write>(writer: &mut W, curve: &FrocCurve, afroc: bool, header: bool) -> Result<()> {
    if header {
        let fp_name = if afroc { "afroc_fp" } else { "fp_per_sample" };
        writeln!(writer, "threshold\t{}\tsensitivity", fp_name)?;
    }
    for (threshold, fp, sensitivity) in curve.points() {
        writeln!(writer, "{}\t{:.6}\t{:.6}", threshold, fp, sensitivity)?;
    }
    Ok(())
}

fn run_curve(
    y_true: &Option<String>,
    y_score: &Option<String>,
    afroc: bool,
    output: &Option<String>,
    common: &CommonArgs,
) -> Result<()> {
    let config = common.resolve()?;
    set_thread_pool(&config);
    let true_path = require(y_true, "True label file (-t)")?;
    let score_path = require(y_score, "Score file (-s)")?;
    let y_true = load_matrix(true_path, config.header)?;
    let y_score = load_matrix(score_path, config.header)?;

    let curve = if afroc {
        crate::measure_time!(calc_afroc(y_true.view(), y_score.view()), config.verbose)?
    } else {
        crate::measure_time!(calc_froc(y_true.view(), y_score.view()), config.verbose)?
    };
    if config.verbose {
        print_log_msg(INFO, &format!("{} operating points", curve.len()));
    }

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_curve(&mut writer, &curve, afroc, config.header)?;
            writer.flush()?;
            if config.verbose {
                print_log_msg(DONE, &format!("Curve written to {}", path));
            }
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_curve(&mut writer, &curve, afroc, config.header)?;
            writer.flush()?;
        }
    }
    Ok(())
}

// usage: parcelscore curve -t <y_true.npy> -s <y_score.npy> --afroc -o afroc.tsv
pub fn curve(env: AppArgs) {
    match env {
        AppArgs::Curve {
            y_true,
            y_score,
            afroc,
            output,
            common,
            help,
        } => {
            if help {
                eprintln!("{}", HELP_CURVE);
                std::process::exit(0);
            }
            exit_on_error(run_curve(&y_true, &y_score, afroc, &output, &common));
        }
        _ => {
            eprintln!("{}", HELP_CURVE);
            std::process::exit(1);
        }
    }
}
