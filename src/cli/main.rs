// File: main.rs
// Created: 2026-10-16
// Description: Entry point of the parcelscore CLI

use parcelscore::cli::workflows::curve::{curve, HELP_CURVE};
use parcelscore::cli::workflows::emd::{emd, HELP_EMD};
use parcelscore::cli::workflows::score::{score, HELP_SCORE};
use parcelscore::cli::*;
use parcelscore::utils::log::{print_log_msg, FAIL};

const HELP: &str = "\
usage: parcelscore <SUBCOMMAND> [OPTIONS]

subcommands:
  score     Print FROC/AFROC areas, set metrics and optionally the EMD score
  curve     Export the FROC or AFROC curve as tsv
  emd       Print the subject-weighted earth mover's distance score

options:
  -h, --help                 Print this help menu
";

fn parse_common(args: &mut pico_args::Arguments) -> Result<CommonArgs, pico_args::Error> {
    Ok(CommonArgs {
        config: args.opt_value_from_str(["-c", "--config"])?,
        threads: args.opt_value_from_str("--threads")?,
        headless: args.contains("--headless"),
        format: args.opt_value_from_str(["-f", "--format"])?,
        threshold: args.opt_value_from_str("--threshold")?,
        header: args.contains("--header"),
        verbose: args.contains(["-v", "--verbose"]),
    })
}

fn parse_arg() -> Result<AppArgs, Box<dyn std::error::Error>> {
    let mut args = pico_args::Arguments::from_env();
    let subcommand = args.subcommand()?;
    let parsed = match subcommand.as_deref() {
        Some("score") => AppArgs::Score {
            y_true: args.opt_value_from_str(["-t", "--true"])?,
            y_score: args.opt_value_from_str(["-s", "--score"])?,
            subjects: args.opt_value_from_str("--subjects")?,
            data_dir: args.opt_value_from_str(["-d", "--data-dir"])?,
            column_subject: args.opt_value_from_str("--subject-column")?.unwrap_or(0),
            help: args.contains(["-h", "--help"]),
            common: parse_common(&mut args)?,
        },
        Some("curve") => AppArgs::Curve {
            y_true: args.opt_value_from_str(["-t", "--true"])?,
            y_score: args.opt_value_from_str(["-s", "--score"])?,
            afroc: args.contains("--afroc"),
            output: args.opt_value_from_str(["-o", "--output"])?,
            help: args.contains(["-h", "--help"]),
            common: parse_common(&mut args)?,
        },
        Some("emd") => AppArgs::Emd {
            y_true: args.opt_value_from_str(["-t", "--true"])?,
            y_pred: args.opt_value_from_str(["-p", "--pred"])?,
            subjects: args.opt_value_from_str("--subjects")?,
            data_dir: args.opt_value_from_str(["-d", "--data-dir"])?,
            column_subject: args.opt_value_from_str("--subject-column")?.unwrap_or(0),
            help: args.contains(["-h", "--help"]),
            common: parse_common(&mut args)?,
        },
        Some(other) => return Err(format!("Invalid subcommand: {}", other).into()),
        None => AppArgs::Global {
            help: args.contains(["-h", "--help"]),
        },
    };
    let remaining = args.finish();
    if !remaining.is_empty() {
        return Err(format!("Unexpected arguments: {:?}", remaining).into());
    }
    Ok(parsed)
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let parsed_args = parse_arg().unwrap_or_else(|e| {
        print_log_msg(FAIL, &format!("{}", e));
        eprintln!("{}", HELP);
        std::process::exit(1);
    });

    let verbose = match &parsed_args {
        AppArgs::Score { common, .. } | AppArgs::Curve { common, .. } | AppArgs::Emd { common, .. } => common.verbose,
        AppArgs::Global { .. } => false,
    };
    init_logger(verbose);

    match parsed_args {
        AppArgs::Global { help } => {
            print_logo();
            if !help {
                eprintln!("No subcommand specified. Try `parcelscore --help` for more information.");
            }
            eprintln!("{}", HELP);
            eprintln!("{}", HELP_SCORE);
            eprintln!("{}", HELP_CURVE);
            eprintln!("{}", HELP_EMD);
        }
        AppArgs::Score { .. } => score(parsed_args),
        AppArgs::Curve { .. } => curve(parsed_args),
        AppArgs::Emd { .. } => emd(parsed_args),
    }
}
