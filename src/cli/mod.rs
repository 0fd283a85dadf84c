//! Command line interface for parcelscore

// File: mod.rs
// Created: 2026-10-16
// Description: Arguments of the CLI app are defined here

pub mod config;
pub mod workflows;

use crate::cli::config::{read_eval_config_from_file, EvalConfig};
use crate::error::Result;

/// Options shared by every subcommand. `None` keeps the value of the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonArgs {
    pub config: Option<String>,
    pub threads: Option<usize>,
    pub headless: bool,
    pub format: Option<String>,
    pub threshold: Option<f64>,
    pub header: bool,
    pub verbose: bool,
}

impl CommonArgs {
    /// Load the config file if given and apply the command line on top of it
    pub fn resolve(&self) -> Result<EvalConfig> {
        let mut config = match &self.config {
            Some(path) => read_eval_config_from_file(path)?,
            None => EvalConfig::default(),
        };
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.headless {
            config.headless = true;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if self.header {
            config.header = true;
        }
        if self.verbose {
            config.verbose = true;
        }
        config.validate()?;
        Ok(config)
    }
}

pub enum AppArgs {
    Global {
        help: bool,
    },
    Score {
        y_true: Option<String>,
        y_score: Option<String>,
        // Both required for the EMD column
        subjects: Option<String>,
        data_dir: Option<String>,
        column_subject: usize,
        common: CommonArgs,
        help: bool,
    },
    Curve {
        y_true: Option<String>,
        y_score: Option<String>,
        afroc: bool,
        output: Option<String>,
        common: CommonArgs,
        help: bool,
    },
    Emd {
        y_true: Option<String>,
        y_pred: Option<String>,
        subjects: Option<String>,
        data_dir: Option<String>,
        column_subject: usize,
        common: CommonArgs,
        help: bool,
    },
}

pub fn print_logo() {
    let logo = [
        "",
        "\x1b[91m█▀█ ▄▀█ █▀█ █▀▀ █▀▀ █░░\x1b[93m █▀ █▀▀ █▀█ █▀█ █▀▀\x1b[0m",
        "\x1b[91m█▀▀ █▀█ █▀▄ █▄▄ ██▄ █▄▄\x1b[93m ▄█ █▄▄ █▄█ █▀▄ ██▄\x1b[0m",
        "",
    ];

    for line in &logo {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ScorerKind;

    #[test]
    fn test_command_line_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.toml");
        std::fs::write(&path, "threads = 2\nformat = \"tsv\"\nmetrics = [\"froc\"]\n").unwrap();
        let common = CommonArgs {
            config: Some(path.to_string_lossy().to_string()),
            threads: Some(8),
            threshold: Some(0.5),
            ..Default::default()
        };
        let config = common.resolve().unwrap();
        assert_eq!(config.threads, 8);
        assert_eq!(config.format, "tsv");
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.metrics, vec![ScorerKind::Froc]);
    }

    #[test]
    fn test_invalid_format_flag() {
        let common = CommonArgs {
            format: Some("json".to_string()),
            ..Default::default()
        };
        assert!(common.resolve().is_err());
    }
}
