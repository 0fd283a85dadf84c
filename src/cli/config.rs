// File: config.rs
// Created: 2026-10-16
// Description: Evaluation settings stored as TOML
//
// Every key is optional. Flags given on the command line override the file.
//
//   data_dir = "/data/parcels"
//   threads = 0            # 0: decided by `headless`
//   headless = true        # batch runs use all cores, interactive runs one thread
//   format = "tsv"         # "default" or "tsv"
//   metrics = ["froc_score", "afroc_score", "jaccard", "hamming_loss"]
//   threshold = 0.0
//   header = false
//   verbose = false

use std::io::Write;
use std::path::Path;

use toml::map::Map;

use crate::error::{MetricError, Result};
use crate::metrics::scorer::{ScorerKind, DEFAULT_DECISION_THRESHOLD};

pub const DEFAULT_FORMAT: &str = "default";
const FORMATS: [&str; 2] = ["default", "tsv"];

#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub data_dir: Option<String>,
    pub threads: usize,
    pub headless: bool,
    pub format: String,
    pub metrics: Vec<ScorerKind>,
    pub threshold: f64,
    pub header: bool,
    pub verbose: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            threads: 0,
            headless: false,
            format: DEFAULT_FORMAT.to_string(),
            metrics: ScorerKind::ALL.to_vec(),
            threshold: DEFAULT_DECISION_THRESHOLD,
            header: false,
            verbose: false,
        }
    }
}

fn wrong_type(key: &str, expected: &str) -> MetricError {
    MetricError::Config(format!("{} must be {}", key, expected))
}

impl EvalConfig {
    pub fn from_toml(toml: &toml::Value) -> Result<Self> {
        let mut config = Self::default();
        let table = toml.as_table().ok_or_else(|| wrong_type("config", "a table"))?;
        if let Some(data_dir) = table.get("data_dir") {
            config.data_dir = Some(data_dir.as_str().ok_or_else(|| wrong_type("data_dir", "a string"))?.to_string());
        }
        if let Some(threads) = table.get("threads") {
            let threads = threads.as_integer().ok_or_else(|| wrong_type("threads", "an integer"))?;
            config.threads = usize::try_from(threads).map_err(|_| wrong_type("threads", "non-negative"))?;
        }
        if let Some(headless) = table.get("headless") {
            config.headless = headless.as_bool().ok_or_else(|| wrong_type("headless", "a boolean"))?;
        }
        if let Some(format) = table.get("format") {
            config.format = format.as_str().ok_or_else(|| wrong_type("format", "a string"))?.to_string();
        }
        if let Some(metrics) = table.get("metrics") {
            let metrics = metrics.as_array().ok_or_else(|| wrong_type("metrics", "an array"))?;
            config.metrics = metrics
                .iter()
                .map(|m| {
                    let name = m.as_str().ok_or_else(|| wrong_type("metrics", "an array of strings"))?;
                    ScorerKind::get_with_str(name).ok_or_else(|| MetricError::Config(format!("unknown metric: {}", name)))
                })
                .collect::<Result<Vec<_>>>()?;
        }
        if let Some(threshold) = table.get("threshold") {
            // TOML integers are accepted for convenience: threshold = 0
            config.threshold = match threshold {
                toml::Value::Float(f) => *f,
                toml::Value::Integer(i) => *i as f64,
                _ => return Err(wrong_type("threshold", "a number")),
            };
        }
        if let Some(header) = table.get("header") {
            config.header = header.as_bool().ok_or_else(|| wrong_type("header", "a boolean"))?;
        }
        if let Some(verbose) = table.get("verbose") {
            config.verbose = verbose.as_bool().ok_or_else(|| wrong_type("verbose", "a boolean"))?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> toml::Value {
        let mut map = Map::new();
        if let Some(data_dir) = &self.data_dir {
            map.insert("data_dir".to_string(), toml::Value::String(data_dir.clone()));
        }
        map.insert("threads".to_string(), toml::Value::Integer(self.threads as i64));
        map.insert("headless".to_string(), toml::Value::Boolean(self.headless));
        map.insert("format".to_string(), toml::Value::String(self.format.clone()));
        map.insert(
            "metrics".to_string(),
            toml::Value::Array(self.metrics.iter().map(|m| toml::Value::String(m.to_string())).collect()),
        );
        map.insert("threshold".to_string(), toml::Value::Float(self.threshold));
        map.insert("header".to_string(), toml::Value::Boolean(self.header));
        map.insert("verbose".to_string(), toml::Value::Boolean(self.verbose));
        toml::Value::Table(map)
    }

    pub fn validate(&self) -> Result<()> {
        if !FORMATS.contains(&self.format.as_str()) {
            return Err(MetricError::Config(format!(
                "invalid format: {} (expected one of {})",
                self.format,
                FORMATS.join(", ")
            )));
        }
        if self.threshold.is_nan() {
            return Err(wrong_type("threshold", "a number"));
        }
        Ok(())
    }

    /// Size of the rayon pool. An explicit thread count wins; otherwise
    /// headless runs take every core and interactive runs stay on one.
    pub fn num_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else if self.headless {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            1
        }
    }
}

pub fn write_eval_config_to_file<P: AsRef<Path>>(path: P, config: &EvalConfig) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    let toml = toml::to_string(&config.to_toml()).map_err(|e| MetricError::Config(e.to_string()))?;
    file.write_all(toml.as_bytes())?;
    Ok(())
}

pub fn read_eval_config_from_file<P: AsRef<Path>>(path: P) -> Result<EvalConfig> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let toml: toml::Value = toml::from_str(&content)
        .map_err(|e| MetricError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
    EvalConfig::from_toml(&toml)
}
