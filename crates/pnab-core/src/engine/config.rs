use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;
use thiserror::Error;

pub const DEFAULT_RESULTS_FILE: &str = "results.csv";
pub const DEFAULT_INDEX_FILE: &str = "prefix.yaml";
pub const DEFAULT_SUMMARY_FILE: &str = "summary.csv";
pub const DEFAULT_SUMMARY_ROWS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Location and names of the files a sweep writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub results_file: String,
    pub index_file: String,
    pub summary_file: String,
    pub summary_rows: usize,
}

impl OutputConfig {
    pub fn results_path(&self) -> PathBuf {
        self.directory.join(&self.results_file)
    }

    pub fn index_path(&self) -> PathBuf {
        self.directory.join(&self.index_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.directory.join(&self.summary_file)
    }

    pub fn paths(&self) -> [PathBuf; 3] {
        [self.results_path(), self.index_path(), self.summary_path()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub output: OutputConfig,
    pub workers: usize,
    /// Seed for helical sampling; `None` draws one from the operating system.
    pub seed: Option<u64>,
}

#[derive(Debug, Default)]
pub struct SweepConfigBuilder {
    output_directory: Option<PathBuf>,
    results_file: Option<String>,
    index_file: Option<String>,
    summary_file: Option<String>,
    summary_rows: Option<usize>,
    workers: Option<usize>,
    seed: Option<u64>,
}

impl SweepConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_directory(mut self, path: impl AsRef<Path>) -> Self {
        self.output_directory = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn results_file(mut self, name: impl Into<String>) -> Self {
        self.results_file = Some(name.into());
        self
    }

    pub fn index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = Some(name.into());
        self
    }

    pub fn summary_file(mut self, name: impl Into<String>) -> Self {
        self.summary_file = Some(name.into());
        self
    }

    pub fn summary_rows(mut self, rows: usize) -> Self {
        self.summary_rows = Some(rows);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<SweepConfig, ConfigError> {
        let output = OutputConfig {
            directory: self
                .output_directory
                .ok_or(ConfigError::MissingParameter("output_directory"))?,
            results_file: file_name("results_file", self.results_file, DEFAULT_RESULTS_FILE)?,
            index_file: file_name("index_file", self.index_file, DEFAULT_INDEX_FILE)?,
            summary_file: file_name("summary_file", self.summary_file, DEFAULT_SUMMARY_FILE)?,
            summary_rows: summary_rows(self.summary_rows.unwrap_or(DEFAULT_SUMMARY_ROWS))?,
        };

        let names = [&output.results_file, &output.index_file, &output.summary_file];
        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(ConfigError::InvalidParameter {
                name: "output files",
                reason: "results, index, and summary files must have distinct names".into(),
            });
        }

        let workers = match self.workers {
            Some(n) => positive("workers", n)?,
            None => default_workers(),
        };

        Ok(SweepConfig {
            output,
            workers,
            seed: self.seed,
        })
    }
}

pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn file_name(
    name: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<String, ConfigError> {
    let value = value.unwrap_or_else(|| default.to_string());
    let is_plain = !value.is_empty()
        && Path::new(&value).file_name().is_some_and(|f| f == value.as_str());
    if is_plain {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("'{value}' is not a plain file name"),
        })
    }
}

fn positive(name: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        Err(ConfigError::InvalidParameter {
            name,
            reason: "must be at least 1".into(),
        })
    } else {
        Ok(value)
    }
}

fn summary_rows(value: usize) -> Result<usize, ConfigError> {
    let value = positive("summary_rows", value)?;
    if value > DEFAULT_SUMMARY_ROWS {
        return Err(ConfigError::InvalidParameter {
            name: "summary_rows",
            reason: format!("must be at most {DEFAULT_SUMMARY_ROWS}"),
        });
    }
    Ok(value)
}
