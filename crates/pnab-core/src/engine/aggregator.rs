use super::config::OutputConfig;
use super::dispatcher::RunResult;
use crate::core::io::index::{PrefixIndexWriter, read_prefix_index};
use crate::core::io::output::{OutputError, rotate_aside, timestamp};
use crate::core::io::results::{ResultsWriter, read_results, write_summary};
use crate::core::models::results::{ConformerRecord, sort_by_total_energy};
use std::fs;
use tracing::{debug, info, instrument};

/// What a finished (or interrupted) sweep left on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// `(prefix, header)` pairs in the order they were recorded.
    pub prefixes: Vec<(String, String)>,
    /// Every complete row of the results table, ascending by total energy.
    pub results: Vec<ConformerRecord>,
    /// The rows written to the summary file; `None` when no candidate was found.
    pub summary: Option<Vec<ConformerRecord>>,
}

/// Persists run results as they arrive and builds the ranked summary at the end.
#[derive(Debug)]
pub struct ResultAggregator {
    config: OutputConfig,
    results: ResultsWriter,
    index: PrefixIndexWriter,
    recorded: u64,
}

impl ResultAggregator {
    /// Rotates any previous output aside and starts fresh files.
    #[instrument(skip_all, name = "prepare_output", fields(directory = %config.directory.display()))]
    pub fn create(config: &OutputConfig) -> Result<Self, OutputError> {
        fs::create_dir_all(&config.directory).map_err(|e| OutputError::io(&config.directory, e))?;
        for path in config.paths() {
            if let Some(moved) = rotate_aside(&path)? {
                info!(
                    from = %path.display(),
                    to = %moved.display(),
                    "Moved previous output aside."
                );
            }
        }

        let started = timestamp();
        let results = ResultsWriter::create(&config.results_path(), &started)?;
        let index = PrefixIndexWriter::create(&config.index_path(), &started)?;
        Ok(Self {
            config: config.clone(),
            results,
            index,
            recorded: 0,
        })
    }

    /// Records one result: its index entry first, then its rows if it has any.
    pub fn record(&mut self, result: &RunResult) -> Result<(), OutputError> {
        self.index
            .append(&result.prefix.to_string(), &result.header)?;
        self.results.append(&result.header, &result.conformers)?;
        self.recorded += 1;
        debug!(
            prefix = result.prefix,
            conformers = result.conformers.len(),
            "Recorded configuration."
        );
        Ok(())
    }

    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Re-reads what was persisted and writes the summary of the best rows.
    #[instrument(skip_all, name = "summarize")]
    pub fn finalize(self) -> Result<Aggregate, OutputError> {
        let prefixes = read_prefix_index(&self.config.index_path())?;
        let mut results = read_results(&self.config.results_path())?;

        if results.is_empty() {
            info!("No candidate found");
            return Ok(Aggregate {
                prefixes,
                results,
                summary: None,
            });
        }

        sort_by_total_energy(&mut results);
        let best = results[..results.len().min(self.config.summary_rows)].to_vec();
        write_summary(&self.config.summary_path(), &timestamp(), &best)?;
        info!(
            rows = results.len(),
            summary_rows = best.len(),
            best_energy = best[0].total_energy,
            "Wrote summary."
        );
        Ok(Aggregate {
            prefixes,
            results,
            summary: Some(best),
        })
    }
}
