use crate::core::library::NucleobaseLibrary;
use crate::core::models::results::ConformerRecord;
use crate::core::options::{OptionSet, ValidationContext, validate_all};
use crate::engine::aggregator::ResultAggregator;
use crate::engine::cancel::CancellationToken;
use crate::engine::config::SweepConfig;
use crate::engine::dispatcher::Dispatcher;
use crate::engine::error::EngineError;
use crate::engine::external::ConformerEngine;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sampling::RangeExpander;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    Completed,
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct SweepReport {
    pub total_configurations: u64,
    /// `(prefix, header)` pairs recorded in the prefix index, in order.
    pub prefixes: Vec<(String, String)>,
    /// Every persisted conformer, ascending by total energy.
    pub results: Vec<ConformerRecord>,
    /// The rows written to the summary; `None` when no candidate was found.
    pub summary: Option<Vec<ConformerRecord>>,
    pub failed: u64,
    pub outcome: SweepOutcome,
}

/// Validates a raw input document and merges the nucleobase library from the
/// context's data directory.
#[instrument(skip_all, name = "load_options")]
pub fn load_options(
    raw: &serde_yaml::Value,
    ctx: &ValidationContext,
) -> Result<OptionSet, EngineError> {
    let options = validate_all(raw, ctx)?;
    let library = NucleobaseLibrary::load(&ctx.data_dir)?;
    Ok(options.with_nucleobases(library)?)
}

#[instrument(skip_all, name = "sweep_workflow")]
pub fn run(
    options: &OptionSet,
    config: &SweepConfig,
    engine: Arc<dyn ConformerEngine>,
    cancel: &CancellationToken,
    reporter: &ProgressReporter,
) -> Result<SweepReport, EngineError> {
    info!(workers = config.workers, "Starting helical parameter sweep.");

    // === Phase 1: Expand helical ranges ===
    let expander = reporter.phase("Expanding Configurations", || {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        RangeExpander::draw(&options.helical_ranges(), &mut rng)
    });
    let total_configurations = expander.configuration_count();
    info!(total_configurations, "Enumerated helical configurations.");

    // === Phase 2: Prepare output files ===
    let mut aggregator = reporter.phase("Preparing Output", || {
        ResultAggregator::create(&config.output)
    })?;

    // === Phase 3: Evaluate and record ===
    let dispatcher = Dispatcher::new(engine, config.workers);
    let dispatch = reporter.phase("Evaluating Configurations", || {
        reporter.report(Progress::TaskStart {
            total_steps: total_configurations,
        });
        let result = dispatcher.run(options, expander.configurations(), cancel, |result| {
            aggregator.record(&result)?;
            reporter.report(Progress::ConfigurationDone {
                prefix: result.prefix,
                conformers: result.conformers.len(),
            });
            reporter.report(Progress::TaskIncrement);
            Ok(())
        });
        reporter.report(Progress::TaskFinish);
        result
    })?;

    let outcome = if dispatch.interrupted {
        warn!(
            recorded = dispatch.delivered,
            total_configurations, "Sweep interrupted; summarizing what was recorded."
        );
        SweepOutcome::Interrupted
    } else {
        SweepOutcome::Completed
    };

    // === Phase 4: Summarize ===
    let aggregate = reporter.phase("Summarizing Results", || aggregator.finalize())?;
    if aggregate.summary.is_none() {
        reporter.message("No candidate found");
    }

    info!(
        recorded = aggregate.prefixes.len(),
        conformers = aggregate.results.len(),
        failed = dispatch.failed,
        "Sweep finished."
    );
    Ok(SweepReport {
        total_configurations,
        prefixes: aggregate.prefixes,
        results: aggregate.results,
        summary: aggregate.summary,
        failed: dispatch.failed,
        outcome,
    })
}
