use super::cancel::CancellationToken;
use super::error::EngineError;
use super::external::{ConformerEngine, EngineRequest, parse_engine_output};
use crate::core::models::descriptors::DescriptorSet;
use crate::core::models::helical::Configuration;
use crate::core::models::results::ConformerRecord;
use crate::core::options::OptionSet;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The outcome of evaluating one configuration, as delivered to the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub prefix: u64,
    pub header: String,
    /// Accepted conformers; empty when the engine found none or failed.
    pub conformers: Vec<ConformerRecord>,
    /// Why the evaluation failed, if it did.
    pub failure: Option<String>,
}

impl RunResult {
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub submitted: u64,
    pub delivered: u64,
    pub failed: u64,
    pub interrupted: bool,
}

type JobOutcome = (u64, Configuration, Result<Vec<ConformerRecord>, EngineError>);

/// Evaluates configurations on a fixed-size worker pool.
///
/// Configurations are drawn lazily, at most `2 × workers` ahead of the oldest
/// undelivered one, and results reach the sink in submission order.
pub struct Dispatcher {
    engine: Arc<dyn ConformerEngine>,
    workers: usize,
}

impl Dispatcher {
    pub fn new(engine: Arc<dyn ConformerEngine>, workers: usize) -> Self {
        Self {
            engine,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs every configuration through the engine and hands each result to `sink`.
    ///
    /// A failing configuration is logged and delivered with its `failure` set; it
    /// never stops the sweep. Once `cancel` is tripped no further work is
    /// submitted or delivered and the call returns without waiting for running
    /// evaluations, which observe the token and kill their engine processes.
    ///
    /// # Errors
    ///
    /// Returns an error if the option set cannot be converted into engine
    /// descriptors, if the worker pool cannot be built, or if `sink` fails. A sink
    /// failure trips `cancel` before returning.
    #[instrument(skip_all, name = "dispatch", fields(workers = self.workers))]
    pub fn run<I, S>(
        &self,
        options: &OptionSet,
        configurations: I,
        cancel: &CancellationToken,
        mut sink: S,
    ) -> Result<DispatchSummary, EngineError>
    where
        I: IntoIterator<Item = Configuration>,
        S: FnMut(RunResult) -> Result<(), EngineError>,
    {
        let descriptors = Arc::new(DescriptorSet::from_options(options)?);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("pnab-worker-{i}"))
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;

        let (tx, rx): (Sender<JobOutcome>, Receiver<JobOutcome>) = crossbeam_channel::unbounded();
        let window = (self.workers as u64).saturating_mul(2);
        let mut pending = configurations.into_iter();
        let mut exhausted = false;
        let mut next_to_deliver = 0u64;
        let mut reorder: BTreeMap<u64, RunResult> = BTreeMap::new();
        let mut summary = DispatchSummary::default();

        loop {
            if cancel.is_cancelled() {
                summary.interrupted = true;
                info!(
                    delivered = summary.delivered,
                    submitted = summary.submitted,
                    "Dispatch interrupted; abandoning outstanding work."
                );
                break;
            }

            while !exhausted && summary.submitted - next_to_deliver < window {
                let Some(configuration) = pending.next() else {
                    exhausted = true;
                    break;
                };
                self.submit(
                    &pool,
                    summary.submitted,
                    configuration,
                    &descriptors,
                    cancel,
                    &tx,
                );
                summary.submitted += 1;
            }

            if exhausted && next_to_deliver == summary.submitted {
                break;
            }

            match rx.recv_timeout(POLL_INTERVAL) {
                Ok((sequence, configuration, outcome)) => {
                    reorder.insert(sequence, into_run_result(configuration, outcome));
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(EngineError::Internal(
                        "worker result channel closed unexpectedly".into(),
                    ));
                }
            }

            while let Some(result) = reorder.remove(&next_to_deliver) {
                if cancel.is_cancelled() {
                    break;
                }
                next_to_deliver += 1;
                summary.delivered += 1;
                if result.is_failure() {
                    summary.failed += 1;
                }
                if let Err(e) = sink(result) {
                    cancel.cancel();
                    return Err(e);
                }
            }
        }

        debug!(?summary, "Dispatch finished.");
        Ok(summary)
    }

    fn submit(
        &self,
        pool: &rayon::ThreadPool,
        sequence: u64,
        configuration: Configuration,
        descriptors: &Arc<DescriptorSet>,
        cancel: &CancellationToken,
        tx: &Sender<JobOutcome>,
    ) {
        debug!(prefix = configuration.ordinal, "Submitting configuration.");
        let engine = Arc::clone(&self.engine);
        let descriptors = Arc::clone(descriptors);
        let cancel = cancel.clone();
        let tx = tx.clone();
        pool.spawn(move || {
            let outcome = if cancel.is_cancelled() {
                Err(EngineError::Interrupted)
            } else {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    evaluate(engine.as_ref(), &descriptors, &configuration, &cancel)
                }))
                .unwrap_or_else(|payload| Err(EngineError::Internal(panic_message(payload))))
            };
            // The coordinator stops listening once the sweep is interrupted.
            let _ = tx.send((sequence, configuration, outcome));
        });
    }
}

fn evaluate(
    engine: &dyn ConformerEngine,
    descriptors: &DescriptorSet,
    configuration: &Configuration,
    cancel: &CancellationToken,
) -> Result<Vec<ConformerRecord>, EngineError> {
    let prefix = configuration.prefix();
    let request = EngineRequest::new(descriptors, &configuration.point, &prefix);
    let output = engine.evaluate(&request, cancel)?;
    parse_engine_output(&output, configuration.ordinal)
}

fn into_run_result(
    configuration: Configuration,
    outcome: Result<Vec<ConformerRecord>, EngineError>,
) -> RunResult {
    let header = configuration.header();
    match outcome {
        Ok(conformers) => RunResult {
            prefix: configuration.ordinal,
            header,
            conformers,
            failure: None,
        },
        Err(e) => {
            warn!(prefix = configuration.ordinal, error = %e, "Configuration failed; continuing with the rest.");
            RunResult {
                prefix: configuration.ordinal,
                header,
                conformers: Vec::new(),
                failure: Some(e.to_string()),
            }
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("engine panicked: {detail}")
}
