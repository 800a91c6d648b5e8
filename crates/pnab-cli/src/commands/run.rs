use crate::cli::RunArgs;
use crate::config::{self, AppConfig};
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pnab::core::options::ValidationContext;
use pnab::engine::cancel::CancellationToken;
use pnab::engine::external::{ConformerEngine, ExternalCommandEngine};
use pnab::engine::progress::ProgressReporter;
use pnab::workflows::{self, sweep::SweepOutcome, sweep::SweepReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(args: RunArgs, workers: Option<usize>) -> Result<()> {
    info!("Initializing data manager...");
    let data_manager = DataManager::new()?;
    let working_dir = std::env::current_dir()?;

    info!("Merging run settings from file and CLI arguments...");
    let AppConfig {
        input_path,
        engine: engine_settings,
        sweep,
    } = config::build_config(&args, workers)?;

    let (input_path, document) = config::load_input_document(
        &input_path,
        &args.set_values,
        &working_dir,
        data_manager.get_data_path(),
    )?;
    info!("Loaded input document from {:?}", &input_path);

    if !data_manager.has_library() {
        warn!(
            "No nucleobase library at {:?}. Hint: point 'pnab data set-path' at a directory containing it.",
            data_manager.library_path()
        );
    }
    let ctx = ValidationContext::new(&working_dir, data_manager.get_data_path());
    let options = workflows::sweep::load_options(&document, &ctx)?;

    std::fs::create_dir_all(&engine_settings.scratch_dir)?;
    let program = resolve_program(&engine_settings.program, &working_dir);
    info!(program = %program.display(), "Using conformer engine.");
    let engine: Arc<dyn ConformerEngine> = Arc::new(
        ExternalCommandEngine::new(program, &engine_settings.scratch_dir)
            .with_args(engine_settings.args),
    );

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Caught interruption; stopping ...");
                cancel.cancel();
            }
        }
    });

    println!("Starting helical parameter sweep...");
    let progress_handler = CliProgressHandler::new();
    let output = sweep.output.clone();
    let report = tokio::task::spawn_blocking(move || {
        let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
        workflows::sweep::run(&options, &sweep, engine, &cancel, &reporter)
    })
    .await
    .map_err(|e| CliError::Other(anyhow::anyhow!("Sweep task failed: {e}")))?;
    interrupt.abort();
    let report = report?;

    print_report(&report, &output.results_path(), &output.summary_path());
    Ok(())
}

/// Relative program paths with a directory component are taken from the
/// working directory, since engines run inside the scratch directory.
fn resolve_program(program: &Path, working_dir: &Path) -> PathBuf {
    if program.is_relative() && program.components().count() > 1 {
        working_dir.join(program)
    } else {
        program.to_path_buf()
    }
}

fn print_report(report: &SweepReport, results_path: &Path, summary_path: &Path) {
    let recorded = report.prefixes.len();
    match report.outcome {
        SweepOutcome::Completed => println!(
            "Sweep complete: {recorded} configuration(s) evaluated, {} failed.",
            report.failed
        ),
        SweepOutcome::Interrupted => println!(
            "Sweep interrupted: {recorded} of {} configuration(s) recorded, {} failed.",
            report.total_configurations, report.failed
        ),
    }
    println!(
        "{} conformer(s) written to: {}",
        report.results.len(),
        results_path.display()
    );

    match &report.summary {
        None => println!("No candidate found"),
        Some(rows) => {
            println!("Best conformers (written to {}):", summary_path.display());
            println!("  {:>8} {:>10} {:>14} {:>10}", "Prefix", "Conformer", "Total Energy", "RMSD");
            for row in rows {
                println!(
                    "  {:>8} {:>10} {:>14.4} {:>10.4}",
                    row.prefix, row.conformer_index, row.total_energy, row.rmsd
                );
            }
        }
    }
}
