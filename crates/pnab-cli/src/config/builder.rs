use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, EngineSettings};
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, OptionOverride};
use pnab::engine::config::SweepConfigBuilder;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Merges run settings: command line over settings file over defaults.
pub fn build_config(args: &RunArgs, workers: Option<usize>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let output_file = file_config.output.unwrap_or_default();
    let engine_file = file_config.engine.unwrap_or_default();
    let sweep_file = file_config.sweep.unwrap_or_default();

    let output_directory = args
        .output_dir
        .clone()
        .or(output_file.directory)
        .unwrap_or(defaults.output_directory);

    let mut builder = SweepConfigBuilder::new()
        .output_directory(&output_directory)
        .summary_rows(output_file.summary_rows.unwrap_or(defaults.summary_rows));
    if let Some(name) = output_file.results_file {
        builder = builder.results_file(name);
    }
    if let Some(name) = output_file.index_file {
        builder = builder.index_file(name);
    }
    if let Some(name) = output_file.summary_file {
        builder = builder.summary_file(name);
    }
    if let Some(n) = workers.or(sweep_file.workers) {
        builder = builder.workers(n);
    }
    if let Some(seed) = args.seed.or(sweep_file.seed) {
        builder = builder.seed(seed);
    }
    let sweep = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let engine = EngineSettings {
        program: args
            .engine
            .clone()
            .or(engine_file.program)
            .unwrap_or(defaults.engine_program),
        args: if args.engine_args.is_empty() {
            engine_file.args
        } else {
            args.engine_args.clone()
        },
        scratch_dir: engine_file
            .scratch_directory
            .unwrap_or_else(|| output_directory.clone()),
    };

    Ok(AppConfig {
        input_path: args.input.clone(),
        engine,
        sweep,
    })
}

/// Reads the input document, looking in the working directory first and the
/// data directory second, then applies `-S` overrides.
pub fn load_input_document(
    input: &Path,
    set_values: &[String],
    working_dir: &Path,
    data_dir: &Path,
) -> Result<(PathBuf, Value)> {
    let path = resolve_input(input, working_dir, data_dir)?;
    debug!("Reading input document from {:?}", &path);
    let text = std::fs::read_to_string(&path)?;
    let mut document: Value =
        serde_yaml::from_str(&text).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;

    let overrides = set_values
        .iter()
        .map(|raw| parser::parse_override(raw))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    apply_overrides(&mut document, &overrides)?;
    Ok((path, document))
}

fn resolve_input(input: &Path, working_dir: &Path, data_dir: &Path) -> Result<PathBuf> {
    let candidates = [working_dir.join(input), data_dir.join(input)];
    candidates
        .into_iter()
        .find(|p| p.is_file())
        .ok_or_else(|| {
            CliError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!(
                    "Input file '{}' not found in the working directory or in {}",
                    input.display(),
                    data_dir.display()
                ),
            ))
        })
}

fn apply_overrides(document: &mut Value, overrides: &[OptionOverride]) -> Result<()> {
    for entry in overrides {
        if document.is_null() {
            *document = Value::Mapping(Mapping::new());
        }
        let root = document
            .as_mapping_mut()
            .ok_or_else(|| CliError::Config("Input document is not a mapping".to_string()))?;

        let section = root
            .entry(Value::String(entry.category.clone()))
            .or_insert(Value::Null);
        if section.is_null() {
            *section = Value::Mapping(Mapping::new());
        }
        let section = section.as_mapping_mut().ok_or_else(|| {
            CliError::Config(format!("Section '{}' is not a mapping", entry.category))
        })?;
        debug!(
            "Overriding {}.{} = {:?}",
            entry.category, entry.option, entry.value
        );
        section.insert(Value::String(entry.option.clone()), entry.value.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn run_args() -> RunArgs {
        RunArgs {
            input: PathBuf::from("input.yaml"),
            config: None,
            output_dir: None,
            engine: None,
            engine_args: Vec::new(),
            seed: None,
            set_values: Vec::new(),
        }
    }

    #[test]
    fn defaults_fill_everything_not_given() {
        let app = build_config(&run_args(), Some(2)).unwrap();
        assert_eq!(app.sweep.output.directory, PathBuf::from("."));
        assert_eq!(app.sweep.output.results_file, "results.csv");
        assert_eq!(app.sweep.output.summary_rows, 10);
        assert_eq!(app.sweep.workers, 2);
        assert_eq!(app.sweep.seed, None);
        assert_eq!(app.engine.program, PathBuf::from("pnab-engine"));
        assert_eq!(app.engine.scratch_dir, PathBuf::from("."));
    }

    #[test]
    fn command_line_overrides_file_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("settings.toml");
        fs::write(
            &cfg_path,
            r#"
            [output]
            directory = "from-file"
            summary-file = "best.csv"
            summary-rows = 3

            [engine]
            program = "file-engine"
            args = ["--a"]

            [sweep]
            workers = 6
            seed = 1
            "#,
        )
        .unwrap();

        let mut args = run_args();
        args.config = Some(cfg_path);
        args.output_dir = Some(PathBuf::from("from-cli"));
        args.engine_args = vec!["--b".into()];
        args.seed = Some(9);

        let app = build_config(&args, None).unwrap();
        assert_eq!(app.sweep.output.directory, PathBuf::from("from-cli"));
        assert_eq!(app.sweep.output.summary_file, "best.csv");
        assert_eq!(app.sweep.output.summary_rows, 3);
        assert_eq!(app.sweep.workers, 6);
        assert_eq!(app.sweep.seed, Some(9));
        assert_eq!(app.engine.program, PathBuf::from("file-engine"));
        assert_eq!(app.engine.args, ["--b"]);
        assert_eq!(app.engine.scratch_dir, PathBuf::from("from-cli"));
    }

    #[test]
    fn invalid_settings_are_config_errors() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("settings.toml");
        fs::write(&cfg_path, "[output]\nsummary-rows = 0\n").unwrap();
        let mut args = run_args();
        args.config = Some(cfg_path);
        assert!(matches!(
            build_config(&args, None),
            Err(CliError::Config(_))
        ));

        fs::write(&args.config.clone().unwrap(), "[output]\nsummary-rows = 11\n").unwrap();
        assert!(matches!(
            build_config(&args, None),
            Err(CliError::Config(msg)) if msg.contains("summary_rows")
        ));
    }

    #[test]
    fn input_falls_back_to_the_data_directory() {
        let work = tempdir().unwrap();
        let data = tempdir().unwrap();
        fs::write(
            data.path().join("input.yaml"),
            "RuntimeParameters:\n  strand: GC\n",
        )
        .unwrap();

        let (path, doc) =
            load_input_document(Path::new("input.yaml"), &[], work.path(), data.path()).unwrap();
        assert_eq!(path, data.path().join("input.yaml"));
        assert_eq!(doc["RuntimeParameters"]["strand"], Value::String("GC".into()));

        assert!(matches!(
            load_input_document(Path::new("missing.yaml"), &[], work.path(), data.path()),
            Err(CliError::Io(_))
        ));
    }

    #[test]
    fn overrides_replace_and_create_entries() {
        let work = tempdir().unwrap();
        fs::write(
            work.path().join("input.yaml"),
            "RuntimeParameters:\n  strand: GC\nHelicalParameters:\n",
        )
        .unwrap();
        let set = [
            "RuntimeParameters.strand=AT".to_string(),
            "HelicalParameters.h_twist=[30, 36, 4]".to_string(),
            "Backbone.linker=[13, 14]".to_string(),
        ];

        let (_, doc) =
            load_input_document(Path::new("input.yaml"), &set, work.path(), work.path()).unwrap();
        assert_eq!(doc["RuntimeParameters"]["strand"], Value::String("AT".into()));
        assert!(doc["HelicalParameters"]["h_twist"].is_sequence());
        assert!(doc["Backbone"]["linker"].is_sequence());
    }

    #[test]
    fn overriding_into_a_scalar_section_fails() {
        let mut doc: Value = serde_yaml::from_str("Backbone: 3").unwrap();
        let entry = parser::parse_override("Backbone.linker=[1, 2]").unwrap();
        assert!(matches!(
            apply_overrides(&mut doc, &[entry]),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn malformed_override_is_an_argument_error() {
        let work = tempdir().unwrap();
        fs::write(work.path().join("input.yaml"), "{}").unwrap();
        let set = ["strand=GC".to_string()];
        assert!(matches!(
            load_input_document(Path::new("input.yaml"), &set, work.path(), work.path()),
            Err(CliError::Argument(_))
        ));
    }
}
