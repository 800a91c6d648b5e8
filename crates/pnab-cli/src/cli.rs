use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "pnab",
    author,
    version,
    about = "Sweeps helical parameter space for nucleic acid backbones.",
    long_about = "Expands the helical parameter ranges of an input document into configurations, \
evaluates each one with an external conformer engine in parallel, and ranks the \
resulting conformers by total energy.",
    help_template = HELP_TEMPLATE,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence all log output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Number of configurations evaluated concurrently.
    #[arg(short = 'j', long = "jobs", value_name = "N", global = true)]
    pub workers: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a helical parameter sweep.
    Run(RunArgs),
    /// List the recognized input options with their descriptions and defaults.
    Options(OptionsArgs),
    /// Manage the data directory that holds the nucleobase library.
    Data(DataArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input document (YAML) with the backbone, helical, and runtime options.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Run settings file (TOML).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory receiving the results, prefix index, and summary.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Conformer engine executable.
    #[arg(short, long, value_name = "PROGRAM")]
    pub engine: Option<PathBuf>,

    /// Extra argument passed to the engine (repeatable).
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Seed for drawing helical samples.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Override an input option, e.g. `-S HelicalParameters.h_twist=[30,36,4]`.
    #[arg(short = 'S', long = "set", value_name = "CATEGORY.OPTION=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Only list the options of this category.
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,
}

#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Print the data directory in use.
    Path,
    /// Use a custom data directory.
    SetPath {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Go back to the default data directory.
    ResetPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_collects_repeated_overrides_and_engine_args() {
        let cli = Cli::try_parse_from([
            "pnab",
            "-vv",
            "run",
            "input.yaml",
            "--engine",
            "/opt/engine",
            "--engine-arg",
            "--fast",
            "--engine-arg",
            "2",
            "-S",
            "RuntimeParameters.strand=GC",
            "-S",
            "HelicalParameters.h_rise=3.4",
            "--seed",
            "7",
            "-j",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.workers, Some(4));
        let Commands::Run(args) = cli.command else {
            panic!("expected the run command");
        };
        assert_eq!(args.input, PathBuf::from("input.yaml"));
        assert_eq!(args.engine_args, ["--fast", "2"]);
        assert_eq!(args.set_values.len(), 2);
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pnab", "-q", "-v", "options"]).is_err());
    }

    #[test]
    fn data_subcommands_parse() {
        let cli = Cli::try_parse_from(["pnab", "data", "set-path", "/tmp/pnab"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Data(DataArgs {
                command: DataCommands::SetPath { .. }
            })
        ));
    }
}
