use pnab::engine::config::SweepConfig;
use std::path::PathBuf;

pub struct EngineSettings {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory of every engine process; defaults to the output directory.
    pub scratch_dir: PathBuf,
}

pub struct AppConfig {
    pub input_path: PathBuf,
    pub engine: EngineSettings,
    pub sweep: SweepConfig,
}
