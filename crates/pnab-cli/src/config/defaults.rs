use pnab::engine::config::DEFAULT_SUMMARY_ROWS;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub output_directory: PathBuf,
    pub engine_program: PathBuf,
    pub summary_rows: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            engine_program: PathBuf::from("pnab-engine"),
            summary_rows: DEFAULT_SUMMARY_ROWS,
        }
    }
}
