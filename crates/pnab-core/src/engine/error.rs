use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::output::OutputError;
use crate::core::library::LibraryError;
use crate::core::options::ConfigurationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid options: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Nucleobase library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Invalid sweep settings: {0}")]
    Settings(#[from] ConfigError),

    #[error("Engine invocation failed for prefix {prefix}: {reason}")]
    Invocation { prefix: String, reason: String },

    #[error("Malformed engine output for prefix {prefix}: {reason}")]
    MalformedOutput { prefix: String, reason: String },

    #[error("Sweep was interrupted")]
    Interrupted,

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
