mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_config, load_input_document};
pub use models::AppConfig;
