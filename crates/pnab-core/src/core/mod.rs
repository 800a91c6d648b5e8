//! # Core Module
//!
//! The stateless foundation of the sweep: data models, option validation, the
//! nucleobase library, and output file handling. Nothing in this module spawns
//! threads or processes.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Helical ranges and points, engine descriptors, result rows
//! - **Option Schema** ([`options`]) - Static option catalog, field validators, and `validate_all`
//! - **Nucleobase Library** ([`library`]) - Loading `bases_library.yaml` and the A–U pairing override
//! - **File I/O** ([`io`]) - Append-only results table, prefix index, summary, and rotation

pub mod io;
pub mod library;
pub mod models;
pub mod options;
