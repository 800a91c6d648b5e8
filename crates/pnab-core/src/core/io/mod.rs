//! Durable output files of a sweep.
//!
//! Every file is created fresh for a run (after any previous copy has been
//! rotated aside with [`output::rotate_aside`]) and only ever appended to. Each
//! append is a single buffered write followed by a sync, so an interrupted run
//! leaves at most one partial trailing line, which the readers skip.
//!
//! - [`results`] - the comma-separated results table and the ranked summary
//! - [`index`] - the YAML record mapping each prefix to its helical header
//! - [`output`] - rotation, timestamps, and the shared error type

pub mod index;
pub mod output;
pub mod results;
