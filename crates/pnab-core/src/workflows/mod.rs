//! # Workflows Module
//!
//! High-level entry points that tie [`core`](crate::core) and
//! [`engine`](crate::engine) together.
//!
//! - **Sweep Workflow** ([`sweep`]) - Expands the helical ranges, rotates previous
//!   output aside, evaluates every configuration through the conformer engine while
//!   recording results as they arrive, and writes the ranked summary. An interrupted
//!   sweep is still summarized.
//!
//! A typical caller validates the input document with [`sweep::load_options`],
//! builds a [`SweepConfig`](crate::engine::config::SweepConfig), and hands both to
//! [`sweep::run`] together with an engine implementation and a cancellation token.

pub mod sweep;
