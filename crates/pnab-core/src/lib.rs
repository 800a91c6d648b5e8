//! # pNAB Sweep Core Library
//!
//! Orchestration of helical parameter sweeps for the proto-Nucleic Acid Builder:
//! every combination of sampled helical geometries is handed to an external
//! conformer search engine, and the conformers it accepts are collected into
//! crash-durable, energy-ranked output.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models, the declarative option
//!   schema with its field validators, the nucleobase library, and the append-only
//!   output files.
//!
//! - **[`engine`]: The Logic Core.** Range expansion, the worker-pool dispatcher with
//!   in-order delivery, the external engine boundary, cancellation, and the result
//!   aggregator.
//!
//! - **[`workflows`]: The Public API.** The end-to-end sweep, from a validated option
//!   set to the final summary.

pub mod core;
pub mod engine;
pub mod workflows;
