//! # Engine Module
//!
//! The stateful half of a sweep: turning helical ranges into configurations,
//! evaluating them in parallel through the external conformer engine, and
//! persisting what comes back.
//!
//! ## Architecture
//!
//! - **Sampling** ([`sampling`]) - Draws per-axis samples and lazily enumerates their Cartesian product
//! - **Engine Boundary** ([`external`]) - The [`ConformerEngine`](external::ConformerEngine) trait,
//!   the request payload, the external-process implementation, and output parsing
//! - **Dispatch** ([`dispatcher`]) - Fixed-size worker pool with a bounded in-flight window and
//!   in-order delivery
//! - **Aggregation** ([`aggregator`]) - Crash-durable recording and the ranked summary
//! - **Cancellation** ([`cancel`]) - The shared token tripped by the coordinator or an interrupt
//! - **Configuration** ([`config`]) - Output locations, worker count, and sampling seed
//! - **Progress Monitoring** ([`progress`]) - Phase and per-configuration progress events
//! - **Error Handling** ([`error`]) - The engine-level error type
//!
//! ## Failure Model
//!
//! A failure evaluating one configuration is logged, recorded, and counted; the
//! sweep carries on. Failures writing output are fatal. Interruption is not a
//! failure: dispatch stops at once, and whatever was already recorded is still
//! summarized.

pub mod aggregator;
pub mod cancel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod external;
pub mod progress;
pub mod sampling;
