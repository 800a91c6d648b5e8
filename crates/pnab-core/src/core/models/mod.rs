//! # Core Models Module
//!
//! Plain data types shared by the option schema, the sweep engine, and the
//! output layer.
//!
//! ## Key Components
//!
//! - [`helical`] - The six helical axes, their sampling ranges, and the concrete
//!   points and numbered configurations drawn from them
//! - [`descriptors`] - Typed backbone, runtime, and nucleobase parameters handed
//!   to the conformer engine
//! - [`results`] - The fixed ten-column conformer record and its unit-labeled header

pub mod descriptors;
pub mod helical;
pub mod results;
