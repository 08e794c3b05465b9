//! # Stepwise Shared
//!
//! Common value types used by the pattern engine and its embedders.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - Threads, atomics or locks
//! - Curve evaluation or pattern logic
//!
//! If you need either, put it in `stepwise_core` or `stepwise_pattern`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    DEFAULT_NUM_STEPS, DEFAULT_QUANT_LEVELS, DEFAULT_THRESHOLD, NO_ROTATION, NO_SCALE,
    NO_TRANSLATION, UNIT_CENTER,
};
pub use math::{Bounding, Transform, Vec3};
