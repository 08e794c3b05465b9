//! # Stepwise Pattern Engine
//!
//! Turns one continuous curve into discrete, per-step sequences for a
//! real-time consumer (an audio or render tick):
//! - Three trigger sequences (0/1 gates), one per vector component
//! - Three value sequences (quantized levels), one per vector component
//! - One vector sequence (raw 3D curve points)
//!
//! ## Architecture Rules
//!
//! 1. **Sample on change, not on read** - Sequences are cached and only
//!    recomputed when a parameter changes
//! 2. **Readers never block** - `next`/`*_at` read a published snapshot
//! 3. **Bad settings are clamped** - Control calls never fail on
//!    out-of-range input; they log a warning and clamp
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stepwise_pattern::{Axis, Component, ConstantCurve, PatternEngine};
//!
//! let engine = Arc::new(PatternEngine::with_curve(Arc::new(ConstantCurve::new(0.7))));
//! engine.set_num_steps(Axis::Trigger(Component::Y), 4);
//!
//! // Audio thread
//! let gate = engine.next_trigger(Component::Y); // 1.0
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod quantize;
pub mod sequencer;

pub use config::{
    EngineConfig, MacroStepConfig, PerComponent, TriggerAxisConfig, ValueAxisConfig,
    VectorAxisConfig,
};
pub use curve::{Component, ConstantCurve, Curve, CurveParams, ShapedCurve};
pub use engine::{MacroStep, PatternEngine};
pub use error::{PatternError, PatternResult};
pub use quantize::quantize;
pub use sequencer::{Axis, AxisSequencer, AxisSpec, TriggerSpec, ValueSpec, VectorSpec};

pub use stepwise_shared::{Bounding, Transform, Vec3};
