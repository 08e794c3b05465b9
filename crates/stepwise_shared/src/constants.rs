//! # Pattern Defaults & Geometric Constants
//!
//! Values every fresh engine starts from.

use crate::math::Vec3;

// =============================================================================
// SEQUENCE DEFAULTS
// =============================================================================

/// Steps per sequence when nothing else is configured
pub const DEFAULT_NUM_STEPS: usize = 16;

/// Trigger threshold when nothing else is configured
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Quantization level count meaning "pass through"
pub const DEFAULT_QUANT_LEVELS: usize = 0;

// =============================================================================
// GEOMETRY
// =============================================================================

/// Center of the unit cube, the default rotation pivot
pub const UNIT_CENTER: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Identity scale
pub const NO_SCALE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// Identity translation
pub const NO_TRANSLATION: Vec3 = Vec3::ZERO;

/// Identity rotation, in degrees
pub const NO_ROTATION: f32 = 0.0;
