//! # Engine Configuration
//!
//! Startup configuration for a [`PatternEngine`](crate::PatternEngine),
//! parsed from TOML. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```toml
//! [macro_step]
//! steps = 16
//! sync_on_wrap = true
//!
//! [curve]
//! amp_offset = 1.0
//! bounding = "folding"
//!
//! [curve.transform]
//! rotation = 45.0
//!
//! [triggers.y]
//! steps = 8
//! threshold = 0.6
//!
//! [values.x]
//! steps = 5
//! levels = 3
//!
//! [vectors]
//! steps = 32
//! transformed = true
//! ```
//!
//! Out-of-range values are not rejected here; the engine clamps them when
//! it builds its sequencers.

use serde::{Deserialize, Serialize};
use stepwise_shared::{DEFAULT_NUM_STEPS, DEFAULT_QUANT_LEVELS, DEFAULT_THRESHOLD};

use crate::curve::{Component, CurveParams};
use crate::error::{PatternError, PatternResult};
use crate::sequencer::{TriggerSpec, ValueSpec, VectorSpec};

/// Macro step settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroStepConfig {
    /// Macro steps between wraps
    pub steps: usize,
    /// Reset every axis cursor when the macro cursor wraps
    pub sync_on_wrap: bool,
}

impl Default for MacroStepConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_NUM_STEPS,
            sync_on_wrap: true,
        }
    }
}

/// One trigger axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerAxisConfig {
    /// Number of steps
    pub steps: usize,
    /// Gate level in [0, 1]
    pub threshold: f32,
    /// Sample the transformed vector output
    pub transformed: bool,
    /// Swap 0 and 1
    pub inverted: bool,
    /// Divide by the amplitude offset before thresholding
    pub normalized: bool,
    /// Read backwards
    pub reversed: bool,
}

impl TriggerAxisConfig {
    /// Sampling spec for this axis following `component`.
    #[must_use]
    pub const fn spec(&self, component: Component) -> TriggerSpec {
        TriggerSpec {
            component,
            num_steps: self.steps,
            threshold: self.threshold,
            transformed: self.transformed,
            inverted: self.inverted,
            normalized: self.normalized,
        }
    }
}

impl Default for TriggerAxisConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_NUM_STEPS,
            threshold: DEFAULT_THRESHOLD,
            transformed: false,
            inverted: false,
            normalized: false,
            reversed: false,
        }
    }
}

/// One value axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueAxisConfig {
    /// Number of steps
    pub steps: usize,
    /// Quantization levels; 0 or 1 passes samples through
    pub levels: usize,
    /// Sample the transformed vector output
    pub transformed: bool,
    /// Read backwards
    pub reversed: bool,
}

impl ValueAxisConfig {
    /// Sampling spec for this axis following `component`.
    #[must_use]
    pub const fn spec(&self, component: Component) -> ValueSpec {
        ValueSpec {
            component,
            num_steps: self.steps,
            num_quant_levels: self.levels,
            transformed: self.transformed,
        }
    }
}

impl Default for ValueAxisConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_NUM_STEPS,
            levels: DEFAULT_QUANT_LEVELS,
            transformed: false,
            reversed: false,
        }
    }
}

/// The vector axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorAxisConfig {
    /// Number of steps
    pub steps: usize,
    /// Sample the transformed vector output
    pub transformed: bool,
    /// Read backwards
    pub reversed: bool,
}

impl VectorAxisConfig {
    /// Sampling spec for the vector axis.
    #[must_use]
    pub const fn spec(&self) -> VectorSpec {
        VectorSpec {
            num_steps: self.steps,
            transformed: self.transformed,
        }
    }
}

impl Default for VectorAxisConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_NUM_STEPS,
            transformed: false,
            reversed: false,
        }
    }
}

/// One setting per component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerComponent<T> {
    /// X component setting
    pub x: T,
    /// Y component setting
    pub y: T,
    /// Z component setting
    pub z: T,
}

impl<T> PerComponent<T> {
    /// Setting for `component`.
    #[must_use]
    pub const fn get(&self, component: Component) -> &T {
        match component {
            Component::X => &self.x,
            Component::Y => &self.y,
            Component::Z => &self.z,
        }
    }

    /// Mutable setting for `component`.
    pub fn get_mut(&mut self, component: Component) -> &mut T {
        match component {
            Component::X => &mut self.x,
            Component::Y => &mut self.y,
            Component::Z => &mut self.z,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Macro step settings
    pub macro_step: MacroStepConfig,
    /// Global curve parameters
    pub curve: CurveParams,
    /// Trigger axes
    pub triggers: PerComponent<TriggerAxisConfig>,
    /// Value axes
    pub values: PerComponent<ValueAxisConfig>,
    /// Vector axis
    pub vectors: VectorAxisConfig,
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidConfig`] if the text is not valid TOML
    /// or a field has the wrong type.
    pub fn from_toml_str(text: &str) -> PatternResult<Self> {
        toml::from_str(text).map_err(|e| PatternError::InvalidConfig(e.to_string()))
    }

    /// Encodes this configuration as TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::ConfigEncode`] if a value cannot be
    /// represented in TOML (e.g. a NaN threshold).
    pub fn to_toml_string(&self) -> PatternResult<String> {
        toml::to_string(self).map_err(|e| PatternError::ConfigEncode(e.to_string()))
    }
}
