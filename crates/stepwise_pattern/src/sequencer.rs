//! # Axis Sequencers
//!
//! One [`AxisSequencer`] per cached sequence. The sequencer owns:
//!
//! ```text
//! ┌──────────────────────── AxisSequencer<S> ────────────────────────┐
//! │  spec: Mutex<S>        control side only (config record)         │
//! │  buffer: DoubleBuffer  sampled sequence, published on change     │
//! │  cursor: AtomicUsize   read position                             │
//! │  reversed: AtomicBool  read direction                            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The read path (`next`, `at_position`, `at_index`) touches only the
//! buffer and the two atomics. The spec mutex serializes writers of one
//! axis and keeps each configuration record consistent, so a resample
//! never mixes fields from two different updates.
//!
//! The three kinds of sequence differ only in their [`AxisSpec`]:
//! [`TriggerSpec`] (0/1 gates), [`ValueSpec`] (quantized levels) and
//! [`VectorSpec`] (raw 3D points).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use stepwise_core::DoubleBuffer;
use stepwise_shared::{Vec3, DEFAULT_NUM_STEPS, DEFAULT_QUANT_LEVELS, DEFAULT_THRESHOLD};

use crate::curve::{Component, Curve, CurveParams};
use crate::quantize::quantize;

/// Identifies one of the seven sequences of a pattern engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// 0/1 trigger sequence following a component
    Trigger(Component),
    /// Quantized value sequence following a component
    Value(Component),
    /// 3D vector sequence
    Vector,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trigger(c) => write!(f, "trigger.{c}"),
            Self::Value(c) => write!(f, "value.{c}"),
            Self::Vector => f.write_str("vector"),
        }
    }
}

/// Sampling configuration for one kind of sequence.
///
/// A spec is an immutable record from the reader's point of view: the
/// sequencer swaps in a whole new sequence whenever any field changes.
pub trait AxisSpec: Clone + Send {
    /// Element type of the sampled sequence.
    type Item: Copy + Default + Send + Sync;

    /// Which sequence this spec describes.
    fn axis(&self) -> Axis;

    /// Number of steps to sample.
    fn num_steps(&self) -> usize;

    /// Changes the number of steps to sample.
    fn set_num_steps(&mut self, num_steps: usize);

    /// Whether samples come from the transformed vector output.
    fn is_transformed(&self) -> bool;

    /// Changes whether samples come from the transformed vector output.
    fn set_transformed(&mut self, transformed: bool);

    /// Brings every field into its valid range.
    ///
    /// Out-of-range values are clamped, never rejected.
    fn sanitize(&mut self);

    /// Samples the item at normalized position `pos`.
    fn sample_at(&self, curve: &dyn Curve, params: &CurveParams, pos: f32) -> Self::Item;

    /// Samples the whole sequence at `num_steps` evenly spaced positions.
    ///
    /// Step `i` samples position `i / num_steps`, so every position lies in
    /// [0, 1) and a single step samples position 0.
    #[allow(clippy::cast_precision_loss)]
    fn sample(&self, curve: &dyn Curve, params: &CurveParams) -> Vec<Self::Item> {
        let steps = self.num_steps().max(1);
        let step_size = 1.0 / steps as f32;
        (0..steps)
            .map(|i| self.sample_at(curve, params, i as f32 * step_size))
            .collect()
    }
}

/// Clamps a step count to at least one step.
fn sanitize_steps(axis: Axis, num_steps: usize) -> usize {
    if num_steps == 0 {
        tracing::warn!(%axis, "step count 0 clamped to 1");
        1
    } else {
        num_steps
    }
}

/// Reads one scalar component, from the transformed vector when asked.
fn sample_component(
    curve: &dyn Curve,
    params: &CurveParams,
    component: Component,
    transformed: bool,
    pos: f32,
) -> f32 {
    if transformed {
        component.of(curve.vector_at(params, pos, true))
    } else {
        curve.component_at(params, component, pos)
    }
}

/// Trigger sequence: `1.0` where the curve is strictly above the threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerSpec {
    /// Component the triggers follow
    pub component: Component,
    /// Number of steps
    pub num_steps: usize,
    /// Gate level in [0, 1]; a sample must exceed it to fire
    pub threshold: f32,
    /// Sample the transformed vector output
    pub transformed: bool,
    /// Swap 0 and 1 after thresholding
    pub inverted: bool,
    /// Divide samples by the amplitude offset before thresholding
    pub normalized: bool,
}

impl TriggerSpec {
    /// Default trigger spec for a component.
    #[must_use]
    pub const fn new(component: Component) -> Self {
        Self {
            component,
            num_steps: DEFAULT_NUM_STEPS,
            threshold: DEFAULT_THRESHOLD,
            transformed: false,
            inverted: false,
            normalized: false,
        }
    }

    /// Classifies one raw sample as a trigger.
    #[inline]
    #[must_use]
    pub fn classify(&self, sample: f32, params: &CurveParams) -> f32 {
        let sample = if self.normalized && params.amp_offset != 0.0 {
            sample / params.amp_offset
        } else {
            sample
        };
        let fired = sample > self.threshold;
        if fired != self.inverted {
            1.0
        } else {
            0.0
        }
    }
}

impl AxisSpec for TriggerSpec {
    type Item = f32;

    fn axis(&self) -> Axis {
        Axis::Trigger(self.component)
    }

    fn num_steps(&self) -> usize {
        self.num_steps
    }

    fn set_num_steps(&mut self, num_steps: usize) {
        self.num_steps = num_steps;
    }

    fn is_transformed(&self) -> bool {
        self.transformed
    }

    fn set_transformed(&mut self, transformed: bool) {
        self.transformed = transformed;
    }

    fn sanitize(&mut self) {
        self.num_steps = sanitize_steps(self.axis(), self.num_steps);
        if !self.threshold.is_finite() {
            tracing::warn!(axis = %self.axis(), threshold = self.threshold, "non-finite threshold reset to default");
            self.threshold = DEFAULT_THRESHOLD;
        } else if !(0.0..=1.0).contains(&self.threshold) {
            let clamped = self.threshold.clamp(0.0, 1.0);
            tracing::warn!(axis = %self.axis(), threshold = self.threshold, clamped, "threshold clamped");
            self.threshold = clamped;
        }
    }

    fn sample_at(&self, curve: &dyn Curve, params: &CurveParams, pos: f32) -> f32 {
        let sample = sample_component(curve, params, self.component, self.transformed, pos);
        self.classify(sample, params)
    }
}

/// Value sequence: curve samples snapped to a level grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueSpec {
    /// Component the values follow
    pub component: Component,
    /// Number of steps
    pub num_steps: usize,
    /// Quantization levels; 0 or 1 passes samples through
    pub num_quant_levels: usize,
    /// Sample the transformed vector output
    pub transformed: bool,
}

impl ValueSpec {
    /// Default value spec for a component.
    #[must_use]
    pub const fn new(component: Component) -> Self {
        Self {
            component,
            num_steps: DEFAULT_NUM_STEPS,
            num_quant_levels: DEFAULT_QUANT_LEVELS,
            transformed: false,
        }
    }
}

impl AxisSpec for ValueSpec {
    type Item = f32;

    fn axis(&self) -> Axis {
        Axis::Value(self.component)
    }

    fn num_steps(&self) -> usize {
        self.num_steps
    }

    fn set_num_steps(&mut self, num_steps: usize) {
        self.num_steps = num_steps;
    }

    fn is_transformed(&self) -> bool {
        self.transformed
    }

    fn set_transformed(&mut self, transformed: bool) {
        self.transformed = transformed;
    }

    fn sanitize(&mut self) {
        self.num_steps = sanitize_steps(self.axis(), self.num_steps);
    }

    fn sample_at(&self, curve: &dyn Curve, params: &CurveParams, pos: f32) -> f32 {
        let sample = sample_component(curve, params, self.component, self.transformed, pos);
        quantize(sample, self.num_quant_levels)
    }
}

/// Vector sequence: whole 3D curve points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorSpec {
    /// Number of steps
    pub num_steps: usize,
    /// Sample the transformed vector output
    pub transformed: bool,
}

impl VectorSpec {
    /// Default vector spec.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            num_steps: DEFAULT_NUM_STEPS,
            transformed: false,
        }
    }
}

impl Default for VectorSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisSpec for VectorSpec {
    type Item = Vec3;

    fn axis(&self) -> Axis {
        Axis::Vector
    }

    fn num_steps(&self) -> usize {
        self.num_steps
    }

    fn set_num_steps(&mut self, num_steps: usize) {
        self.num_steps = num_steps;
    }

    fn is_transformed(&self) -> bool {
        self.transformed
    }

    fn set_transformed(&mut self, transformed: bool) {
        self.transformed = transformed;
    }

    fn sanitize(&mut self) {
        self.num_steps = sanitize_steps(self.axis(), self.num_steps);
    }

    fn sample_at(&self, curve: &dyn Curve, params: &CurveParams, pos: f32) -> Vec3 {
        curve.vector_at(params, pos, self.transformed)
    }
}

/// A cached, cursor-driven sequence for one axis.
///
/// ## Thread Safety
///
/// - Read methods take `&self`, never lock and never allocate.
/// - Control methods (`update`, `recompute`) lock the spec, sample the
///   curve and publish a new sequence. Two writers on the same axis are
///   serialized by that lock.
/// - The cursor is taken modulo the current length on every read, so a
///   shrinking republish can never index out of bounds.
pub struct AxisSequencer<S: AxisSpec> {
    spec: Mutex<S>,
    buffer: DoubleBuffer<S::Item>,
    cursor: AtomicUsize,
    reversed: AtomicBool,
}

impl<S: AxisSpec> AxisSequencer<S> {
    /// Creates a sequencer with its cache already populated.
    #[must_use]
    pub fn new(mut spec: S, curve: &dyn Curve, params: &CurveParams) -> Self {
        spec.sanitize();
        let values = spec.sample(curve, params);
        Self {
            spec: Mutex::new(spec),
            buffer: DoubleBuffer::new(values),
            cursor: AtomicUsize::new(0),
            reversed: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // CONTROL PATH
    // =========================================================================

    /// Copy of the current spec.
    #[must_use]
    pub fn spec(&self) -> S {
        self.spec.lock().clone()
    }

    /// Which axis this sequencer serves.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.spec.lock().axis()
    }

    /// Edits the spec, then resamples and publishes.
    pub fn update(&self, curve: &dyn Curve, params: &CurveParams, edit: impl FnOnce(&mut S)) {
        let mut spec = self.spec.lock();
        edit(&mut spec);
        spec.sanitize();
        self.publish(&spec, curve, params);
    }

    /// Resamples with the current spec and publishes.
    pub fn recompute(&self, curve: &dyn Curve, params: &CurveParams) {
        let spec = self.spec.lock();
        self.publish(&spec, curve, params);
    }

    /// Samples with the current spec without publishing.
    #[must_use]
    pub fn preview(&self, curve: &dyn Curve, params: &CurveParams, edit: impl FnOnce(&mut S)) -> Vec<S::Item> {
        let mut spec = self.spec();
        edit(&mut spec);
        spec.sanitize();
        spec.sample(curve, params)
    }

    fn publish(&self, spec: &S, curve: &dyn Curve, params: &CurveParams) {
        let values = spec.sample(curve, params);
        let len = values.len();
        // The spec lock makes this the only publisher for the buffer.
        if let Err(err) = self.buffer.publish(values) {
            tracing::warn!(axis = %spec.axis(), %err, "sequence publish dropped");
            return;
        }
        tracing::debug!(axis = %spec.axis(), steps = len, "axis recomputed");
    }

    /// Copy of the active sequence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<S::Item> {
        self.buffer.snapshot()
    }

    /// Number of sequences published since construction.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.buffer.generation()
    }

    // =========================================================================
    // READ PATH
    // =========================================================================

    /// Returns the step under the cursor, then moves the cursor one step.
    ///
    /// Forward: past the last step wraps to 0. Reversed: before step 0
    /// wraps to the last step.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> S::Item {
        let steps = self.buffer.read();
        let len = steps.len();
        if len == 0 {
            return S::Item::default();
        }

        let index = self.cursor.load(Ordering::Relaxed) % len;
        let item = steps[index];

        let following = if self.reversed.load(Ordering::Relaxed) {
            if index == 0 {
                len - 1
            } else {
                index - 1
            }
        } else if index + 1 >= len {
            0
        } else {
            index + 1
        };
        self.cursor.store(following, Ordering::Relaxed);
        item
    }

    /// Looks up the step at normalized position `pos` without moving the
    /// cursor.
    ///
    /// Reversed sequencers read position `1 - pos`. The position wraps
    /// into [0, 1) before scaling by the length.
    #[inline]
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn at_position(&self, pos: f32) -> S::Item {
        let pos = if self.reversed.load(Ordering::Relaxed) {
            1.0 - pos
        } else {
            pos
        };
        let steps = self.buffer.read();
        let len = steps.len();
        if len == 0 {
            return S::Item::default();
        }
        let index = (pos.rem_euclid(1.0) * len as f32).floor() as usize;
        steps[index % len]
    }

    /// Looks up the step at `index` modulo the length, without moving the
    /// cursor. Negative indices count back from the end.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn at_index(&self, index: isize) -> S::Item {
        let steps = self.buffer.read();
        let len = steps.len();
        if len == 0 {
            return S::Item::default();
        }
        steps[index.rem_euclid(len as isize) as usize]
    }

    /// Moves the cursor to the first step in the current direction
    /// (0 forward, last step reversed).
    #[inline]
    pub fn reset(&self) {
        let start = if self.reversed.load(Ordering::Relaxed) {
            self.buffer.len().saturating_sub(1)
        } else {
            0
        };
        self.cursor.store(start, Ordering::Relaxed);
    }

    /// Sets the read direction.
    #[inline]
    pub fn set_reversed(&self, reversed: bool) {
        self.reversed.store(reversed, Ordering::Relaxed);
    }

    /// Whether the cursor moves backwards.
    #[inline]
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed.load(Ordering::Relaxed)
    }

    /// Raw cursor position (may exceed the length after a shrink until the
    /// next read).
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    /// Length of the active sequence.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the active sequence is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl<S: AxisSpec + std::fmt::Debug> std::fmt::Debug for AxisSequencer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisSequencer")
            .field("spec", &*self.spec.lock())
            .field("len", &self.len())
            .field("cursor", &self.cursor())
            .field("reversed", &self.is_reversed())
            .finish_non_exhaustive()
    }
}
