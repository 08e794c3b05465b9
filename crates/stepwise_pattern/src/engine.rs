//! # Pattern Engine
//!
//! Seven cached sequences sampled from one shared curve:
//!
//! ```text
//!                     ┌──────────────────────────────┐
//!                     │  RwLock<CurveState>          │  control side only
//!                     │  curve: Arc<dyn Curve>       │
//!                     │  params: CurveParams         │
//!                     └──────────────┬───────────────┘
//!                                    │ sample + publish
//!        ┌──────────────┬────────────┼─────────────┬──────────────┐
//!        ▼              ▼            ▼             ▼              ▼
//!   trigger.x/y/z   value.x/y/z    vector     macro cursor    sync flag
//!        │              │            │             │
//!        └──────────────┴────────────┴─────────────┘
//!                        lock-free reads (render/audio tick)
//! ```
//!
//! ## Roles
//!
//! - **Reader** (one real-time thread): `next*`, `*_at`, `*_at_index`.
//!   Never locks, never allocates, never samples the curve.
//! - **Writer** (control thread): setters. Global setters take the curve
//!   lock exclusively and resample all seven axes; per-axis setters take it
//!   shared and resample one axis.
//!
//! A global setter refreshes the axes one after another. A reader may see
//! some axes on the new snapshot and others still on the previous one for
//! the duration of that refresh.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockWriteGuard};
use stepwise_shared::{Bounding, Vec3};

use crate::config::EngineConfig;
use crate::curve::{Component, Curve, CurveParams, ShapedCurve};
use crate::sequencer::{AxisSequencer, AxisSpec, Axis, TriggerSpec, ValueSpec, VectorSpec};

/// One macro step: `[trigger, value]` for X, Y and Z, in that order.
pub type MacroStep = [[f32; 2]; 3];

/// The curve and the parameters it is sampled with.
struct CurveState {
    curve: Arc<dyn Curve>,
    params: CurveParams,
}

/// Curve-sampled step sequencer with six scalar axes and one vector axis.
///
/// Share it between the reader and writer threads with an `Arc`.
///
/// ## Usage
///
/// ```rust,ignore
/// let engine = Arc::new(PatternEngine::new());
///
/// // Control thread
/// engine.set_num_steps(Axis::Trigger(Component::Y), 8);
/// engine.set_threshold(Component::Y, 0.6);
///
/// // Audio thread, once per tick
/// let [x, y, z] = engine.next();
/// if y[0] > 0.0 {
///     fire(y[1]);
/// }
/// ```
///
/// ## Writer Discipline
///
/// Same-axis writers are serialized internally, so concurrent control
/// threads cannot corrupt a sequence. The order in which their changes land
/// is still whatever order they win the locks in; funnel related changes
/// through one thread when the order matters.
pub struct PatternEngine {
    curve: RwLock<CurveState>,
    triggers: [AxisSequencer<TriggerSpec>; 3],
    values: [AxisSequencer<ValueSpec>; 3],
    vectors: AxisSequencer<VectorSpec>,
    next_cursor: AtomicUsize,
    num_next_steps: AtomicUsize,
    sync_on_wrap: AtomicBool,
}

impl PatternEngine {
    /// Creates an engine with the identity curve and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_curve(Arc::new(ShapedCurve::identity()))
    }

    /// Creates an engine sampling `curve` with default settings.
    #[must_use]
    pub fn with_curve(curve: Arc<dyn Curve>) -> Self {
        Self::from_config_with_curve(&EngineConfig::default(), curve)
    }

    /// Creates an engine with the identity curve and `config`.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::from_config_with_curve(config, Arc::new(ShapedCurve::identity()))
    }

    /// Creates an engine sampling `curve` with `config`.
    ///
    /// Every cache is populated before this returns.
    #[must_use]
    pub fn from_config_with_curve(config: &EngineConfig, curve: Arc<dyn Curve>) -> Self {
        let params = config.curve;
        let triggers = Component::ALL.map(|c| {
            let axis = config.triggers.get(c);
            let seq = AxisSequencer::new(axis.spec(c), curve.as_ref(), &params);
            seq.set_reversed(axis.reversed);
            seq
        });
        let values = Component::ALL.map(|c| {
            let axis = config.values.get(c);
            let seq = AxisSequencer::new(axis.spec(c), curve.as_ref(), &params);
            seq.set_reversed(axis.reversed);
            seq
        });
        let vectors = AxisSequencer::new(config.vectors.spec(), curve.as_ref(), &params);
        vectors.set_reversed(config.vectors.reversed);

        let num_next_steps = sanitize_next_steps(config.macro_step.steps);
        tracing::info!(
            next_steps = num_next_steps,
            sync_on_wrap = config.macro_step.sync_on_wrap,
            "pattern engine ready"
        );

        Self {
            curve: RwLock::new(CurveState { curve, params }),
            triggers,
            values,
            vectors,
            next_cursor: AtomicUsize::new(0),
            num_next_steps: AtomicUsize::new(num_next_steps),
            sync_on_wrap: AtomicBool::new(config.macro_step.sync_on_wrap),
        }
    }

    /// Current settings as a configuration record.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        let mut config = EngineConfig {
            curve: self.curve_params(),
            ..EngineConfig::default()
        };
        config.macro_step.steps = self.num_next_steps();
        config.macro_step.sync_on_wrap = self.sync_on_wrap();
        for c in Component::ALL {
            let trig = self.trigger(c).spec();
            let out = config.triggers.get_mut(c);
            out.steps = trig.num_steps;
            out.threshold = trig.threshold;
            out.transformed = trig.transformed;
            out.inverted = trig.inverted;
            out.normalized = trig.normalized;
            out.reversed = self.trigger(c).is_reversed();

            let value = self.value(c).spec();
            let out = config.values.get_mut(c);
            out.steps = value.num_steps;
            out.levels = value.num_quant_levels;
            out.transformed = value.transformed;
            out.reversed = self.value(c).is_reversed();
        }
        let vectors = self.vectors.spec();
        config.vectors.steps = vectors.num_steps;
        config.vectors.transformed = vectors.transformed;
        config.vectors.reversed = self.vectors.is_reversed();
        config
    }

    #[inline]
    fn trigger(&self, component: Component) -> &AxisSequencer<TriggerSpec> {
        &self.triggers[component.index()]
    }

    #[inline]
    fn value(&self, component: Component) -> &AxisSequencer<ValueSpec> {
        &self.values[component.index()]
    }

    // =========================================================================
    // GLOBAL SETTERS (resample every axis)
    // =========================================================================

    /// Replaces the curve.
    pub fn set_curve(&self, curve: Arc<dyn Curve>) {
        tracing::info!("curve replaced");
        self.update_curve(|state| state.curve = curve);
    }

    /// Shared handle to the current curve.
    #[must_use]
    pub fn curve(&self) -> Arc<dyn Curve> {
        Arc::clone(&self.curve.read().curve)
    }

    /// Current global curve parameters.
    #[must_use]
    pub fn curve_params(&self) -> CurveParams {
        self.curve.read().params
    }

    /// Replaces all global curve parameters at once.
    pub fn set_curve_params(&self, params: CurveParams) {
        self.update_curve(|state| state.params = params);
    }

    /// Sets the amplitude offset.
    pub fn set_amp_offset(&self, amp_offset: f32) {
        self.update_curve(|state| state.params.amp_offset = amp_offset);
    }

    /// Sets the rate offset.
    pub fn set_rate_offset(&self, rate_offset: f32) {
        self.update_curve(|state| state.params.rate_offset = rate_offset);
    }

    /// Sets the phase offset.
    pub fn set_phase_offset(&self, phase_offset: f32) {
        self.update_curve(|state| state.params.phase_offset = phase_offset);
    }

    /// Sets the bias offset.
    pub fn set_bias_offset(&self, bias_offset: f32) {
        self.update_curve(|state| state.params.bias_offset = bias_offset);
    }

    /// Sets the rotation pivot offset for transformed samples.
    pub fn set_origin(&self, origin: Vec3) {
        self.update_curve(|state| state.params.transform.origin = origin);
    }

    /// Sets the translation for transformed samples.
    pub fn set_translation(&self, translation: Vec3) {
        self.update_curve(|state| state.params.transform.translation = translation);
    }

    /// Sets the scale for transformed samples.
    pub fn set_scale(&self, scale: Vec3) {
        self.update_curve(|state| state.params.transform.scale = scale);
    }

    /// Sets the rotation (degrees) for transformed samples.
    pub fn set_rotation(&self, rotation: f32) {
        self.update_curve(|state| state.params.transform.rotation = rotation);
    }

    /// Sets how vector samples are kept inside the unit cube.
    pub fn set_bounding_mode(&self, bounding: Bounding) {
        self.update_curve(|state| state.params.bounding = bounding);
    }

    /// Resamples every axis with the current curve and settings.
    pub fn recompute_all(&self) {
        let state = self.curve.read();
        self.recompute_with(&state);
    }

    fn update_curve(&self, edit: impl FnOnce(&mut CurveState)) {
        let mut state = self.curve.write();
        edit(&mut state);
        // Per-axis writers may sample again once the new state is in place.
        let state = RwLockWriteGuard::downgrade(state);
        self.recompute_with(&state);
    }

    fn recompute_with(&self, state: &CurveState) {
        let curve = state.curve.as_ref();
        for seq in &self.triggers {
            seq.recompute(curve, &state.params);
        }
        for seq in &self.values {
            seq.recompute(curve, &state.params);
        }
        self.vectors.recompute(curve, &state.params);
    }

    // =========================================================================
    // PER-AXIS SETTERS (resample one axis)
    // =========================================================================

    /// Sets the step count of an axis. 0 is clamped to 1.
    pub fn set_num_steps(&self, axis: Axis, num_steps: usize) {
        self.update_axis(axis, |s: &mut dyn SpecFields| s.steps(num_steps));
    }

    /// Sets whether an axis samples the transformed vector output.
    pub fn set_transformed(&self, axis: Axis, transformed: bool) {
        self.update_axis(axis, |s: &mut dyn SpecFields| s.transformed(transformed));
    }

    /// Sets the trigger threshold of a component, clamped into [0, 1].
    pub fn set_threshold(&self, component: Component, threshold: f32) {
        let state = self.curve.read();
        self.trigger(component)
            .update(state.curve.as_ref(), &state.params, |s| s.threshold = threshold);
    }

    /// Sets whether a component's triggers are inverted.
    pub fn set_inverted(&self, component: Component, inverted: bool) {
        let state = self.curve.read();
        self.trigger(component)
            .update(state.curve.as_ref(), &state.params, |s| s.inverted = inverted);
    }

    /// Sets whether a component's trigger samples are amplitude-normalized.
    pub fn set_normalized(&self, component: Component, normalized: bool) {
        let state = self.curve.read();
        self.trigger(component)
            .update(state.curve.as_ref(), &state.params, |s| s.normalized = normalized);
    }

    /// Sets the quantization level count of a component's values.
    ///
    /// 0 and 1 both disable quantization.
    pub fn set_num_quant_levels(&self, component: Component, levels: usize) {
        let state = self.curve.read();
        self.value(component)
            .update(state.curve.as_ref(), &state.params, |s| s.num_quant_levels = levels);
    }

    /// Sets the read direction of an axis. The contents are unchanged.
    pub fn set_reversed(&self, axis: Axis, reversed: bool) {
        match axis {
            Axis::Trigger(c) => self.trigger(c).set_reversed(reversed),
            Axis::Value(c) => self.value(c).set_reversed(reversed),
            Axis::Vector => self.vectors.set_reversed(reversed),
        }
    }

    fn update_axis(&self, axis: Axis, edit: impl FnOnce(&mut dyn SpecFields)) {
        let state = self.curve.read();
        let curve = state.curve.as_ref();
        match axis {
            Axis::Trigger(c) => self.trigger(c).update(curve, &state.params, |s| edit(s)),
            Axis::Value(c) => self.value(c).update(curve, &state.params, |s| edit(s)),
            Axis::Vector => self.vectors.update(curve, &state.params, |s| edit(s)),
        }
    }

    // =========================================================================
    // MACRO STEP SETTINGS
    // =========================================================================

    /// Sets the number of macro steps between wraps. 0 is clamped to 1.
    pub fn set_num_next_steps(&self, num_steps: usize) {
        self.num_next_steps
            .store(sanitize_next_steps(num_steps), Ordering::Relaxed);
    }

    /// Macro steps between wraps.
    #[must_use]
    pub fn num_next_steps(&self) -> usize {
        self.num_next_steps.load(Ordering::Relaxed)
    }

    /// Sets whether a macro wrap resets every axis cursor.
    pub fn set_sync_on_wrap(&self, sync: bool) {
        self.sync_on_wrap.store(sync, Ordering::Relaxed);
    }

    /// Whether a macro wrap resets every axis cursor.
    #[must_use]
    pub fn sync_on_wrap(&self) -> bool {
        self.sync_on_wrap.load(Ordering::Relaxed)
    }

    // =========================================================================
    // CONTROL-SIDE GETTERS
    // =========================================================================

    /// Configured step count of an axis.
    #[must_use]
    pub fn num_steps(&self, axis: Axis) -> usize {
        match axis {
            Axis::Trigger(c) => self.trigger(c).spec().num_steps(),
            Axis::Value(c) => self.value(c).spec().num_steps(),
            Axis::Vector => self.vectors.spec().num_steps(),
        }
    }

    /// Whether an axis samples the transformed vector output.
    #[must_use]
    pub fn is_transformed(&self, axis: Axis) -> bool {
        match axis {
            Axis::Trigger(c) => self.trigger(c).spec().is_transformed(),
            Axis::Value(c) => self.value(c).spec().is_transformed(),
            Axis::Vector => self.vectors.spec().is_transformed(),
        }
    }

    /// Whether an axis reads backwards.
    #[must_use]
    pub fn is_reversed(&self, axis: Axis) -> bool {
        match axis {
            Axis::Trigger(c) => self.trigger(c).is_reversed(),
            Axis::Value(c) => self.value(c).is_reversed(),
            Axis::Vector => self.vectors.is_reversed(),
        }
    }

    /// Trigger threshold of a component.
    #[must_use]
    pub fn threshold(&self, component: Component) -> f32 {
        self.trigger(component).spec().threshold
    }

    /// Whether a component's triggers are inverted.
    #[must_use]
    pub fn is_inverted(&self, component: Component) -> bool {
        self.trigger(component).spec().inverted
    }

    /// Whether a component's trigger samples are amplitude-normalized.
    #[must_use]
    pub fn is_normalized(&self, component: Component) -> bool {
        self.trigger(component).spec().normalized
    }

    /// Quantization level count of a component's values.
    #[must_use]
    pub fn num_quant_levels(&self, component: Component) -> usize {
        self.value(component).spec().num_quant_levels
    }

    /// Length of an axis's active sequence.
    #[must_use]
    pub fn len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Trigger(c) => self.trigger(c).len(),
            Axis::Value(c) => self.value(c).len(),
            Axis::Vector => self.vectors.len(),
        }
    }

    /// Number of sequences an axis has published since construction.
    #[must_use]
    pub fn generation(&self, axis: Axis) -> u64 {
        match axis {
            Axis::Trigger(c) => self.trigger(c).generation(),
            Axis::Value(c) => self.value(c).generation(),
            Axis::Vector => self.vectors.generation(),
        }
    }

    // =========================================================================
    // SNAPSHOTS & PREVIEWS (allocate; control side)
    // =========================================================================

    /// Copy of a component's active trigger sequence.
    #[must_use]
    pub fn triggers(&self, component: Component) -> Vec<f32> {
        self.trigger(component).snapshot()
    }

    /// Copy of a component's active value sequence.
    #[must_use]
    pub fn values(&self, component: Component) -> Vec<f32> {
        self.value(component).snapshot()
    }

    /// Copy of the active vector sequence.
    #[must_use]
    pub fn vectors(&self) -> Vec<Vec3> {
        self.vectors.snapshot()
    }

    /// Samples a trigger sequence with optional overrides, without touching
    /// the cache.
    #[must_use]
    pub fn sample_triggers(
        &self,
        component: Component,
        num_steps: Option<usize>,
        threshold: Option<f32>,
    ) -> Vec<f32> {
        let state = self.curve.read();
        self.trigger(component)
            .preview(state.curve.as_ref(), &state.params, |s| {
                if let Some(n) = num_steps {
                    s.num_steps = n;
                }
                if let Some(t) = threshold {
                    s.threshold = t;
                }
            })
    }

    /// Samples a value sequence with optional overrides, without touching
    /// the cache.
    #[must_use]
    pub fn sample_values(
        &self,
        component: Component,
        num_steps: Option<usize>,
        levels: Option<usize>,
    ) -> Vec<f32> {
        let state = self.curve.read();
        self.value(component)
            .preview(state.curve.as_ref(), &state.params, |s| {
                if let Some(n) = num_steps {
                    s.num_steps = n;
                }
                if let Some(l) = levels {
                    s.num_quant_levels = l;
                }
            })
    }

    /// Samples a vector sequence with optional overrides, without touching
    /// the cache.
    #[must_use]
    pub fn sample_vectors(&self, num_steps: Option<usize>, transformed: Option<bool>) -> Vec<Vec3> {
        let state = self.curve.read();
        self.vectors.preview(state.curve.as_ref(), &state.params, |s| {
            if let Some(n) = num_steps {
                s.num_steps = n;
            }
            if let Some(t) = transformed {
                s.transformed = t;
            }
        })
    }

    // =========================================================================
    // READ PATH (lock-free, allocation-free)
    // =========================================================================

    /// Advances one macro step and returns `[trigger, value]` per component.
    ///
    /// After `num_next_steps` macro steps the macro cursor wraps to 0 and,
    /// with `sync_on_wrap` set, every axis cursor returns to its start
    /// before the next read.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> MacroStep {
        let mut index = self.next_cursor.load(Ordering::Relaxed);
        if index >= self.num_next_steps.load(Ordering::Relaxed) {
            index = 0;
            if self.sync_on_wrap.load(Ordering::Relaxed) {
                self.sync();
            }
        }
        self.next_cursor.store(index + 1, Ordering::Relaxed);
        Component::ALL.map(|c| [self.trigger(c).next(), self.value(c).next()])
    }

    /// Returns the current trigger of a component and advances its cursor.
    #[inline]
    pub fn next_trigger(&self, component: Component) -> f32 {
        self.trigger(component).next()
    }

    /// Returns the current value of a component and advances its cursor.
    #[inline]
    pub fn next_value(&self, component: Component) -> f32 {
        self.value(component).next()
    }

    /// Returns the current vector and advances its cursor.
    #[inline]
    pub fn next_vector(&self) -> Vec3 {
        self.vectors.next()
    }

    /// Trigger at normalized position `pos`.
    #[inline]
    #[must_use]
    pub fn trigger_at(&self, component: Component, pos: f32) -> f32 {
        self.trigger(component).at_position(pos)
    }

    /// Value at normalized position `pos`.
    #[inline]
    #[must_use]
    pub fn value_at(&self, component: Component, pos: f32) -> f32 {
        self.value(component).at_position(pos)
    }

    /// Vector at normalized position `pos`.
    #[inline]
    #[must_use]
    pub fn vector_at(&self, pos: f32) -> Vec3 {
        self.vectors.at_position(pos)
    }

    /// Trigger at `index` modulo the length.
    #[inline]
    #[must_use]
    pub fn trigger_at_index(&self, component: Component, index: isize) -> f32 {
        self.trigger(component).at_index(index)
    }

    /// Value at `index` modulo the length.
    #[inline]
    #[must_use]
    pub fn value_at_index(&self, component: Component, index: isize) -> f32 {
        self.value(component).at_index(index)
    }

    /// Vector at `index` modulo the length.
    #[inline]
    #[must_use]
    pub fn vector_at_index(&self, index: isize) -> Vec3 {
        self.vectors.at_index(index)
    }

    // =========================================================================
    // CURSOR RESETS
    // =========================================================================

    /// Returns every axis cursor to its start. The macro cursor is kept.
    pub fn sync(&self) {
        for seq in &self.triggers {
            seq.reset();
        }
        for seq in &self.values {
            seq.reset();
        }
        self.vectors.reset();
    }

    /// Returns one axis cursor to its start.
    pub fn reset(&self, axis: Axis) {
        match axis {
            Axis::Trigger(c) => self.trigger(c).reset(),
            Axis::Value(c) => self.value(c).reset(),
            Axis::Vector => self.vectors.reset(),
        }
    }

    /// Returns the macro cursor to 0.
    pub fn reset_next(&self) {
        self.next_cursor.store(0, Ordering::Relaxed);
    }
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PatternEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternEngine")
            .field("params", &self.curve_params())
            .field("num_next_steps", &self.num_next_steps())
            .field("sync_on_wrap", &self.sync_on_wrap())
            .finish_non_exhaustive()
    }
}

/// Clamps the macro step count to at least one step.
fn sanitize_next_steps(num_steps: usize) -> usize {
    if num_steps == 0 {
        tracing::warn!("macro step count 0 clamped to 1");
        1
    } else {
        num_steps
    }
}

/// The fields every axis kind shares, as an object-safe view.
trait SpecFields {
    fn steps(&mut self, num_steps: usize);
    fn transformed(&mut self, transformed: bool);
}

impl<S: AxisSpec> SpecFields for S {
    fn steps(&mut self, num_steps: usize) {
        self.set_num_steps(num_steps);
    }

    fn transformed(&mut self, transformed: bool) {
        self.set_transformed(transformed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::ConstantCurve;

    fn constant_engine(value: f32) -> PatternEngine {
        PatternEngine::with_curve(Arc::new(ConstantCurve::new(value)))
    }

    #[test]
    fn test_defaults_populated() {
        let engine = PatternEngine::new();
        for c in Component::ALL {
            assert_eq!(engine.len(Axis::Trigger(c)), 16);
            assert_eq!(engine.len(Axis::Value(c)), 16);
            assert_eq!(engine.threshold(c), 0.5);
            assert_eq!(engine.num_quant_levels(c), 0);
        }
        assert_eq!(engine.len(Axis::Vector), 16);
        assert_eq!(engine.num_next_steps(), 16);
        assert!(engine.sync_on_wrap());
        assert_eq!(engine.curve_params(), CurveParams::NEUTRAL);
    }

    #[test]
    fn test_per_axis_setter_touches_one_axis() {
        let engine = PatternEngine::new();
        let before: Vec<u64> = Component::ALL
            .iter()
            .map(|&c| engine.generation(Axis::Value(c)))
            .collect();

        engine.set_num_steps(Axis::Value(Component::Y), 4);

        assert_eq!(engine.len(Axis::Value(Component::Y)), 4);
        assert_eq!(engine.generation(Axis::Value(Component::Y)), before[1] + 1);
        assert_eq!(engine.generation(Axis::Value(Component::X)), before[0]);
        assert_eq!(engine.generation(Axis::Value(Component::Z)), before[2]);
        assert_eq!(engine.generation(Axis::Trigger(Component::Y)), 0);
    }

    #[test]
    fn test_global_setter_touches_every_axis() {
        let engine = PatternEngine::new();
        engine.set_amp_offset(0.5);

        for c in Component::ALL {
            assert_eq!(engine.generation(Axis::Trigger(c)), 1);
            assert_eq!(engine.generation(Axis::Value(c)), 1);
        }
        assert_eq!(engine.generation(Axis::Vector), 1);
        assert_eq!(engine.curve_params().amp_offset, 0.5);
    }

    #[test]
    fn test_amp_offset_changes_values() {
        let engine = PatternEngine::new();
        engine.set_num_steps(Axis::Value(Component::Y), 4);
        let full = engine.values(Component::Y);
        assert!((full[2] - 0.5).abs() < 1e-6);

        engine.set_amp_offset(0.5);
        let half = engine.values(Component::Y);
        assert!((half[2] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_set_curve_resamples() {
        let engine = constant_engine(0.2);
        assert_eq!(engine.triggers(Component::Y), vec![0.0; 16]);

        engine.set_curve(Arc::new(ConstantCurve::new(0.8)));
        assert_eq!(engine.triggers(Component::Y), vec![1.0; 16]);
    }

    #[test]
    fn test_set_reversed_keeps_contents() {
        let engine = PatternEngine::new();
        let generation = engine.generation(Axis::Value(Component::X));
        engine.set_reversed(Axis::Value(Component::X), true);
        assert!(engine.is_reversed(Axis::Value(Component::X)));
        assert_eq!(engine.generation(Axis::Value(Component::X)), generation);
    }

    #[test]
    fn test_transformed_and_inverted_flags() {
        let engine = constant_engine(0.7);
        engine.set_transformed(Axis::Trigger(Component::X), true);
        engine.set_transformed(Axis::Vector, true);
        assert!(engine.is_transformed(Axis::Trigger(Component::X)));
        assert!(engine.is_transformed(Axis::Vector));
        assert!(!engine.is_transformed(Axis::Value(Component::X)));

        engine.set_inverted(Component::Z, true);
        assert!(engine.is_inverted(Component::Z));
        assert_eq!(engine.triggers(Component::Z), vec![0.0; 16]);
    }

    #[test]
    fn test_macro_step_pairs() {
        let engine = PatternEngine::new();
        engine.set_num_steps(Axis::Value(Component::X), 4);
        engine.set_threshold(Component::X, 0.3);
        engine.set_num_steps(Axis::Trigger(Component::X), 4);

        let steps: Vec<MacroStep> = (0..4).map(|_| engine.next()).collect();
        let xs: Vec<[f32; 2]> = steps.iter().map(|s| s[0]).collect();
        // Ramp X: positions 0, .25, .5, .75; trigger fires above 0.3.
        assert_eq!(xs, vec![[0.0, 0.0], [0.0, 0.25], [1.0, 0.5], [1.0, 0.75]]);
    }

    #[test]
    fn test_macro_wrap_syncs_axes() {
        let engine = PatternEngine::new();
        engine.set_num_steps(Axis::Value(Component::X), 3);
        engine.set_num_next_steps(4);

        let xs: Vec<f32> = (0..8).map(|_| engine.next()[0][1]).collect();
        let third = 1.0 / 3.0;
        let two_thirds = 2.0 / 3.0;
        let expected = [0.0, third, two_thirds, 0.0, 0.0, third, two_thirds, 0.0];
        for (got, want) in xs.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{xs:?}");
        }
    }

    #[test]
    fn test_macro_wrap_without_sync_drifts() {
        let engine = PatternEngine::new();
        engine.set_num_steps(Axis::Value(Component::X), 3);
        engine.set_num_next_steps(4);
        engine.set_sync_on_wrap(false);

        let xs: Vec<f32> = (0..5).map(|_| engine.next()[0][1]).collect();
        // Fifth read continues the 3-step cycle instead of restarting.
        assert!((xs[4] - 1.0 / 3.0).abs() < 1e-6, "{xs:?}");
    }

    #[test]
    fn test_sync_and_resets() {
        let engine = PatternEngine::new();
        engine.set_num_steps(Axis::Value(Component::Z), 4);
        for _ in 0..3 {
            let _ = engine.next_trigger(Component::Y);
            let _ = engine.next_vector();
        }
        let _ = engine.next();

        engine.sync();
        assert_eq!(engine.next_vector(), engine.vector_at_index(0));

        engine.reset_next();
        engine.reset(Axis::Trigger(Component::Y));
        assert_eq!(engine.next_trigger(Component::Y), engine.trigger_at_index(Component::Y, 0));
    }

    #[test]
    fn test_zero_steps_clamped() {
        let engine = PatternEngine::new();
        engine.set_num_steps(Axis::Trigger(Component::Z), 0);
        engine.set_num_next_steps(0);
        assert_eq!(engine.num_steps(Axis::Trigger(Component::Z)), 1);
        assert_eq!(engine.len(Axis::Trigger(Component::Z)), 1);
        assert_eq!(engine.num_next_steps(), 1);
    }

    #[test]
    fn test_previews_leave_cache_alone() {
        let engine = constant_engine(0.7);
        assert_eq!(engine.sample_triggers(Component::Y, Some(3), Some(0.9)), vec![0.0; 3]);
        assert_eq!(engine.sample_values(Component::Y, Some(2), Some(2)), vec![1.0; 2]);
        assert_eq!(engine.sample_vectors(Some(1), None), vec![Vec3::splat(0.7)]);

        assert_eq!(engine.triggers(Component::Y), vec![1.0; 16]);
        assert_eq!(engine.generation(Axis::Trigger(Component::Y)), 0);
    }

    #[test]
    fn test_config_round_trip_through_engine() {
        let mut config = EngineConfig::default();
        config.triggers.y.steps = 4;
        config.triggers.y.threshold = 0.9;
        config.values.x.levels = 3;
        config.vectors.reversed = true;
        config.macro_step.sync_on_wrap = false;

        let engine = PatternEngine::from_config(&config);
        assert_eq!(engine.config(), config);
    }
}
