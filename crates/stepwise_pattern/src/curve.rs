//! # Curve Boundary
//!
//! The engine never evaluates curve math itself. It consumes a curve
//! through [`Curve`], handing it a [`CurveParams`] snapshot by value on
//! every sampling call. Only the engine mutates the parameters; curves
//! stay pure functions of `(params, component, position)`.
//!
//! ## Conventions
//!
//! ```text
//! component_at(X, p) → p              (position on the curve)
//! component_at(Y, p) → shaped value   (amp/rate/phase/bias applied)
//! component_at(Z, p) → 0              (flat unless the curve says otherwise)
//!
//! vector_at(p, transformed) → bounding( transform?( [X, Y, Z] ) )
//! ```

use serde::{Deserialize, Serialize};
use stepwise_shared::{Bounding, Transform, Vec3};

/// One of the three vector components a sequence can follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// X component
    X,
    /// Y component
    Y,
    /// Z component
    Z,
}

impl Component {
    /// All components in index order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Position of this component in a vector (0, 1, 2).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Extracts this component from `v`.
    #[inline]
    #[must_use]
    pub const fn of(self, v: Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Global curve parameters, passed by value into every sampling call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Output amplitude (peak of the unipolar range)
    pub amp_offset: f32,
    /// Position multiplier
    pub rate_offset: f32,
    /// Added to the position after rate scaling
    pub phase_offset: f32,
    /// Added to the output after amplitude scaling
    pub bias_offset: f32,
    /// Geometric transform for transformed vector output
    pub transform: Transform,
    /// How vector output is kept inside the unit cube
    pub bounding: Bounding,
}

impl CurveParams {
    /// Neutral parameters: amp 1, rate 1, phase 0, bias 0, no transform.
    pub const NEUTRAL: Self = Self {
        amp_offset: 1.0,
        rate_offset: 1.0,
        phase_offset: 0.0,
        bias_offset: 0.0,
        transform: Transform::IDENTITY,
        bounding: Bounding::None,
    };
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A curve evaluator.
///
/// Implementations must be reentrant: the engine samples from the control
/// thread while holding only a shared reference.
pub trait Curve: Send + Sync {
    /// Evaluates one component at normalized position `pos` in [0, 1).
    fn component_at(&self, params: &CurveParams, component: Component, pos: f32) -> f32;

    /// Evaluates all three components at `pos`.
    ///
    /// When `transformed` is set the point goes through `params.transform`.
    /// The bounding mode is always applied last.
    fn vector_at(&self, params: &CurveParams, pos: f32, transformed: bool) -> Vec3 {
        let v = Vec3::new(
            self.component_at(params, Component::X, pos),
            self.component_at(params, Component::Y, pos),
            self.component_at(params, Component::Z, pos),
        );
        let v = if transformed { params.transform.apply(v) } else { v };
        params.bounding.apply(v)
    }
}

/// A curve that is the same value everywhere, in every component.
///
/// Ignores the global offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantCurve {
    value: f32,
}

impl ConstantCurve {
    /// Creates a constant curve.
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self { value }
    }

    /// The constant.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }
}

impl Curve for ConstantCurve {
    fn component_at(&self, _params: &CurveParams, _component: Component, _pos: f32) -> f32 {
        self.value
    }
}

/// A shaping function lifted into a curve.
///
/// X is the position itself, Y is the shaped output with rate/phase
/// applied to the position and amp/bias applied to the result, Z is 0.
/// The shaping function maps [0, 1] onto [0, 1]; with neutral parameters
/// the Y output equals the shaping function's output.
pub struct ShapedCurve {
    shape: Box<dyn Fn(f32) -> f32 + Send + Sync>,
}

impl ShapedCurve {
    /// Wraps a shaping function.
    #[must_use]
    pub fn new(shape: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        Self {
            shape: Box::new(shape),
        }
    }

    /// The identity shape: Y equals the (rate/phase adjusted) position.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|x| x)
    }

    /// Applies rate and phase to a position.
    fn warp_position(params: &CurveParams, pos: f32) -> f32 {
        let mut p = pos.abs() * params.rate_offset;
        if p > 1.0 {
            p %= 1.0;
        }
        p += params.phase_offset;
        if p > 1.0 {
            p %= 1.0;
        }
        p
    }

    /// Maps a bipolar value into [0, amp] and adds the bias.
    fn amp_bias(params: &CurveParams, bipolar: f32) -> f32 {
        let half_amp = params.amp_offset / 2.0;
        bipolar * half_amp + half_amp + params.bias_offset
    }
}

impl Curve for ShapedCurve {
    fn component_at(&self, params: &CurveParams, component: Component, pos: f32) -> f32 {
        match component {
            Component::X => pos,
            Component::Y => {
                let p = Self::warp_position(params, pos);
                let bipolar = 2.0 * (self.shape)(p) - 1.0;
                Self::amp_bias(params, bipolar)
            }
            Component::Z => 0.0,
        }
    }
}

impl std::fmt::Debug for ShapedCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedCurve").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_index_and_extract() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        for (i, c) in Component::ALL.into_iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(c.of(v), v.to_array()[i]);
        }
        assert_eq!(Component::Y.to_string(), "y");
    }

    #[test]
    fn test_constant_curve() {
        let curve = ConstantCurve::new(0.7);
        let params = CurveParams {
            amp_offset: 3.0,
            ..CurveParams::NEUTRAL
        };
        assert_eq!(curve.component_at(&params, Component::Z, 0.3), 0.7);
        assert_eq!(curve.vector_at(&params, 0.9, false), Vec3::splat(0.7));
    }

    #[test]
    fn test_identity_curve_neutral() {
        let curve = ShapedCurve::identity();
        let params = CurveParams::NEUTRAL;
        for pos in [0.0, 0.25, 0.5, 0.75] {
            assert!((curve.component_at(&params, Component::Y, pos) - pos).abs() < 1e-6);
            assert_eq!(curve.component_at(&params, Component::X, pos), pos);
            assert_eq!(curve.component_at(&params, Component::Z, pos), 0.0);
        }
    }

    #[test]
    fn test_shaped_curve_offsets() {
        let curve = ShapedCurve::new(|_| 1.0);
        let params = CurveParams {
            amp_offset: 0.5,
            bias_offset: 0.1,
            ..CurveParams::NEUTRAL
        };
        // Full-scale shape lands on amp + bias.
        assert!((curve.component_at(&params, Component::Y, 0.4) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_shaped_curve_rate_and_phase() {
        let curve = ShapedCurve::identity();
        let doubled = CurveParams {
            rate_offset: 2.0,
            ..CurveParams::NEUTRAL
        };
        assert!((curve.component_at(&doubled, Component::Y, 0.75) - 0.5).abs() < 1e-6);

        let shifted = CurveParams {
            phase_offset: 0.5,
            ..CurveParams::NEUTRAL
        };
        assert!((curve.component_at(&shifted, Component::Y, 0.75) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_vector_at_transform_and_bounding() {
        let curve = ShapedCurve::identity();
        let params = CurveParams {
            transform: Transform {
                translation: Vec3::new(0.0, 0.75, 0.0),
                ..Transform::IDENTITY
            },
            bounding: Bounding::Wrapping,
            ..CurveParams::NEUTRAL
        };

        let raw = curve.vector_at(&params, 0.5, false);
        assert!((raw.y - 0.5).abs() < 1e-6);

        let moved = curve.vector_at(&params, 0.5, true);
        assert!((moved.y - 0.25).abs() < 1e-6);
        assert!((moved.x - 0.5).abs() < 1e-6);
    }
}
