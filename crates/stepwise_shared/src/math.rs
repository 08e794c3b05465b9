//! Mathematical types shared by the engine and its embedders.
//!
//! These are the canonical representations carried by vector sequences
//! and by curve parameter snapshots.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::constants::{NO_ROTATION, NO_SCALE, NO_TRANSLATION, UNIT_CENTER};

/// 3D Vector - curve samples, origins, scales
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a Vec3 with all components set to `v`
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Component-wise product
    #[must_use]
    pub fn mul_elem(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Applies `f` to every component
    #[must_use]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    /// Rotates around the Z axis through `pivot`
    #[must_use]
    pub fn rotate_z(self, pivot: Self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let d = self - pivot;
        Self::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos, d.z) + pivot
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// How vector samples are kept inside the unit cube
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bounding {
    /// Leave values as they are
    #[default]
    None,
    /// Clamp each component into [0, 1]
    Clipping,
    /// Wrap each component around [0, 1]
    Wrapping,
    /// Reflect each component back into [0, 1]
    Folding,
}

impl Bounding {
    /// Applies this bounding mode to every component of `v`
    #[must_use]
    pub fn apply(self, v: Vec3) -> Vec3 {
        match self {
            Self::None => v,
            Self::Clipping => v.map(|c| c.clamp(0.0, 1.0)),
            Self::Wrapping => v.map(|c| wrap(c, 0.0, 1.0)),
            Self::Folding => v.map(|c| fold(c, 0.0, 1.0)),
        }
    }
}

/// Wraps `value` into `[min, max]`; `max` itself maps to `max`
#[must_use]
pub fn wrap(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    let mut wrapped = (value - min) % range;
    if wrapped < 0.0 {
        wrapped += range;
    } else if wrapped == 0.0 && value == max {
        wrapped = range;
    }
    wrapped + min
}

/// Reflects `value` back and forth between `min` and `max`
#[must_use]
pub fn fold(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    let mut folded = (value - min) % (2.0 * range);
    if folded < 0.0 {
        folded += 2.0 * range;
    }
    max - (folded - range).abs()
}

/// Geometric transform applied to "transformed" curve samples
///
/// Rotation happens around `UNIT_CENTER + origin`, then scale, then
/// translation.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Offset of the rotation pivot from the unit-cube center
    pub origin: Vec3,
    /// Added after rotation and scale
    pub translation: Vec3,
    /// Component-wise scale
    pub scale: Vec3,
    /// Rotation in degrees around the Z axis
    pub rotation: f32,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        origin: Vec3::ZERO,
        translation: NO_TRANSLATION,
        scale: NO_SCALE,
        rotation: NO_ROTATION,
    };

    /// Whether applying this transform is a no-op
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Transforms a point
    #[must_use]
    pub fn apply(&self, v: Vec3) -> Vec3 {
        let mut out = v;
        if self.rotation != NO_ROTATION {
            out = out.rotate_z(UNIT_CENTER + self.origin, self.rotation);
        }
        if self.scale != NO_SCALE {
            out = out.mul_elem(self.scale);
        }
        if self.translation != NO_TRANSLATION {
            out = out + self.translation;
        }
        out
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).to_array().iter().all(|d| d.abs() < 1e-5)
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.mul_elem(b), Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_vec3_bytemuck() {
        let v = [Vec3::new(1.0, 2.0, 3.0), Vec3::splat(0.5)];
        let floats: &[f32] = bytemuck::cast_slice(&v);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_wrap_and_fold() {
        assert!((wrap(1.25, 0.0, 1.0) - 0.25).abs() < 1e-6);
        assert!((wrap(-0.25, 0.0, 1.0) - 0.75).abs() < 1e-6);
        assert_eq!(wrap(1.0, 0.0, 1.0), 1.0);

        assert!((fold(1.25, 0.0, 1.0) - 0.75).abs() < 1e-6);
        assert!((fold(-0.25, 0.0, 1.0) - 0.25).abs() < 1e-6);
        assert_eq!(fold(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_bounding_modes() {
        let v = Vec3::new(-0.5, 0.5, 1.5);
        assert_eq!(Bounding::None.apply(v), v);
        assert_eq!(Bounding::Clipping.apply(v), Vec3::new(0.0, 0.5, 1.0));
        assert!(approx(Bounding::Wrapping.apply(v), Vec3::new(0.5, 0.5, 0.5)));
        assert!(approx(Bounding::Folding.apply(v), Vec3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_transform_identity() {
        let v = Vec3::new(0.2, 0.7, 0.0);
        assert!(Transform::IDENTITY.is_identity());
        assert_eq!(Transform::default().apply(v), v);
    }

    #[test]
    fn test_transform_rotation_about_center() {
        let t = Transform {
            rotation: 90.0,
            ..Transform::IDENTITY
        };
        // (1, 0.5) is 0.5 right of the center; a quarter turn puts it above.
        assert!(approx(t.apply(Vec3::new(1.0, 0.5, 0.0)), Vec3::new(0.5, 1.0, 0.0)));
        assert!(approx(t.apply(UNIT_CENTER), UNIT_CENTER));
    }

    #[test]
    fn test_transform_scale_then_translate() {
        let t = Transform {
            scale: Vec3::new(2.0, 0.5, 1.0),
            translation: Vec3::new(0.1, 0.0, 0.0),
            ..Transform::IDENTITY
        };
        assert!(approx(t.apply(Vec3::new(0.5, 0.5, 0.5)), Vec3::new(1.1, 0.25, 0.5)));
    }

    #[test]
    fn test_transform_from_toml() {
        let t: Transform = toml::from_str("rotation = 45.0\nscale = { x = 2.0, y = 2.0, z = 1.0 }")
            .unwrap();
        assert_eq!(t.rotation, 45.0);
        assert_eq!(t.scale, Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(t.translation, NO_TRANSLATION);

        let b: Bounding = toml::from_str::<toml::Value>("mode = \"folding\"")
            .unwrap()
            .get("mode")
            .cloned()
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(b, Bounding::Folding);
    }
}
