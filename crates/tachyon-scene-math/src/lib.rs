#![warn(missing_docs)]

//! Math helpers for the Tachyon scene-file parser.
//!
//! Thin wrappers around nalgebra providing the vector and colour values
//! handed to the scene-construction API, plus the fixed Euler rotation and
//! scale → rotate → translate pipeline used when importing polygon files.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// A vector (or point) in 3D space.
pub type Vec3 = Vector3<f64>;

/// The value of pi used by the legacy degree conversion.
///
/// Tachyon rotates imported polygon files with this truncated constant.
pub const LEGACY_PI: f64 = 3.1415926;

/// An RGB colour with floating-point channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a colour from its channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Convert degrees to radians.
pub fn degrees_to_radians(deg: f64) -> f64 {
    deg * LEGACY_PI / 180.0
}

/// Convert each component of a vector from degrees to radians.
pub fn degrees_to_radians_vec(deg: &Vec3) -> Vec3 {
    deg.map(degrees_to_radians)
}

/// A 3x3 rotation built from X, Y and Z Euler angles.
///
/// Matrix entries follow Tachyon's composition, including the sign
/// convention on the third row. A textbook `Rz * Ry * Rx` differs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// The underlying row-major 3x3 matrix.
    pub matrix: Matrix3<f64>,
}

impl Rotation {
    /// Identity rotation.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Build a rotation from angles in radians about X, Y and Z.
    pub fn from_euler(x: f64, y: f64, z: f64) -> Self {
        let (sx, cx) = x.sin_cos();
        let (sy, cy) = y.sin_cos();
        let (sz, cz) = z.sin_cos();

        #[rustfmt::skip]
        let matrix = Matrix3::new(
            cy * cz, sx * sy * cz - cx * sz, sx * sz + cx * cz * sy,
            cy * sz, cx * cz + sx * sy * sz, cx * sy * sz - sx * cz,
            sy,      sx * cy,                cx * cy,
        );
        Self { matrix }
    }

    /// Build a rotation from a vector of angles in degrees.
    pub fn from_euler_degrees(deg: &Vec3) -> Self {
        let rad = degrees_to_radians_vec(deg);
        Self::from_euler(rad.x, rad.y, rad.z)
    }

    /// Rotate `v` in place.
    pub fn rotate(&self, v: &mut Vec3) {
        *v = self.matrix * *v;
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

/// Scale `v` component-wise by `factors`, in place.
pub fn scale(factors: &Vec3, v: &mut Vec3) {
    v.component_mul_assign(factors);
}

/// Offset `v` by `offset`, in place.
pub fn translate(offset: &Vec3, v: &mut Vec3) {
    *v += offset;
}

/// The scale, rotate, translate pipeline applied to imported polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointTransform {
    /// Per-axis scale factors, applied first.
    pub scale: Vec3,
    /// Rotation, applied second.
    pub rotation: Rotation,
    /// Translation, applied last.
    pub offset: Vec3,
}

impl PointTransform {
    /// Build a transform from scale factors, Euler angles in degrees, and an offset.
    pub fn new(scale: Vec3, rotation_deg: Vec3, offset: Vec3) -> Self {
        Self {
            scale,
            rotation: Rotation::from_euler_degrees(&rotation_deg),
            offset,
        }
    }

    /// Transform a point.
    pub fn apply(&self, mut p: Vec3) -> Vec3 {
        scale(&self.scale, &mut p);
        self.rotation.rotate(&mut p);
        translate(&self.offset, &mut p);
        p
    }
}

impl Default for PointTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation: Rotation::identity(),
            offset: Vec3::zeros(),
        }
    }
}
