//! Math type aliases and small helpers.
//!
//! All rendering math is f32. Types re-export nalgebra so callers can reach
//! the full API when the aliases are not enough.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 3x3 matrix (f32). Camera intrinsics.
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 3x4 matrix (f32). Camera extrinsics (rotation + translation).
pub type Mat3x4 = nalgebra::Matrix3x4<f32>;

/// Signed parallelogram area of edge `a -> b` against point `p`.
///
/// This is the 2D cross product `(b - a) x (p - a)`. In image coordinates
/// (y growing downward) a positive value means `p` lies on the interior side
/// of a clockwise-wound triangle edge.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
