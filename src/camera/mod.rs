//! Camera parameters and projection.
//!
//! A [`Camera`] pairs a 3x3 intrinsic matrix (focal lengths, principal
//! point) with a 3x4 extrinsic matrix (world-to-camera rotation and
//! translation). A [`CameraSet`] holds one camera per view, shared by every
//! batch of a render call; camera parameters are passed per call as flat
//! row-major float arrays (9 intrinsic + 12 extrinsic values per camera).

use crate::error::{RenderError, RenderResult};
use crate::math::{Mat3, Mat3x4, Vec2, Vec3, Vec4};

/// Number of intrinsic floats per camera (row-major 3x3).
pub const INTRINSIC_FLOATS: usize = 9;

/// Number of extrinsic floats per camera (row-major 3x4).
pub const EXTRINSIC_FLOATS: usize = 12;

/// One camera: intrinsic projection plus extrinsic pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    intrinsics: Mat3,
    extrinsics: Mat3x4,
}

impl Camera {
    /// Create a camera from intrinsic and extrinsic matrices.
    pub fn new(intrinsics: Mat3, extrinsics: Mat3x4) -> Self {
        Self {
            intrinsics,
            extrinsics,
        }
    }

    /// Create a camera from row-major flat parameter arrays.
    pub fn from_flat(intrinsics: &[f32], extrinsics: &[f32]) -> Self {
        Self {
            intrinsics: Mat3::from_row_slice(intrinsics),
            extrinsics: Mat3x4::from_row_slice(extrinsics),
        }
    }

    /// Intrinsic matrix.
    pub fn intrinsics(&self) -> &Mat3 {
        &self.intrinsics
    }

    /// Extrinsic matrix.
    pub fn extrinsics(&self) -> &Mat3x4 {
        &self.extrinsics
    }

    /// Transform a world-space point into camera space.
    #[inline]
    pub fn to_camera(&self, point: Vec3) -> Vec3 {
        self.extrinsics * Vec4::new(point.x, point.y, point.z, 1.0)
    }

    /// Project a camera-space point to pixel coordinates (perspective divide).
    ///
    /// The caller is responsible for rejecting points at or behind the
    /// camera plane (`z <= 0`) before projecting.
    #[inline]
    pub fn project(&self, point_cam: Vec3) -> Vec2 {
        let q = self.intrinsics * point_cam;
        Vec2::new(q.x / q.z, q.y / q.z)
    }

    /// Project a world-space point, returning pixel coordinates and the
    /// camera-space depth.
    #[inline]
    pub fn project_world(&self, point: Vec3) -> (Vec2, f32) {
        let cam = self.to_camera(point);
        (self.project(cam), cam.z)
    }
}

/// Immutable collection of cameras, indexed consistently across batches.
#[derive(Debug, Clone)]
pub struct CameraSet {
    cameras: Vec<Camera>,
}

impl CameraSet {
    /// Parse a camera set from flat per-call arrays.
    ///
    /// `intrinsics` holds 9 floats per camera, `extrinsics` 12; both must
    /// describe the same number of cameras.
    pub fn from_flat(intrinsics: &[f32], extrinsics: &[f32]) -> RenderResult<Self> {
        if intrinsics.is_empty() || intrinsics.len() % INTRINSIC_FLOATS != 0 {
            return Err(RenderError::ShapeMismatch {
                name: "intrinsics",
                expected: intrinsics
                    .len()
                    .next_multiple_of(INTRINSIC_FLOATS)
                    .max(INTRINSIC_FLOATS),
                actual: intrinsics.len(),
            });
        }
        let count = intrinsics.len() / INTRINSIC_FLOATS;
        if extrinsics.len() != count * EXTRINSIC_FLOATS {
            return Err(RenderError::ShapeMismatch {
                name: "extrinsics",
                expected: count * EXTRINSIC_FLOATS,
                actual: extrinsics.len(),
            });
        }
        let cameras = (0..count)
            .map(|c| {
                Camera::from_flat(
                    &intrinsics[c * INTRINSIC_FLOATS..(c + 1) * INTRINSIC_FLOATS],
                    &extrinsics[c * EXTRINSIC_FLOATS..(c + 1) * EXTRINSIC_FLOATS],
                )
            })
            .collect();
        Ok(Self { cameras })
    }

    /// Number of cameras.
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Camera at `index`.
    pub fn get(&self, index: usize) -> Option<&Camera> {
        self.cameras.get(index)
    }

    /// Iterate over cameras in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.iter()
    }
}

impl std::ops::Index<usize> for CameraSet {
    type Output = Camera;

    fn index(&self, index: usize) -> &Camera {
        &self.cameras[index]
    }
}
