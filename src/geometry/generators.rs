//! Mesh generators for common test shapes.
//!
//! These generators produce complete [`GeneratedMesh`] values (topology plus
//! per-vertex positions and colors) for harnesses, tests, and benches. The
//! cone mirrors the reference scene used by the original rendering harness.

use std::f32::consts::PI;

use super::Topology;

/// A generated mesh: shared topology plus one batch worth of attributes.
#[derive(Debug, Clone)]
pub struct GeneratedMesh {
    /// Face and UV connectivity.
    pub topology: Topology,
    /// Vertex positions, `[vertex_count, 3]`.
    pub positions: Vec<[f32; 3]>,
    /// Vertex colors, `[vertex_count, 3]`, linear RGB.
    pub colors: Vec<[f32; 3]>,
}

impl GeneratedMesh {
    /// Positions flattened to a single-batch `[1, vertex_count, 3]` tensor.
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }

    /// Colors flattened to a single-batch `[1, vertex_count, 3]` tensor.
    pub fn flat_colors(&self) -> Vec<f32> {
        self.colors.iter().flatten().copied().collect()
    }
}

/// Generate a cone with a triangle-fan base.
///
/// The base circle of the given radius lies in the XZ plane at `y = 0`,
/// centered at the origin; the apex sits at `(0, height, 0)`. Side UVs wrap
/// once around the rim; every vertex carries the same color.
///
/// # Arguments
///
/// * `radius` - Base circle radius
/// * `height` - Apex height above the base plane
/// * `segments` - Number of rim segments (at least 3)
/// * `color` - Linear RGB color applied to every vertex
pub fn generate_cone(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> GeneratedMesh {
    let segments = segments.max(3);

    // Vertex 0 is the apex, vertex 1 the base center, then the rim.
    let mut positions = vec![[0.0, height, 0.0], [0.0, 0.0, 0.0]];
    // UV 0 is the apex, UV 1 the base center, then one UV per rim vertex.
    let mut tex_coords = vec![[0.5, 1.0], [0.5, 0.5]];
    for segment in 0..segments {
        let phi = segment as f32 * 2.0 * PI / segments as f32;
        positions.push([radius * phi.cos(), 0.0, radius * phi.sin()]);
        tex_coords.push([segment as f32 / segments as f32, 0.0]);
    }

    let mut faces = Vec::with_capacity(2 * segments as usize);
    let mut uv_indices = Vec::with_capacity(2 * segments as usize);
    for segment in 0..segments {
        let current = 2 + segment;
        let next = 2 + (segment + 1) % segments;
        // Side triangle, wound outward.
        faces.push([0, next, current]);
        uv_indices.push([0, next, current]);
        // Base triangle, wound downward.
        faces.push([1, current, next]);
        uv_indices.push([1, current, next]);
    }

    let vertex_count = positions.len();
    let topology = Topology::new(faces, uv_indices, tex_coords, vertex_count)
        .expect("generated cone topology is index-consistent");

    GeneratedMesh {
        topology,
        colors: vec![color; vertex_count],
        positions,
    }
}

/// Generate a quad on the XY plane at `z = 0`.
///
/// The quad is centered at the origin with the given half extents and
/// spans the full UV range: `(0, 0)` at the bottom-left vertex, `(1, 1)`
/// at the top-right.
pub fn generate_quad(half_width: f32, half_height: f32, color: [f32; 3]) -> GeneratedMesh {
    let positions = vec![
        [-half_width, -half_height, 0.0],
        [half_width, -half_height, 0.0],
        [half_width, half_height, 0.0],
        [-half_width, half_height, 0.0],
    ];
    let tex_coords = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let faces = vec![[0, 1, 2], [2, 3, 0]];
    let uv_indices = faces.clone();

    let topology = Topology::new(faces, uv_indices, tex_coords, 4)
        .expect("generated quad topology is index-consistent");

    GeneratedMesh {
        topology,
        positions,
        colors: vec![color; 4],
    }
}
