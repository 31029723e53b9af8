//! Mesh topology and per-batch vertex attributes.
//!
//! Topology (face indices, texture coordinate indices, the UV table) is
//! shared by every batch of a render call and validated once at renderer
//! construction. Vertex positions and colors arrive per call as flat
//! `[batch, vertex_count, 3]` tensors and are viewed per batch without
//! copying.

pub mod generators;

use crate::error::{RenderError, RenderResult};
use crate::math::Vec3;

/// Shared mesh topology, immutable for the lifetime of a renderer.
///
/// Each face stores three vertex indices and three texture coordinate
/// indices into the UV table. Only attribute *values* vary per batch; the
/// connectivity here is identical across batches and render calls.
#[derive(Debug, Clone)]
pub struct Topology {
    faces: Vec<[u32; 3]>,
    uv_indices: Vec<[u32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    vertex_count: usize,
}

impl Topology {
    /// Create a topology, validating all index references.
    ///
    /// `uv_indices` must be parallel to `faces` (one triple per face) and
    /// reference entries of `tex_coords`; face indices must reference
    /// vertices below `vertex_count`.
    pub fn new(
        faces: Vec<[u32; 3]>,
        uv_indices: Vec<[u32; 3]>,
        tex_coords: Vec<[f32; 2]>,
        vertex_count: usize,
    ) -> RenderResult<Self> {
        if faces.is_empty() {
            return Err(RenderError::EmptyTopology);
        }
        if uv_indices.len() != faces.len() {
            return Err(RenderError::ShapeMismatch {
                name: "uv_indices",
                expected: faces.len(),
                actual: uv_indices.len(),
            });
        }
        for (face, indices) in faces.iter().enumerate() {
            for &index in indices {
                if index as usize >= vertex_count {
                    return Err(RenderError::VertexIndexOutOfRange {
                        face,
                        index,
                        count: vertex_count,
                    });
                }
            }
        }
        for (face, indices) in uv_indices.iter().enumerate() {
            for &index in indices {
                if index as usize >= tex_coords.len() {
                    return Err(RenderError::TexCoordIndexOutOfRange {
                        face,
                        index,
                        count: tex_coords.len(),
                    });
                }
            }
        }
        Ok(Self {
            faces,
            uv_indices,
            tex_coords,
            vertex_count,
        })
    }

    /// Face vertex index triples.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Face texture coordinate index triples, parallel to [`faces`](Self::faces).
    pub fn uv_indices(&self) -> &[[u32; 3]] {
        &self.uv_indices
    }

    /// The UV table referenced by [`uv_indices`](Self::uv_indices).
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    /// Number of vertices every batch must supply attributes for.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// View a flat `[count, 3]` f32 tensor slice as vertex triples.
///
/// The caller guarantees `flat.len() == count * 3`; shape validation happens
/// at the render-call boundary.
pub(crate) fn as_triples(flat: &[f32]) -> &[[f32; 3]] {
    bytemuck::cast_slice(flat)
}

/// Compute per-vertex normals as the area-weighted average of adjacent face
/// normals, normalized.
///
/// Unnormalized face cross products are accumulated per vertex, which weights
/// large faces more, then each sum is normalized. Vertices with no adjacent
/// non-degenerate face keep a zero normal.
pub fn compute_vertex_normals(topology: &Topology, positions: &[[f32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::zeros(); topology.vertex_count()];
    for indices in topology.faces() {
        let p0 = Vec3::from(positions[indices[0] as usize]);
        let p1 = Vec3::from(positions[indices[1] as usize]);
        let p2 = Vec3::from(positions[indices[2] as usize]);
        let face_normal = (p1 - p0).cross(&(p2 - p0));
        for &index in indices {
            normals[index as usize] += face_normal;
        }
    }
    for normal in &mut normals {
        if let Some(unit) = normal.try_normalize(1e-12) {
            *normal = unit;
        }
    }
    normals
}
