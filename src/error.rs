//! Renderer error types.
//!
//! Two families, matching when they are raised:
//!
//! - configuration errors — detected once in [`Renderer::new`](crate::renderer::Renderer::new)
//! - shape mismatch errors — detected per call in [`Renderer::render`](crate::renderer::Renderer::render)
//!
//! Out-of-range UV coordinates and partially off-screen triangles are never
//! errors; they are resolved by clamping inside the sampler and rasterizer.

use thiserror::Error;

/// Errors surfaced by renderer construction and render calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Render resolution must be positive in both dimensions.
    #[error("render resolution must be positive, got {width}x{height}")]
    InvalidResolution {
        /// Horizontal resolution (U).
        width: u32,
        /// Vertical resolution (V).
        height: u32,
    },

    /// Filter footprints must be odd so they center on a pixel.
    #[error("{name} filter size must be an odd integer >= 1, got {size}")]
    InvalidFilterSize {
        /// Which filter: `"image"` or `"texture"`.
        name: &'static str,
        /// The rejected size.
        size: u32,
    },

    /// A renderer needs at least one camera.
    #[error("camera count must be >= 1")]
    NoCameras,

    /// A render call needs at least one batch.
    #[error("batch count must be >= 1")]
    NoBatches,

    /// Topology without faces cannot produce any coverage.
    #[error("mesh topology has no faces")]
    EmptyTopology,

    /// A face references a vertex index past the configured vertex count.
    #[error("face {face} references vertex index {index}, but only {count} vertices exist")]
    VertexIndexOutOfRange {
        /// Offending face.
        face: usize,
        /// Offending index.
        index: u32,
        /// Configured vertex count.
        count: usize,
    },

    /// A face references a texture coordinate index past the UV table.
    #[error("face {face} references texture coordinate {index}, but only {count} texture coordinates exist")]
    TexCoordIndexOutOfRange {
        /// Offending face.
        face: usize,
        /// Offending index.
        index: u32,
        /// UV table length.
        count: usize,
    },

    /// A per-call tensor does not match the shape implied by the configuration.
    #[error("{name} has {actual} elements, expected {expected}")]
    ShapeMismatch {
        /// Which input buffer failed.
        name: &'static str,
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },

    /// A spherical harmonics coefficient set must hold 9 values per channel.
    #[error("spherical harmonics coefficient set must have 27 values, got {0}")]
    InvalidShCount(usize),

    /// Texture images need at least one texel.
    #[error("texture dimensions must be positive, got {height}x{width}")]
    InvalidTextureSize {
        /// Texture height in texels.
        height: usize,
        /// Texture width in texels.
        width: usize,
    },
}

/// Convenience alias for renderer results.
pub type RenderResult<T> = Result<T, RenderError>;
