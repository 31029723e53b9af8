//! # multiview-raster
//!
//! Batched, multi-camera software mesh rasterizer with per-pixel shading
//! driven by spherical harmonics lighting.
//!
//! The crate renders one color image per (batch, camera) pair from shared
//! mesh topology and per-batch vertex/texture tensors:
//!
//! - [`geometry`] — shared mesh topology and per-batch vertex attributes
//! - [`camera`] — intrinsic/extrinsic camera parameters and projection
//! - [`texture`] — texture image views with footprint sampling
//! - [`lighting`] — order-2 spherical harmonics irradiance
//! - [`renderer`] — the render op: configuration, per-call inputs, outputs
//!
//! The rasterizer itself (projection, coverage, depth resolution, attribute
//! interpolation) lives in a private module behind [`renderer::Renderer`].
//!
//! # Example
//!
//! ```
//! use multiview_raster::geometry::generators::generate_cone;
//! use multiview_raster::renderer::{Renderer, RendererConfig};
//!
//! let mesh = generate_cone(1.0, 2.0, 16, [0.8, 0.4, 0.2]);
//! let config = RendererConfig::new(mesh.topology, 1, 64, 64);
//! let renderer = Renderer::new(config).unwrap();
//! # let _ = renderer;
//! ```

pub mod camera;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod math;
pub mod renderer;
pub mod texture;

mod raster;

pub use error::{RenderError, RenderResult};
pub use renderer::{AlbedoMode, RenderInput, RenderOutput, Renderer, RendererConfig, ShadingMode};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log a startup line. Callers are expected to install their own logger
/// (e.g. `env_logger`) beforehand.
pub fn init() {
    log::info!("multiview-raster v{} initialized", VERSION);
}
