//! The render op: configuration, per-call inputs, and outputs.
//!
//! A [`Renderer`] is configured once ([`RendererConfig`], validated in
//! [`Renderer::new`]) and then invoked any number of times with
//! [`RenderInput`] tensor bundles. Each call produces a [`RenderOutput`]
//! holding one color image per (batch, camera) pair plus the auxiliary
//! depth, face-id, and barycentric planes.
//!
//! Planes for distinct (batch, camera) pairs are disjoint, so they are
//! rendered on scoped threads over disjoint chunks of the output buffers.
//! Within one plane faces are processed sequentially in index order, which
//! makes the output bit-for-bit reproducible regardless of thread count.

use crate::camera::{CameraSet, EXTRINSIC_FLOATS, INTRINSIC_FLOATS};
use crate::error::{RenderError, RenderResult};
use crate::geometry::{as_triples, compute_vertex_normals, Topology};
use crate::lighting::{self, ShCoefficients};
use crate::math::Vec3;
use crate::raster::{self, ViewBuffers, ViewContext};
use crate::texture::TextureImage;

/// Where per-pixel base color comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlbedoMode {
    /// Barycentric interpolation of per-vertex colors.
    #[default]
    VertexColor,
    /// Texture sampling at the interpolated UV coordinate.
    Texture,
}

/// Whether spherical harmonics lighting is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShadingMode {
    /// Albedo multiplied by SH irradiance of the interpolated normal.
    #[default]
    Shaded,
    /// Albedo written directly.
    Unshaded,
}

/// Construction-time renderer configuration.
///
/// Validated once by [`Renderer::new`]; per-call tensors are checked against
/// the counts recorded here.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Shared mesh topology.
    pub topology: Topology,
    /// Number of cameras every call must supply parameters for.
    pub camera_count: usize,
    /// Horizontal render resolution (U).
    pub width: u32,
    /// Vertical render resolution (V).
    pub height: u32,
    /// Albedo source.
    pub albedo_mode: AlbedoMode,
    /// Lighting toggle.
    pub shading_mode: ShadingMode,
    /// Pixel-domain box filter footprint (odd, >= 1).
    pub image_filter_size: u32,
    /// Texel-domain sampling footprint (odd, >= 1).
    pub texture_filter_size: u32,
}

impl RendererConfig {
    /// Create a configuration with default modes and no filtering.
    pub fn new(topology: Topology, camera_count: usize, width: u32, height: u32) -> Self {
        Self {
            topology,
            camera_count,
            width,
            height,
            albedo_mode: AlbedoMode::default(),
            shading_mode: ShadingMode::default(),
            image_filter_size: 1,
            texture_filter_size: 1,
        }
    }

    /// Set the albedo mode.
    pub fn with_albedo_mode(mut self, mode: AlbedoMode) -> Self {
        self.albedo_mode = mode;
        self
    }

    /// Set the shading mode.
    pub fn with_shading_mode(mut self, mode: ShadingMode) -> Self {
        self.shading_mode = mode;
        self
    }

    /// Set the image-domain box filter footprint.
    pub fn with_image_filter_size(mut self, size: u32) -> Self {
        self.image_filter_size = size;
        self
    }

    /// Set the texture sampling footprint.
    pub fn with_texture_filter_size(mut self, size: u32) -> Self {
        self.texture_filter_size = size;
        self
    }

    fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        for (name, size) in [
            ("image", self.image_filter_size),
            ("texture", self.texture_filter_size),
        ] {
            if size == 0 || size % 2 == 0 {
                return Err(RenderError::InvalidFilterSize { name, size });
            }
        }
        if self.camera_count == 0 {
            return Err(RenderError::NoCameras);
        }
        Ok(())
    }
}

/// Per-call input tensors, all borrowed flat f32 buffers.
///
/// Shapes are written `[batch, ...]`; every buffer is validated against the
/// renderer configuration before any pixel work starts.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    /// Number of batches (leading dimension of every batched tensor).
    pub batch_count: usize,
    /// Vertex positions, `[batch, vertex_count, 3]`.
    pub vertex_positions: &'a [f32],
    /// Vertex colors, `[batch, vertex_count, 3]`, linear RGB.
    pub vertex_colors: &'a [f32],
    /// Texture images, `[batch, texture_height, texture_width, 3]`.
    pub textures: &'a [f32],
    /// Texture height in texels.
    pub texture_height: usize,
    /// Texture width in texels.
    pub texture_width: usize,
    /// SH coefficients, `[batch, camera_count, 27]`.
    pub sh_coefficients: &'a [f32],
    /// Background/target image buffer, `[batch, camera_count, V, U, 3]`.
    /// Defines the initial value of every output pixel.
    pub target: &'a [f32],
    /// Camera intrinsics, `[camera_count, 9]` row-major 3x3.
    pub intrinsics: &'a [f32],
    /// Camera extrinsics, `[camera_count, 12]` row-major 3x4.
    pub extrinsics: &'a [f32],
}

/// One (batch, camera) plane's mutable output slices.
struct PlaneTask<'a> {
    plane: usize,
    colors: &'a mut [[f32; 3]],
    depths: &'a mut [f32],
    face_ids: &'a mut [i32],
    barycentrics: &'a mut [[f32; 3]],
}

/// The batched multi-camera rasterizing renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Validate the configuration and build a renderer.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        config.validate()?;
        log::info!(
            "renderer: {} faces, {} vertices, {} cameras, {}x{}, albedo {:?}, shading {:?}",
            config.topology.face_count(),
            config.topology.vertex_count(),
            config.camera_count,
            config.width,
            config.height,
            config.albedo_mode,
            config.shading_mode,
        );
        Ok(Self { config })
    }

    /// The configuration this renderer was built with.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render every (batch, camera) pair of `input`.
    ///
    /// Fails before any pixel work if a tensor shape disagrees with the
    /// configuration. On success the returned buffer is fully populated:
    /// covered pixels hold shaded colors, all others keep the target's
    /// background values.
    pub fn render(&self, input: &RenderInput) -> RenderResult<RenderOutput> {
        let config = &self.config;
        let batches = input.batch_count;
        let cameras = config.camera_count;
        let width = config.width as usize;
        let height = config.height as usize;
        let vertices = config.topology.vertex_count();

        self.validate_input(input)?;
        // Tensor lengths already pinned the camera count, so this parse
        // cannot disagree with the configuration.
        let camera_set = CameraSet::from_flat(input.intrinsics, input.extrinsics)?;
        debug_assert_eq!(camera_set.len(), cameras);

        log::debug!(
            "render call: {} batches x {} cameras at {}x{}",
            batches,
            cameras,
            width,
            height
        );

        // Per-batch views and world-space vertex normals, computed once and
        // shared by all of that batch's camera planes.
        let mut batch_positions = Vec::with_capacity(batches);
        let mut batch_colors = Vec::with_capacity(batches);
        let mut batch_textures = Vec::with_capacity(batches);
        let mut batch_normals: Vec<Vec<Vec3>> = Vec::with_capacity(batches);
        let texture_floats = input.texture_height * input.texture_width * 3;
        for b in 0..batches {
            let positions = as_triples(&input.vertex_positions[b * vertices * 3..(b + 1) * vertices * 3]);
            batch_positions.push(positions);
            batch_colors.push(as_triples(
                &input.vertex_colors[b * vertices * 3..(b + 1) * vertices * 3],
            ));
            batch_textures.push(TextureImage::new(
                &input.textures[b * texture_floats..(b + 1) * texture_floats],
                input.texture_height,
                input.texture_width,
            )?);
            batch_normals.push(compute_vertex_normals(&config.topology, positions));
        }

        let plane_px = width * height;
        let mut colors = input.target.to_vec();
        let mut depths = vec![0.0f32; batches * cameras * plane_px];
        let mut face_ids = vec![0i32; batches * cameras * plane_px];
        let mut barycentrics = vec![0.0f32; batches * cameras * plane_px * 3];

        let mut tasks: Vec<PlaneTask> = bytemuck::cast_slice_mut::<f32, [f32; 3]>(&mut colors)
            .chunks_mut(plane_px)
            .zip(depths.chunks_mut(plane_px))
            .zip(face_ids.chunks_mut(plane_px))
            .zip(bytemuck::cast_slice_mut::<f32, [f32; 3]>(&mut barycentrics).chunks_mut(plane_px))
            .enumerate()
            .map(|(plane, (((colors, depths), face_ids), barycentrics))| PlaneTask {
                plane,
                colors,
                depths,
                face_ids,
                barycentrics,
            })
            .collect();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(tasks.len());
        let group_size = tasks.len().div_ceil(threads);

        std::thread::scope(|scope| {
            for group in tasks.chunks_mut(group_size) {
                let batch_positions = &batch_positions;
                let batch_colors = &batch_colors;
                let batch_textures = &batch_textures;
                let batch_normals = &batch_normals;
                let camera_set = &camera_set;
                scope.spawn(move || {
                    for task in group {
                        let batch = task.plane / cameras;
                        let camera = task.plane % cameras;
                        let sh_offset = task.plane * lighting::COEFF_COUNT;
                        let ctx = ViewContext {
                            topology: &config.topology,
                            positions: batch_positions[batch],
                            colors: batch_colors[batch],
                            normals: &batch_normals[batch],
                            texture: batch_textures[batch],
                            sh: ShCoefficients::new_unchecked(
                                &input.sh_coefficients
                                    [sh_offset..sh_offset + lighting::COEFF_COUNT],
                            ),
                            camera: &camera_set[camera],
                            width,
                            height,
                            albedo_mode: config.albedo_mode,
                            shading_mode: config.shading_mode,
                            image_filter_size: config.image_filter_size,
                            texture_filter_size: config.texture_filter_size,
                        };
                        let mut out = ViewBuffers {
                            colors: &mut *task.colors,
                            depths: &mut *task.depths,
                            face_ids: &mut *task.face_ids,
                            barycentrics: &mut *task.barycentrics,
                        };
                        raster::rasterize_view(&ctx, &mut out);
                    }
                });
            }
        });

        Ok(RenderOutput {
            colors,
            depths,
            face_ids,
            barycentrics,
            batch_count: batches,
            camera_count: cameras,
            width,
            height,
        })
    }

    fn validate_input(&self, input: &RenderInput) -> RenderResult<()> {
        let config = &self.config;
        if input.batch_count == 0 {
            return Err(RenderError::NoBatches);
        }
        if input.texture_height == 0 || input.texture_width == 0 {
            return Err(RenderError::InvalidTextureSize {
                height: input.texture_height,
                width: input.texture_width,
            });
        }

        let b = input.batch_count;
        let c = config.camera_count;
        let n = config.topology.vertex_count();
        let plane = config.width as usize * config.height as usize;
        let checks: [(&'static str, usize, usize); 7] = [
            ("vertex_positions", input.vertex_positions.len(), b * n * 3),
            ("vertex_colors", input.vertex_colors.len(), b * n * 3),
            (
                "textures",
                input.textures.len(),
                b * input.texture_height * input.texture_width * 3,
            ),
            (
                "sh_coefficients",
                input.sh_coefficients.len(),
                b * c * lighting::COEFF_COUNT,
            ),
            ("target", input.target.len(), b * c * plane * 3),
            ("intrinsics", input.intrinsics.len(), c * INTRINSIC_FLOATS),
            ("extrinsics", input.extrinsics.len(), c * EXTRINSIC_FLOATS),
        ];
        for (name, actual, expected) in checks {
            if actual != expected {
                return Err(RenderError::ShapeMismatch {
                    name,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Populated output planes of one render call.
///
/// All planes are row-major `[batch, camera, V, U, ...]`. Colors are linear
/// RGB; no gamma correction is applied.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    colors: Vec<f32>,
    depths: Vec<f32>,
    face_ids: Vec<i32>,
    barycentrics: Vec<f32>,
    batch_count: usize,
    camera_count: usize,
    width: usize,
    height: usize,
}

impl RenderOutput {
    /// Number of batches.
    pub fn batch_count(&self) -> usize {
        self.batch_count
    }

    /// Number of cameras.
    pub fn camera_count(&self) -> usize {
        self.camera_count
    }

    /// Horizontal resolution (U).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Vertical resolution (V).
    pub fn height(&self) -> usize {
        self.height
    }

    /// The full color buffer, `[batch, camera, V, U, 3]`.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    fn plane(&self, batch: usize, camera: usize) -> usize {
        assert!(batch < self.batch_count, "batch {batch} out of range");
        assert!(camera < self.camera_count, "camera {camera} out of range");
        batch * self.camera_count + camera
    }

    /// One (batch, camera) color plane, `[V, U, 3]`.
    pub fn image(&self, batch: usize, camera: usize) -> &[f32] {
        let plane = self.plane(batch, camera);
        let size = self.width * self.height * 3;
        &self.colors[plane * size..(plane + 1) * size]
    }

    /// One (batch, camera) depth plane, `[V, U]`; `inf` for background.
    pub fn depth(&self, batch: usize, camera: usize) -> &[f32] {
        let plane = self.plane(batch, camera);
        let size = self.width * self.height;
        &self.depths[plane * size..(plane + 1) * size]
    }

    /// One (batch, camera) face-id plane, `[V, U]`; `-1` for background.
    pub fn face_ids(&self, batch: usize, camera: usize) -> &[i32] {
        let plane = self.plane(batch, camera);
        let size = self.width * self.height;
        &self.face_ids[plane * size..(plane + 1) * size]
    }

    /// One (batch, camera) barycentric plane, `[V, U, 3]`, in the winning
    /// face's vertex order.
    pub fn barycentrics(&self, batch: usize, camera: usize) -> &[f32] {
        let plane = self.plane(batch, camera);
        let size = self.width * self.height * 3;
        &self.barycentrics[plane * size..(plane + 1) * size]
    }

    /// Color of one pixel.
    pub fn pixel(&self, batch: usize, camera: usize, x: usize, y: usize) -> [f32; 3] {
        assert!(x < self.width && y < self.height, "pixel out of range");
        let image = self.image(batch, camera);
        let idx = (y * self.width + x) * 3;
        [image[idx], image[idx + 1], image[idx + 2]]
    }

    /// Convert one plane to an 8-bit RGB image.
    ///
    /// Linear values are clamped to `[0, 1]` and scaled to `0..=255`; no
    /// gamma curve is applied.
    #[cfg(feature = "image")]
    pub fn to_rgb_image(&self, batch: usize, camera: usize) -> image::RgbImage {
        let plane = self.image(batch, camera);
        let bytes: Vec<u8> = plane
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        image::RgbImage::from_raw(self.width as u32, self.height as u32, bytes)
            .expect("plane length matches dimensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_topology() -> Topology {
        Topology::new(
            vec![[0, 1, 2]],
            vec![[0, 1, 2]],
            vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            3,
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_config() {
        let config = RendererConfig::new(small_topology(), 2, 64, 48)
            .with_albedo_mode(AlbedoMode::Texture)
            .with_image_filter_size(3)
            .with_texture_filter_size(5);
        assert!(Renderer::new(config).is_ok());
    }

    #[test]
    fn rejects_zero_resolution() {
        let config = RendererConfig::new(small_topology(), 1, 0, 64);
        assert_eq!(
            Renderer::new(config).unwrap_err(),
            RenderError::InvalidResolution {
                width: 0,
                height: 64
            }
        );
    }

    #[test]
    fn rejects_even_filter_sizes() {
        let config = RendererConfig::new(small_topology(), 1, 64, 64).with_image_filter_size(2);
        assert_eq!(
            Renderer::new(config).unwrap_err(),
            RenderError::InvalidFilterSize {
                name: "image",
                size: 2
            }
        );

        let config = RendererConfig::new(small_topology(), 1, 64, 64).with_texture_filter_size(0);
        assert_eq!(
            Renderer::new(config).unwrap_err(),
            RenderError::InvalidFilterSize {
                name: "texture",
                size: 0
            }
        );
    }

    #[test]
    fn rejects_zero_cameras() {
        let config = RendererConfig::new(small_topology(), 0, 64, 64);
        assert_eq!(Renderer::new(config).unwrap_err(), RenderError::NoCameras);
    }

    #[test]
    fn render_rejects_short_tensors() {
        let config = RendererConfig::new(small_topology(), 1, 4, 4);
        let renderer = Renderer::new(config).unwrap();
        let positions = [0.0f32; 9];
        let colors = [0.0f32; 6]; // one vertex short
        let textures = [0.0f32; 3];
        let sh = [0.0f32; 27];
        let target = [0.0f32; 4 * 4 * 3];
        let intrinsics = [0.0f32; 9];
        let extrinsics = [0.0f32; 12];
        let input = RenderInput {
            batch_count: 1,
            vertex_positions: &positions,
            vertex_colors: &colors,
            textures: &textures,
            texture_height: 1,
            texture_width: 1,
            sh_coefficients: &sh,
            target: &target,
            intrinsics: &intrinsics,
            extrinsics: &extrinsics,
        };
        assert_eq!(
            renderer.render(&input).unwrap_err(),
            RenderError::ShapeMismatch {
                name: "vertex_colors",
                expected: 9,
                actual: 6
            }
        );
    }

    #[test]
    fn render_rejects_zero_batches() {
        let config = RendererConfig::new(small_topology(), 1, 4, 4);
        let renderer = Renderer::new(config).unwrap();
        let input = RenderInput {
            batch_count: 0,
            vertex_positions: &[],
            vertex_colors: &[],
            textures: &[],
            texture_height: 1,
            texture_width: 1,
            sh_coefficients: &[],
            target: &[],
            intrinsics: &[],
            extrinsics: &[],
        };
        assert_eq!(renderer.render(&input).unwrap_err(), RenderError::NoBatches);
    }
}
