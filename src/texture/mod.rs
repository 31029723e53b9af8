//! Texture image views and footprint sampling.
//!
//! A [`TextureImage`] borrows one batch's `H x W x 3` f32 texture plane and
//! samples it at UV coordinates. Addressing is clamp-to-edge everywhere:
//! out-of-range UVs snap to the nearest valid texel and filter footprints
//! never wrap around image borders.

use crate::error::{RenderError, RenderResult};
use crate::math::{Vec2, Vec3};

/// Borrowed view over one batch's texture plane.
#[derive(Debug, Clone, Copy)]
pub struct TextureImage<'a> {
    texels: &'a [[f32; 3]],
    width: usize,
    height: usize,
}

impl<'a> TextureImage<'a> {
    /// View a flat `[height, width, 3]` tensor slice as a texture.
    pub fn new(data: &'a [f32], height: usize, width: usize) -> RenderResult<Self> {
        if height == 0 || width == 0 {
            return Err(RenderError::InvalidTextureSize { height, width });
        }
        if data.len() != height * width * 3 {
            return Err(RenderError::ShapeMismatch {
                name: "texture",
                expected: height * width * 3,
                actual: data.len(),
            });
        }
        Ok(Self {
            texels: bytemuck::cast_slice(data),
            width,
            height,
        })
    }

    /// Texture width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Texture height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Texel at `(x, y)`, clamped to image bounds.
    #[inline]
    pub fn texel(&self, x: isize, y: isize) -> Vec3 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        Vec3::from(self.texels[y * self.width + x])
    }

    /// Sample the texture at a UV coordinate with a square filter footprint.
    ///
    /// UV `(0, 0)` maps to texel `(0, 0)` and `(1, 1)` to the opposite
    /// corner; coordinates outside `[0, 1]` are clamped first. A footprint
    /// of 1 returns the nearest texel; larger odd footprints average a
    /// `size x size` neighborhood in texel space, with border texels
    /// repeated where the window leaves the image.
    pub fn sample(&self, uv: Vec2, filter_size: u32) -> Vec3 {
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);
        let x = (u * (self.width - 1) as f32).round() as isize;
        let y = (v * (self.height - 1) as f32).round() as isize;

        if filter_size <= 1 {
            return self.texel(x, y);
        }

        let half = (filter_size / 2) as isize;
        let mut sum = Vec3::zeros();
        for dy in -half..=half {
            for dx in -half..=half {
                sum += self.texel(x + dx, y + dy);
            }
        }
        sum / (filter_size * filter_size) as f32
    }
}
