//! Rasterizer core.
//!
//! Converts one (batch, camera) pair's triangles into shaded pixels using a
//! two-pass scheme: a depth pass resolves the nearest face and its
//! barycentric weights per pixel, then a shade pass colors only the winning
//! faces. The split keeps the per-pixel reduction race-free and makes the
//! output independent of face submission order beyond the documented
//! tie-break (lowest face index wins at equal depth).
//!
//! Coverage uses the top-left fill rule on positively-oriented screen
//! triangles, so pixels on an edge shared by two triangles are covered
//! exactly once. Attribute interpolation is perspective-correct: screen
//! barycentrics are rescaled by inverse vertex depths.

pub(crate) mod filter;

use crate::camera::Camera;
use crate::geometry::Topology;
use crate::lighting::ShCoefficients;
use crate::math::{edge_function, Vec2, Vec3};
use crate::renderer::{AlbedoMode, ShadingMode};
use crate::texture::TextureImage;

/// Faces with any vertex at or behind this camera-space depth are skipped.
const NEAR_EPSILON: f32 = 1e-6;

/// Face id stored for pixels no triangle covers.
pub(crate) const NO_FACE: i32 = -1;

/// Read-only inputs for rasterizing one (batch, camera) view.
pub(crate) struct ViewContext<'a> {
    pub topology: &'a Topology,
    pub positions: &'a [[f32; 3]],
    pub colors: &'a [[f32; 3]],
    pub normals: &'a [Vec3],
    pub texture: TextureImage<'a>,
    pub sh: ShCoefficients<'a>,
    pub camera: &'a Camera,
    pub width: usize,
    pub height: usize,
    pub albedo_mode: AlbedoMode,
    pub shading_mode: ShadingMode,
    pub image_filter_size: u32,
    pub texture_filter_size: u32,
}

/// Mutable per-view output planes. `colors` arrives pre-filled with the
/// caller's background values; the other planes are reset here.
pub(crate) struct ViewBuffers<'a> {
    pub colors: &'a mut [[f32; 3]],
    pub depths: &'a mut [f32],
    pub face_ids: &'a mut [i32],
    pub barycentrics: &'a mut [[f32; 3]],
}

/// Rasterize one view: depth pass, shade pass, optional post filter.
pub(crate) fn rasterize_view(ctx: &ViewContext, out: &mut ViewBuffers) {
    out.depths.fill(f32::INFINITY);
    out.face_ids.fill(NO_FACE);
    out.barycentrics.fill([0.0; 3]);

    resolve_depth(ctx, out);
    shade(ctx, out);

    if ctx.image_filter_size > 1 {
        filter::box_filter(out.colors, ctx.width, ctx.height, ctx.image_filter_size);
    }
}

struct ProjectedVertex {
    screen: Vec2,
    depth: f32,
}

/// Depth pass: find the nearest face and its barycentric weights per pixel.
fn resolve_depth(ctx: &ViewContext, out: &mut ViewBuffers) {
    let projected: Vec<ProjectedVertex> = ctx
        .positions
        .iter()
        .map(|&p| {
            let cam = ctx.camera.to_camera(Vec3::from(p));
            let screen = if cam.z > NEAR_EPSILON {
                ctx.camera.project(cam)
            } else {
                Vec2::zeros()
            };
            ProjectedVertex {
                screen,
                depth: cam.z,
            }
        })
        .collect();

    for (face_id, indices) in ctx.topology.faces().iter().enumerate() {
        let verts = [
            &projected[indices[0] as usize],
            &projected[indices[1] as usize],
            &projected[indices[2] as usize],
        ];
        // No near-plane clipping: the whole face is dropped instead.
        if verts.iter().any(|v| v.depth <= NEAR_EPSILON) {
            continue;
        }

        // Orient to positive signed area so the coverage test and fill rule
        // are winding-independent. `order` maps oriented slots back to the
        // face's own vertex order for attribute lookup.
        let area = edge_function(verts[0].screen, verts[1].screen, verts[2].screen);
        let order: [usize; 3] = if area < 0.0 { [0, 2, 1] } else { [0, 1, 2] };
        let area = area.abs();
        if area == 0.0 {
            continue;
        }
        let s = [
            verts[order[0]].screen,
            verts[order[1]].screen,
            verts[order[2]].screen,
        ];
        let inv_depth = [
            1.0 / verts[order[0]].depth,
            1.0 / verts[order[1]].depth,
            1.0 / verts[order[2]].depth,
        ];

        // Screen bounding box clipped to the image; pixel centers sit at
        // half-integer coordinates.
        let min_x = s[0].x.min(s[1].x).min(s[2].x);
        let max_x = s[0].x.max(s[1].x).max(s[2].x);
        let min_y = s[0].y.min(s[1].y).min(s[2].y);
        let max_y = s[0].y.max(s[1].y).max(s[2].y);
        let x_first = (min_x - 0.5).ceil().max(0.0);
        let x_last = (max_x - 0.5).floor().min((ctx.width - 1) as f32);
        let y_first = (min_y - 0.5).ceil().max(0.0);
        let y_last = (max_y - 0.5).floor().min((ctx.height - 1) as f32);
        if x_last < x_first || y_last < y_first {
            continue;
        }
        let (x0, x1) = (x_first as usize, x_last as usize);
        let (y0, y1) = (y_first as usize, y_last as usize);

        // Edge i is opposite oriented vertex i.
        let top_left = [
            is_top_left(s[1], s[2]),
            is_top_left(s[2], s[0]),
            is_top_left(s[0], s[1]),
        ];

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let e = [
                    edge_function(s[1], s[2], p),
                    edge_function(s[2], s[0], p),
                    edge_function(s[0], s[1], p),
                ];
                let covered = (0..3).all(|i| e[i] > 0.0 || (e[i] == 0.0 && top_left[i]));
                if !covered {
                    continue;
                }

                // Perspective-correct weights: 1/z interpolates linearly in
                // screen space, so rescale screen barycentrics by 1/z_i.
                let w = [
                    (e[0] / area) * inv_depth[0],
                    (e[1] / area) * inv_depth[1],
                    (e[2] / area) * inv_depth[2],
                ];
                let depth = 1.0 / (w[0] + w[1] + w[2]);

                let idx = y * ctx.width + x;
                if depth < out.depths[idx] {
                    out.depths[idx] = depth;
                    out.face_ids[idx] = face_id as i32;
                    let mut bary = [0.0f32; 3];
                    for slot in 0..3 {
                        bary[order[slot]] = w[slot] * depth;
                    }
                    out.barycentrics[idx] = bary;
                }
            }
        }
    }
}

/// Top-left fill rule for an oriented edge `a -> b` of a positive-area
/// triangle in y-down pixel coordinates: the edge owns its boundary pixels
/// iff it is horizontal with the interior below it, or it ascends.
#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    (a.y == b.y && b.x > a.x) || b.y < a.y
}

/// Shade pass: resolve albedo and lighting for each winning pixel.
fn shade(ctx: &ViewContext, out: &mut ViewBuffers) {
    let faces = ctx.topology.faces();
    let uv_indices = ctx.topology.uv_indices();
    let tex_coords = ctx.topology.tex_coords();

    for idx in 0..ctx.width * ctx.height {
        let face_id = out.face_ids[idx];
        if face_id == NO_FACE {
            continue;
        }
        let face = faces[face_id as usize];
        let bary = out.barycentrics[idx];

        let albedo = match ctx.albedo_mode {
            AlbedoMode::VertexColor => {
                let mut color = Vec3::zeros();
                for k in 0..3 {
                    color += bary[k] * Vec3::from(ctx.colors[face[k] as usize]);
                }
                color
            }
            AlbedoMode::Texture => {
                let uvs = uv_indices[face_id as usize];
                let mut uv = Vec2::zeros();
                for k in 0..3 {
                    uv += bary[k] * Vec2::from(tex_coords[uvs[k] as usize]);
                }
                ctx.texture.sample(uv, ctx.texture_filter_size)
            }
        };

        let color = match ctx.shading_mode {
            ShadingMode::Unshaded => albedo,
            ShadingMode::Shaded => {
                let mut normal = Vec3::zeros();
                for k in 0..3 {
                    normal += bary[k] * ctx.normals[face[k] as usize];
                }
                let normal = normal.try_normalize(1e-12).unwrap_or_else(Vec3::zeros);
                albedo.component_mul(&ctx.sh.evaluate(normal))
            }
        };

        out.colors[idx] = [color.x, color.y, color.z];
    }
}
