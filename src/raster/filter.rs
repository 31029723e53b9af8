//! Post-shade box filtering.

/// Apply an in-place box filter with an odd square footprint to a
/// `height x width` RGB plane.
///
/// Each output pixel is the mean of a `size x size` window around it, with
/// border pixels repeated where the window leaves the image (matching the
/// texture sampler's clamp-to-edge policy). A size of 1 is a no-op.
pub(crate) fn box_filter(colors: &mut [[f32; 3]], width: usize, height: usize, size: u32) {
    if size <= 1 {
        return;
    }
    let source = colors.to_vec();
    let half = (size / 2) as isize;
    let norm = 1.0 / (size * size) as f32;

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0.0f32; 3];
            for dy in -half..=half {
                for dx in -half..=half {
                    let sx = (x as isize + dx).clamp(0, width as isize - 1) as usize;
                    let sy = (y as isize + dy).clamp(0, height as isize - 1) as usize;
                    let texel = source[sy * width + sx];
                    sum[0] += texel[0];
                    sum[1] += texel[1];
                    sum[2] += texel[2];
                }
            }
            colors[y * width + x] = [sum[0] * norm, sum[1] * norm, sum[2] * norm];
        }
    }
}
