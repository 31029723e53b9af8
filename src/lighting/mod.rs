//! Order-2 spherical harmonics irradiance.
//!
//! Directional irradiance is encoded as 27 coefficients per (batch, camera)
//! pair: 9 basis weights for each of the R, G, B channels, stored as three
//! consecutive blocks of 9. For a unit normal `(x, y, z)` the basis is
//! evaluated in this fixed order:
//!
//! ```text
//! [ 1, y, z, x, x*y, z*y, 3z^2 - 1, x*z, x^2 - y^2 ]
//! ```
//!
//! No Condon-Shortley phase and no normalization constants are applied; the
//! coefficients are assumed to be pre-multiplied. The evaluated irradiance
//! is clamped to be non-negative per channel before it scales albedo.

use crate::error::{RenderError, RenderResult};
use crate::math::Vec3;

/// Number of basis coefficients per color channel.
pub const COEFFS_PER_CHANNEL: usize = 9;

/// Total coefficients per (batch, camera) pair: 9 for each of R, G, B.
pub const COEFF_COUNT: usize = 27;

/// Borrowed view over one (batch, camera) coefficient set.
#[derive(Debug, Clone, Copy)]
pub struct ShCoefficients<'a> {
    coeffs: &'a [f32],
}

impl<'a> ShCoefficients<'a> {
    /// Wrap a coefficient slice, which must hold exactly 27 values.
    pub fn new(coeffs: &'a [f32]) -> RenderResult<Self> {
        if coeffs.len() != COEFF_COUNT {
            return Err(RenderError::InvalidShCount(coeffs.len()));
        }
        Ok(Self { coeffs })
    }

    /// Wrap a slice already known to hold exactly 27 values.
    pub(crate) fn new_unchecked(coeffs: &'a [f32]) -> Self {
        debug_assert_eq!(coeffs.len(), COEFF_COUNT);
        Self { coeffs }
    }

    /// Evaluate irradiance for a unit surface normal.
    ///
    /// Returns a non-negative RGB multiplier to apply to albedo.
    pub fn evaluate(&self, normal: Vec3) -> Vec3 {
        Vec3::new(
            eval_channel(&self.coeffs[..COEFFS_PER_CHANNEL], normal).max(0.0),
            eval_channel(
                &self.coeffs[COEFFS_PER_CHANNEL..2 * COEFFS_PER_CHANNEL],
                normal,
            )
            .max(0.0),
            eval_channel(&self.coeffs[2 * COEFFS_PER_CHANNEL..], normal).max(0.0),
        )
    }
}

/// One channel's linear combination of the 9 basis terms.
fn eval_channel(c: &[f32], n: Vec3) -> f32 {
    c[0] + c[1] * n.y
        + c[2] * n.z
        + c[3] * n.x
        + c[4] * n.x * n.y
        + c[5] * n.z * n.y
        + c[6] * (3.0 * n.z * n.z - 1.0)
        + c[7] * n.x * n.z
        + c[8] * (n.x * n.x - n.y * n.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The reference harness coefficients: constant 0.7, x-linear -0.5.
    fn reference_coeffs() -> [f32; COEFF_COUNT] {
        let channel = [0.7, 0.0, 0.0, -0.5, 0.0, 0.0, 0.0, 0.0, 0.0];
        let mut all = [0.0; COEFF_COUNT];
        for ch in 0..3 {
            all[ch * COEFFS_PER_CHANNEL..(ch + 1) * COEFFS_PER_CHANNEL]
                .copy_from_slice(&channel);
        }
        all
    }

    #[test]
    fn rejects_wrong_count() {
        let err = ShCoefficients::new(&[0.0; 9]).unwrap_err();
        assert_eq!(err, RenderError::InvalidShCount(9));
    }

    #[test]
    fn constant_plus_linear_at_forward_normal() {
        let coeffs = reference_coeffs();
        let sh = ShCoefficients::new(&coeffs).unwrap();
        // Normal straight at the camera: only the constant term survives
        // (the z-linear and quadratic weights are zero here).
        let light = sh.evaluate(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(light, Vec3::new(0.7, 0.7, 0.7));
    }

    #[test]
    fn linear_term_shifts_with_x() {
        let coeffs = reference_coeffs();
        let sh = ShCoefficients::new(&coeffs).unwrap();
        let lit = sh.evaluate(Vec3::new(-1.0, 0.0, 0.0));
        let dim = sh.evaluate(Vec3::new(1.0, 0.0, 0.0));
        // c8 * (x^2 - y^2) is zero, so these are exact closed forms.
        assert!((lit.x - 1.2).abs() < 1e-6);
        assert!((dim.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn quadratic_z_term() {
        let mut coeffs = [0.0; COEFF_COUNT];
        coeffs[6] = 0.25; // R channel, 3z^2 - 1 term
        let sh = ShCoefficients::new(&coeffs).unwrap();
        let light = sh.evaluate(Vec3::new(0.0, 0.0, 1.0));
        assert!((light.x - 0.5).abs() < 1e-6);
        assert_eq!(light.y, 0.0);
        assert_eq!(light.z, 0.0);
    }

    #[test]
    fn negative_irradiance_clamps_to_zero() {
        let mut coeffs = [0.0; COEFF_COUNT];
        coeffs[0] = -1.0;
        coeffs[9] = 0.3;
        let sh = ShCoefficients::new(&coeffs).unwrap();
        let light = sh.evaluate(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(light.x, 0.0);
        assert!((light.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn channels_are_independent_blocks() {
        let mut coeffs = [0.0; COEFF_COUNT];
        coeffs[0] = 0.1;
        coeffs[9] = 0.2;
        coeffs[18] = 0.3;
        let sh = ShCoefficients::new(&coeffs).unwrap();
        let light = sh.evaluate(Vec3::new(0.0, 1.0, 0.0));
        assert!((light - Vec3::new(0.1, 0.2, 0.3)).norm() < 1e-6);
    }
}
