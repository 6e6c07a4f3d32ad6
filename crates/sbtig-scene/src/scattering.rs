//! Rayleigh scattering parameters for a thin haze shell.
//!
//! Scattering strength follows the fourth-power law `(λ_blue / λ)^4`, so the
//! shortest wavelength (blue) is normalized to exactly 1.0 and red, the
//! longest, scatters least. Extinction and density are visual tuning values,
//! not fitted to a physical atmosphere.

use glam::DVec3;

use crate::node::{ScatteringType, VolumetricMedium};

/// Representative red wavelength in nanometres.
pub const LAMBDA_RED_NM: f64 = 650.0;
/// Representative green wavelength in nanometres.
pub const LAMBDA_GREEN_NM: f64 = 555.0;
/// Representative blue wavelength in nanometres.
pub const LAMBDA_BLUE_NM: f64 = 460.0;

/// Height of the haze shell above the surface.
pub const DEFAULT_SHELL_OFFSET: f64 = 50.0;
pub const DEFAULT_EXTINCTION: f64 = 1.0;
/// Uniform per-channel density of the haze.
pub const DEFAULT_DENSITY: f64 = 0.001;

/// Per-channel Rayleigh scattering color, blue normalized to 1.0.
pub fn rayleigh_color() -> DVec3 {
    DVec3::new(
        (LAMBDA_BLUE_NM / LAMBDA_RED_NM).powi(4),
        (LAMBDA_BLUE_NM / LAMBDA_GREEN_NM).powi(4),
        1.0,
    )
}

/// Tunable constants of the haze shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatteringModel {
    pub shell_offset: f64,
    pub extinction: f64,
    pub density: f64,
}

impl Default for ScatteringModel {
    fn default() -> Self {
        Self {
            shell_offset: DEFAULT_SHELL_OFFSET,
            extinction: DEFAULT_EXTINCTION,
            density: DEFAULT_DENSITY,
        }
    }
}

/// Output of [`ScatteringModel::compute`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScatteringShell {
    pub shell_radius: f64,
    pub medium: VolumetricMedium,
}

impl ScatteringModel {
    /// Shell radius and medium for a surface of `surface_radius`.
    ///
    /// Pure; the caller guarantees `surface_radius > 0`.
    pub fn compute(&self, surface_radius: f64) -> ScatteringShell {
        ScatteringShell {
            shell_radius: surface_radius + self.shell_offset,
            medium: VolumetricMedium {
                scattering_type: ScatteringType::Rayleigh,
                color: rayleigh_color(),
                extinction: self.extinction,
                density: DVec3::splat(self.density),
            },
        }
    }
}

/// [`ScatteringModel::compute`] with the default constants.
pub fn compute_scattering(surface_radius: f64) -> ScatteringShell {
    ScatteringModel::default().compute(surface_radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_ordered_and_bounded() {
        let c = rayleigh_color();
        assert!(c.x < c.y, "red {} should scatter less than green {}", c.x, c.y);
        assert!(c.y < c.z);
        assert_eq!(c.z, 1.0);
        for v in c.to_array() {
            assert!(v > 0.0 && v <= 1.0);
        }
    }

    #[test]
    fn test_channels_follow_fourth_power_law() {
        let c = rayleigh_color();
        assert_eq!(c.x, (460.0_f64 / 650.0).powi(4));
        assert_eq!(c.y, (460.0_f64 / 555.0).powi(4));
        assert!((c.x - 0.2508).abs() < 1e-4);
        assert!((c.y - 0.4719).abs() < 1e-4);
    }

    #[test]
    fn test_shell_radius_offset() {
        for radius in [1.0, 200.0, 6371.0, 69_911.0] {
            let shell = compute_scattering(radius);
            assert_eq!(shell.shell_radius, radius + DEFAULT_SHELL_OFFSET);
            assert!(shell.shell_radius > radius);
        }
    }

    #[test]
    fn test_medium_constants() {
        let shell = compute_scattering(6371.0);
        assert_eq!(shell.medium.scattering_type, ScatteringType::Rayleigh);
        assert_eq!(shell.medium.extinction, 1.0);
        assert_eq!(shell.medium.density, DVec3::splat(0.001));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(compute_scattering(6371.0), compute_scattering(6371.0));
    }

    #[test]
    fn test_custom_model() {
        let model = ScatteringModel {
            shell_offset: 100.0,
            extinction: 0.5,
            density: 0.01,
        };
        let shell = model.compute(1000.0);
        assert_eq!(shell.shell_radius, 1100.0);
        assert_eq!(shell.medium.extinction, 0.5);
        assert_eq!(shell.medium.color, rayleigh_color());
    }
}
