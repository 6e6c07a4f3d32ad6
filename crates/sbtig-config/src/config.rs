//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where resources and generated models live.
    pub path_management: PathManagement,
    /// Remote image sources. Informational only; nothing here downloads.
    pub online_resources: OnlineResources,
    /// Which image variants to reference and whether to model scattering.
    pub resolution_configuration: ResolutionConfiguration,
    /// Planet geometry and material tuning.
    pub planet: PlanetConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Filesystem layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathManagement {
    /// Root folder of the generator's working data.
    pub home_folder: String,
    /// Folder holding downloaded resources.
    pub resources_path: String,
    /// Folder holding texture images, as seen by the renderer.
    pub images_path: String,
    /// Folder where generated scene descriptions are written.
    pub models_path: String,
}

/// A remote collection of image files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteResources {
    /// Base link of the collection.
    pub nasa_resources_link: String,
    /// File names available under the link.
    pub files: Vec<String>,
}

/// Remote image collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OnlineResources {
    /// Earth color, topography and cloud maps.
    pub nasa_earth_resources: RemoteResources,
    /// Star background maps.
    pub nasa_starmap_resources: RemoteResources,
}

/// Image variant selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolutionConfiguration {
    /// Resolution tag of the surface color map (e.g. "43K").
    pub earth_texture_resolution: String,
    /// Resolution tag of the topography bump map.
    pub earth_topography_resolution: String,
    /// Resolution tag of the cloud coverage map.
    pub earth_clouds_resolution: String,
    /// Add the Rayleigh scattering atmosphere shell.
    pub modelize_scattering: bool,
    /// Resolution tag of the star map.
    pub starmap_resolution: String,
}

/// Finish coefficients. Unset coefficients are left to the renderer's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FinishConfig {
    pub ambient: Option<f64>,
    pub diffuse: Option<f64>,
    pub specular: Option<f64>,
    pub roughness: Option<f64>,
}

/// Planet geometry and material tuning.
///
/// Lengths share one unit system; the defaults use kilometres.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Radius of the solid surface sphere.
    pub radius: f64,
    /// Height of the haze shell above the surface.
    pub atmosphere_offset: f64,
    /// Height of the cloud shell above the surface.
    pub cloud_offset: f64,
    /// Rotation of the surface about the vertical axis, in degrees.
    pub surface_rotation_deg: f64,
    /// Strength of the topography normal perturbation.
    pub bump_size: f64,
    /// Surface finish.
    pub surface_finish: FinishConfig,
    /// Cloud finish.
    pub cloud_finish: FinishConfig,
    /// Fraction of light transmitted through the cloud map.
    pub cloud_transmit: f64,
    /// Extinction coefficient of the haze medium.
    pub haze_extinction: f64,
    /// Uniform density of the haze medium.
    pub haze_density: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter string (e.g., "debug", "info,sbtig_scene=trace").
    pub level: String,
}

// --- Default implementations ---

impl Default for PathManagement {
    fn default() -> Self {
        Self {
            home_folder: "~/.sbtig".to_string(),
            resources_path: "/resources".to_string(),
            images_path: "/resources/images".to_string(),
            models_path: "/resources/models".to_string(),
        }
    }
}

impl Default for ResolutionConfiguration {
    fn default() -> Self {
        Self {
            earth_texture_resolution: "43K".to_string(),
            earth_topography_resolution: "21K".to_string(),
            earth_clouds_resolution: "43K".to_string(),
            modelize_scattering: true,
            starmap_resolution: "8K".to_string(),
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 6371.0,
            atmosphere_offset: 50.0,
            cloud_offset: 10.0,
            surface_rotation_deg: 25.0,
            bump_size: 0.05,
            surface_finish: FinishConfig {
                ambient: Some(0.0),
                diffuse: Some(0.8),
                specular: Some(0.2),
                roughness: Some(0.05),
            },
            cloud_finish: FinishConfig {
                ambient: Some(0.0),
                diffuse: Some(0.7),
                specular: Some(0.2),
                roughness: None,
            },
            cloud_transmit: 0.8,
            haze_extinction: 1.0,
            haze_density: 0.001,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from a single RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config as pretty RON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
