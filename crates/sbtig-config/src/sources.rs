//! Layered configuration sources: user file, bundled template, environment.
//!
//! Precedence, lowest to highest: the resolved file (user file, or the
//! template when no user file exists), then `CONF_*` environment variables,
//! then CLI flags (see [`crate::CliArgs`]).

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::{Config, FinishConfig};
use crate::error::ConfigError;

/// Environment variable that points at the user configuration file.
pub const CONF_FILE_ENV_VAR: &str = "SBTIG_CONF_FILE_PATH";

/// Prefix of environment variables that override configuration fields.
pub const ENV_PREFIX: &str = "CONF_";

/// Separator between nested field names in override variables.
pub const ENV_NESTED_SEPARATOR: &str = "__";

const TEMPLATE_FILE_NAME: &str = "configuration_template.ron";

/// User configuration path: `$SBTIG_CONF_FILE_PATH`, else `~/.sbtig/configuration.ron`.
pub fn default_user_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONF_FILE_ENV_VAR) {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_default()
        .join(".sbtig")
        .join("configuration.ron")
}

/// Path of the template shipped alongside this crate.
pub fn template_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(TEMPLATE_FILE_NAME)
}

/// Pick the file to load: the user file if present, else the template.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when neither file exists.
pub fn resolve_config_path(user: &Path, template: &Path) -> Result<PathBuf, ConfigError> {
    if user.exists() {
        return Ok(user.to_path_buf());
    }
    if template.exists() {
        return Ok(template.to_path_buf());
    }
    Err(ConfigError::NotFound {
        user: user.to_path_buf(),
        template: template.to_path_buf(),
    })
}

/// A loaded configuration and the file it was read from.
#[derive(Debug)]
pub struct LayeredConfig {
    pub config: Config,
    pub source: PathBuf,
    /// No user file existed and the bundled template was loaded.
    pub from_template: bool,
}

impl Config {
    /// Resolve the file, load it, then apply environment overrides from `vars`.
    ///
    /// Falling back to the template is reported through
    /// [`LayeredConfig::from_template`] so the caller can log it once its
    /// subscriber is installed.
    pub fn load_layered<I>(
        user: &Path,
        template: &Path,
        vars: I,
    ) -> Result<LayeredConfig, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let source = resolve_config_path(user, template)?;
        let mut config = Config::load(&source)?;
        config.apply_env_overrides(vars)?;
        Ok(LayeredConfig {
            from_template: source == template,
            config,
            source,
        })
    }

    /// Apply `CONF_<SECTION>__<FIELD>` overrides. Keys are case-insensitive.
    ///
    /// Unknown keys are skipped; a value that does not parse for a known key is an error.
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(rest) = strip_prefix_ignore_case(&key, ENV_PREFIX) else {
                continue;
            };
            let path = rest.to_ascii_lowercase();
            let segments: Vec<&str> = path.split(ENV_NESTED_SEPARATOR).collect();

            if self.set_field(&segments, &key, &value)? {
                log::debug!("Applied environment override {key}");
            } else {
                log::debug!("Ignoring unknown environment override {key}");
            }
        }
        Ok(())
    }

    fn set_field(&mut self, segments: &[&str], key: &str, value: &str) -> Result<bool, ConfigError> {
        let paths = &mut self.path_management;
        let resolution = &mut self.resolution_configuration;
        let planet = &mut self.planet;

        match segments {
            ["path_management", "home_folder"] => paths.home_folder = value.to_string(),
            ["path_management", "resources_path"] => paths.resources_path = value.to_string(),
            ["path_management", "images_path"] => paths.images_path = value.to_string(),
            ["path_management", "models_path"] => paths.models_path = value.to_string(),

            ["online_resources", "nasa_earth_resources", "nasa_resources_link"] => {
                self.online_resources.nasa_earth_resources.nasa_resources_link = value.to_string()
            }
            ["online_resources", "nasa_earth_resources", "files"] => {
                self.online_resources.nasa_earth_resources.files = split_list(value)
            }
            ["online_resources", "nasa_starmap_resources", "nasa_resources_link"] => {
                self.online_resources.nasa_starmap_resources.nasa_resources_link =
                    value.to_string()
            }
            ["online_resources", "nasa_starmap_resources", "files"] => {
                self.online_resources.nasa_starmap_resources.files = split_list(value)
            }

            ["resolution_configuration", "earth_texture_resolution"] => {
                resolution.earth_texture_resolution = value.to_string()
            }
            ["resolution_configuration", "earth_topography_resolution"] => {
                resolution.earth_topography_resolution = value.to_string()
            }
            ["resolution_configuration", "earth_clouds_resolution"] => {
                resolution.earth_clouds_resolution = value.to_string()
            }
            ["resolution_configuration", "starmap_resolution"] => {
                resolution.starmap_resolution = value.to_string()
            }
            ["resolution_configuration", "modelize_scattering"] => {
                resolution.modelize_scattering = parse_bool(key, value)?
            }

            ["planet", "radius"] => planet.radius = parse_value(key, value)?,
            ["planet", "atmosphere_offset"] => planet.atmosphere_offset = parse_value(key, value)?,
            ["planet", "cloud_offset"] => planet.cloud_offset = parse_value(key, value)?,
            ["planet", "surface_rotation_deg"] => {
                planet.surface_rotation_deg = parse_value(key, value)?
            }
            ["planet", "bump_size"] => planet.bump_size = parse_value(key, value)?,
            ["planet", "cloud_transmit"] => planet.cloud_transmit = parse_value(key, value)?,
            ["planet", "haze_extinction"] => planet.haze_extinction = parse_value(key, value)?,
            ["planet", "haze_density"] => planet.haze_density = parse_value(key, value)?,
            ["planet", "surface_finish", field] => {
                return set_finish_field(&mut planet.surface_finish, field, key, value);
            }
            ["planet", "cloud_finish", field] => {
                return set_finish_field(&mut planet.cloud_finish, field, key, value);
            }

            ["logging", "level"] => self.logging.level = value.to_string(),

            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn set_finish_field(
    finish: &mut FinishConfig,
    field: &str,
    key: &str,
    value: &str,
) -> Result<bool, ConfigError> {
    let slot = match field {
        "ambient" => &mut finish.ambient,
        "diffuse" => &mut finish.diffuse,
        "specular" => &mut finish.specular,
        "roughness" => &mut finish.roughness,
        _ => return Ok(false),
    };
    *slot = parse_optional(key, value)?;
    Ok(true)
}

fn strip_prefix_ignore_case<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let head = key.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &key[prefix.len()..])
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvOverride {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Empty or `none` clears the coefficient.
fn parse_optional(key: &str, value: &str) -> Result<Option<f64>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_value(key, trimmed).map(Some)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvOverride {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
