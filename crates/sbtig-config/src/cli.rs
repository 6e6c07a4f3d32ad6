//! Command-line argument parsing for the scene generator.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::Config;

/// Output encoding of the generated scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Renderer scene-description text.
    #[default]
    Pov,
    /// RON dump of the scene graph.
    Ron,
}

/// Scene generator command-line arguments.
///
/// CLI values override settings loaded from the configuration file and environment.
#[derive(Parser, Debug, Default)]
#[command(name = "sbtig", about = "Planet scene generator for space-based telescope imagery")]
pub struct CliArgs {
    /// Path to the configuration file (overrides SBTIG_CONF_FILE_PATH).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file; "-" writes to stdout. Defaults to <models_path>/planet.inc.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pov)]
    pub format: OutputFormat,

    /// Enable or disable the scattering atmosphere.
    #[arg(long)]
    pub scattering: Option<bool>,

    /// Planet radius.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Log level (error, warn, info, debug, trace) or a full filter string.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for JSON log files (debug builds only).
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(scattering) = args.scattering {
            self.resolution_configuration.modelize_scattering = scattering;
        }
        if let Some(radius) = args.radius {
            self.planet.radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            scattering: Some(false),
            radius: Some(1737.4),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert!(!config.resolution_configuration.modelize_scattering);
        assert_eq!(config.planet.radius, 1737.4);
        // Non-overridden fields retain defaults
        assert_eq!(config.planet.cloud_offset, 10.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "sbtig",
            "--scattering",
            "false",
            "--format",
            "ron",
            "-o",
            "-",
        ]);
        assert_eq!(args.scattering, Some(false));
        assert_eq!(args.format, OutputFormat::Ron);
        assert_eq!(args.output, Some(PathBuf::from("-")));
    }
}
