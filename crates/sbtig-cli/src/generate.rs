//! Config resolution, scene build, and output for the `sbtig` binary.

use std::io::Write;
use std::path::{Path, PathBuf};

use sbtig_config::{
    CliArgs, Config, ConfigError, LayeredConfig, OutputFormat, default_user_config_path,
    template_config_path,
};
use sbtig_scene::{PlanetParams, PlanetScene, PlanetSceneBuilder, SceneError, sdl};
use tracing::info;

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("refusing to build scene: {0}")]
    Scene(#[from] SceneError),

    #[error("failed to encode scene as RON: {0}")]
    Encode(#[source] ron::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the encoded scene goes.
#[derive(Debug, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

/// File, then `CONF_*` environment, then CLI flags.
pub fn load_config<I>(args: &CliArgs, env: I) -> Result<LayeredConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let user = args.config.clone().unwrap_or_else(default_user_config_path);
    let mut loaded = Config::load_layered(&user, &template_config_path(), env)?;
    loaded.config.apply_cli_overrides(args);
    Ok(loaded)
}

pub fn build_scene(config: &Config) -> Result<PlanetScene, SceneError> {
    let params = PlanetParams::from_config(config)?;
    PlanetSceneBuilder::new(params).build()
}

pub fn encode(scene: &PlanetScene, format: OutputFormat) -> Result<String, GenerateError> {
    match format {
        OutputFormat::Pov => Ok(sdl::emit(scene)),
        OutputFormat::Ron => {
            let pretty = ron::ser::PrettyConfig::new().depth_limit(8);
            ron::ser::to_string_pretty(scene, pretty).map_err(GenerateError::Encode)
        }
    }
}

/// `-` means stdout; no flag means `<models_path>/planet.<ext>`.
pub fn output_target(args: &CliArgs, config: &Config) -> Output {
    match &args.output {
        Some(path) if path == Path::new("-") => Output::Stdout,
        Some(path) => Output::File(path.clone()),
        None => {
            let ext = match args.format {
                OutputFormat::Pov => "inc",
                OutputFormat::Ron => "ron",
            };
            Output::File(
                Path::new(&config.path_management.models_path).join(format!("planet.{ext}")),
            )
        }
    }
}

fn write_output(target: &Output, text: &str) -> Result<(), GenerateError> {
    match target {
        Output::Stdout => std::io::stdout()
            .write_all(text.as_bytes())
            .map_err(|source| GenerateError::Write {
                path: PathBuf::from("-"),
                source,
            }),
        Output::File(path) => {
            let write_err = |source| GenerateError::Write {
                path: path.clone(),
                source,
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
            std::fs::write(path, text).map_err(write_err)
        }
    }
}

/// Build the scene from `config` and write it where `args` says.
pub fn run(args: &CliArgs, config: &Config) -> Result<Output, GenerateError> {
    let scene = build_scene(config)?;
    let text = encode(&scene, args.format)?;
    let target = output_target(args, config);
    write_output(&target, &text)?;

    if let Output::File(path) = &target {
        info!(path = %path.display(), leaves = scene.leaf_count(), "wrote scene description");
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_config(path: &Path) -> CliArgs {
        CliArgs {
            config: Some(path.to_path_buf()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_precedence_file_env_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configuration.ron");
        std::fs::write(&path, "(planet: (radius: 1000.0, cloud_offset: 5.0, bump_size: 0.1))")
            .unwrap();

        let mut args = args_with_config(&path);
        args.radius = Some(3000.0);
        let env = vec![
            ("CONF_PLANET__RADIUS".to_string(), "2000".to_string()),
            ("CONF_PLANET__CLOUD_OFFSET".to_string(), "7".to_string()),
        ];

        let loaded = load_config(&args, env).unwrap();
        assert_eq!(loaded.source, path);
        assert!(!loaded.from_template);
        assert_eq!(loaded.config.planet.radius, 3000.0);
        assert_eq!(loaded.config.planet.cloud_offset, 7.0);
        assert_eq!(loaded.config.planet.bump_size, 0.1);
    }

    #[test]
    fn test_missing_user_file_uses_template() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_with_config(&dir.path().join("absent.ron"));
        let loaded = load_config(&args, Vec::new()).unwrap();
        assert!(loaded.from_template);
        assert_eq!(loaded.config.planet.radius, 6371.0);
    }

    #[test]
    fn test_default_output_under_models_path() {
        let mut config = Config::default();
        config.path_management.models_path = "/tmp/models".to_string();
        let target = output_target(&CliArgs::default(), &config);
        assert_eq!(target, Output::File(PathBuf::from("/tmp/models/planet.inc")));

        let args = CliArgs {
            format: OutputFormat::Ron,
            ..CliArgs::default()
        };
        assert_eq!(
            output_target(&args, &config),
            Output::File(PathBuf::from("/tmp/models/planet.ron"))
        );
    }

    #[test]
    fn test_dash_means_stdout() {
        let args = CliArgs {
            output: Some(PathBuf::from("-")),
            ..CliArgs::default()
        };
        assert_eq!(output_target(&args, &Config::default()), Output::Stdout);
    }

    #[test]
    fn test_run_writes_parseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out").join("earth.inc");
        let args = CliArgs {
            output: Some(out.clone()),
            ..CliArgs::default()
        };
        let config = Config::default();

        assert_eq!(run(&args, &config).unwrap(), Output::File(out.clone()));
        let text = std::fs::read_to_string(&out).unwrap();
        let parsed = sdl::parse(&text).unwrap();
        assert_eq!(parsed, build_scene(&config).unwrap());
    }

    #[test]
    fn test_run_refuses_invalid_scene() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never.inc");
        let args = CliArgs {
            output: Some(out.clone()),
            ..CliArgs::default()
        };
        let mut config = Config::default();
        config.planet.radius = -5.0;

        assert!(matches!(run(&args, &config), Err(GenerateError::Scene(_))));
        assert!(!out.exists());
    }

    #[test]
    fn test_ron_encoding() {
        let scene = build_scene(&Config::default()).unwrap();
        let text = encode(&scene, OutputFormat::Ron).unwrap();
        assert!(text.contains("Atmosphere"));
    }
}
