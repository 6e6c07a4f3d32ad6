//! Configuration system for the planet scene generator.
//!
//! Settings persist as RON files. The file is resolved from the user location
//! or a bundled template, then overridden by `CONF_*` environment variables
//! and finally by CLI flags. The result is one immutable [`Config`] handed to
//! the scene builder.

mod cli;
mod config;
mod error;
mod sources;

pub use cli::{CliArgs, OutputFormat};
pub use config::{
    Config, FinishConfig, LoggingConfig, OnlineResources, PathManagement, PlanetConfig,
    RemoteResources, ResolutionConfiguration,
};
pub use error::ConfigError;
pub use sources::{
    CONF_FILE_ENV_VAR, ENV_NESTED_SEPARATOR, ENV_PREFIX, LayeredConfig, default_user_config_path,
    resolve_config_path, template_config_path,
};
