//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur when resolving, loading, saving, or overriding configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// Neither the user file nor the bundled template exists.
    #[error(
        "no configuration found: neither {} nor the template {} exists",
        user.display(),
        template.display()
    )]
    NotFound {
        /// User configuration path that was probed.
        user: PathBuf,
        /// Template path that was probed as fallback.
        template: PathBuf,
    },

    /// An environment override could not be parsed for its target field.
    #[error("invalid value {value:?} for {key}: {reason}")]
    EnvOverride {
        /// Full environment variable name.
        key: String,
        /// Raw value found in the environment.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}
