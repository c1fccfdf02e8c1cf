//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or validating an inventory configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read inventory config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid YAML or does not match the expected shape.
    #[error("failed to parse inventory config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A configuration value was invalid.
    #[error("invalid inventory config value: {0}")]
    InvalidValue(String),
    /// The file name does not identify a node inventory configuration.
    #[error("{} is not a kubenodes inventory file (expected a name ending in kubernetes.yaml)", .0.display())]
    UnsupportedFile(PathBuf),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
