//! Crate-wide error types

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for fallible crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level service error
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O failure outside the supervised connection, e.g. binding the
    /// query listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and validation failures
///
/// Every variant is fatal: the service refuses to start on a config it
/// cannot fully trust.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {error}")]
    Read { path: PathBuf, error: String },

    /// The file is not valid JSON for the expected schema
    #[error("failed to parse config file {path}: {error}")]
    Parse { path: PathBuf, error: String },

    /// The parsed settings are structurally valid but unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
