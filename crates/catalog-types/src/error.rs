//! Shared error type for catalog configuration and document handling.

use thiserror::Error;

/// Errors surfaced by the shared types crate.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Configuration loading or validation failed
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CatalogError {
    fn from(err: config::ConfigError) -> Self {
        CatalogError::Config(err.to_string())
    }
}
