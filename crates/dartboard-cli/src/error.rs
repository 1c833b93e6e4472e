//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

use dartboard_codegen::CodegenError;
use dartboard_core::DocumentError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Failed to parse TOML configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Settings overrides that do not fit the settings schema.
    #[error("Invalid settings override: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
