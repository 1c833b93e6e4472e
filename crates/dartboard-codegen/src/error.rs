//! Error types for code generation.

use dartboard_core::DocumentError;
use thiserror::Error;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that stop a copy or a single widget export.
///
/// Unsupported features are not errors; they are recorded in the
/// diagnostics log and compilation continues.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Document access failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The selection cannot be compiled.
    #[error("{0}")]
    InvalidSelection(String),

    /// The node compiled to nothing.
    #[error("Nothing to export for '{0}'")]
    EmptyOutput(String),

    /// A file could not be written.
    #[error("Failed to write {file}: {message}")]
    Write { file: String, message: String },

    /// The raster exporter failed.
    #[error("Raster export failed: {0}")]
    Raster(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
