//! Error types for document access.

use thiserror::Error;

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors raised while loading or navigating a design document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document JSON could not be decoded.
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading a document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A node referenced by guid does not exist.
    #[error("No node with guid '{guid}' in document")]
    NodeNotFound { guid: String },

    /// The node exists but is not of the expected kind.
    #[error("Node '{name}' is a {found}, expected {expected}")]
    UnexpectedKind {
        name: String,
        found: String,
        expected: &'static str,
    },
}
