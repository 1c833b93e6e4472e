//! Layout error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A layout name that matches no classification.
    #[error("Unknown layout type: {0}")]
    UnknownLayoutType(String),
}
