//! Core types for the dartboard design-to-Flutter exporter.
//!
//! This crate provides the pieces every other crate shares:
//!
//! - [`document`]: the design document tree as produced by the host design tool
//! - [`index`]: parent lookup, inherited opacity and widget enumeration
//! - [`props`]: document settings and per-node persisted properties
//! - [`diagnostics`]: the append-only warning/error log
//! - [`dart`]: Dart literal formatting (numbers, strings, colours)

pub mod dart;
pub mod diagnostics;
pub mod document;
pub mod errors;
pub mod index;
pub mod props;
pub mod types;

pub use diagnostics::{Diagnostic, Log, Severity};
pub use document::{DesignKind, DesignNode, Document};
pub use errors::{DocumentError, Result};
pub use index::DocumentIndex;
pub use props::{Prop, Settings};
pub use types::{Color, Rect, Transform2D};
