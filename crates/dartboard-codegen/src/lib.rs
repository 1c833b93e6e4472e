//! Compiles design documents into Flutter widget code.
//!
//! The pipeline runs once per copy or export:
//!
//! 1. [`node`]: build the compiled node tree, classifying each node's layout
//! 2. [`shape`]: merge runs of vector primitives into SVG shape units
//! 3. serialize the tree into a Dart expression, resolving text styles
//!    ([`text`]) and paint ([`paint`], SVG markup) on the way
//! 4. [`widget`]: assemble the widget class around the expression
//!
//! [`export::Exporter`] drives the whole thing and talks to the host through
//! [`export::FileWriter`] and [`export::RasterExporter`].
//!
//! # Example
//!
//! ```ignore
//! use dartboard_codegen::Exporter;
//!
//! let doc = Document::from_json(&json)?;
//! let snippet = Exporter::new(&doc).copy_selected("rect-1")?;
//! println!("{}", snippet.code);
//! ```

pub mod assets;
pub mod context;
pub mod decorators;
pub mod error;
pub mod export;
pub mod naming;
pub mod node;
pub mod paint;
pub mod raster;
pub mod shape;
mod svg;
pub mod text;
pub mod widget;

pub use context::{Context, DartType, Parameter, Target, WidgetScope};
pub use error::{CodegenError, Result};
pub use export::{ExportReport, Exporter, FileWriter, RasterExporter, Snippet};
pub use node::{ExportMode, Node, NodeKind};
pub use raster::{RasterQueue, RasterRequest};
pub use shape::{combine_shapes, ShapeUnit};
pub use widget::{compile_widget, DartFile};
