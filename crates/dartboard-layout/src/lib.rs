//! Layout classification for compiled nodes.
//!
//! Design tools describe layout with absolute bounds plus resize constraints
//! (which edges and dimensions are pinned to the parent). Flutter needs a
//! widget that reproduces that behaviour. This crate classifies each node
//! once per compile and wraps the node's code in the matching widgets.
//!
//! # Classification
//!
//! 1. No parent context (widget root): layout disabled
//! 2. Parent is a stack: pinned, or none when full length on the cross axis
//! 3. Missing bounds or constraints: translate with a fixed size
//! 4. All four edges pinned: none, with padding unless full size
//! 5. Width and height pinned with a deducible alignment: center or align
//! 6. Otherwise: pinned margins

mod alignment;
mod error;
mod frame;
mod insets;
mod layout;
mod pin;

pub use alignment::Alignment;
pub use error::{LayoutError, Result};
pub use frame::{adjusted_bounds, LayoutInput, ParentFrame};
pub use insets::{almost_equal, normalize_padding, normalize_spacings, trim_spacing, EdgeInsets, TOLERANCE};
pub use layout::{Layout, LayoutDirection, LayoutType};
pub use pin::{Pin, PIN_ELISION_THRESHOLD};
