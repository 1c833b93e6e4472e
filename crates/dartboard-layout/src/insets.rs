//! Padding and spacing normalization.

use dartboard_core::dart::{dim, round_to};
use dartboard_core::document::{PaddingValues, Spacings};

/// Geometric comparison tolerance in design units.
pub const TOLERANCE: f64 = 0.5;

/// Gaps above this are trimmed once per stack.
const SPACING_TRIM_THRESHOLD: f64 = 20.0;
const SPACING_TRIM: f64 = 3.0;

pub fn almost_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// Padding on all sides.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeInsets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeInsets {
    /// Create uniform padding.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    /// Left/right and top/bottom match within [`TOLERANCE`].
    pub fn is_symmetric(&self) -> bool {
        almost_equal(self.left, self.right, TOLERANCE) && almost_equal(self.top, self.bottom, TOLERANCE)
    }

    /// Symmetric and horizontal matches vertical.
    pub fn is_uniform(&self) -> bool {
        self.is_symmetric() && almost_equal(self.left, self.top, TOLERANCE)
    }

    /// The shortest `EdgeInsets` constructor reproducing these insets.
    pub fn to_dart(&self, unit: &str) -> String {
        if self.is_uniform() {
            format!("EdgeInsets.all({})", dim(self.left, unit))
        } else if self.is_symmetric() {
            format!(
                "EdgeInsets.symmetric(horizontal: {}, vertical: {})",
                dim(self.left, unit),
                dim(self.top, unit)
            )
        } else {
            format!(
                "EdgeInsets.fromLTRB({}, {}, {}, {})",
                dim(self.left, unit),
                dim(self.top, unit),
                dim(self.right, unit),
                dim(self.bottom, unit)
            )
        }
    }
}

/// Padding from a layout record; `None` when absent or zero on every side.
pub fn normalize_padding(values: Option<&PaddingValues>) -> Option<EdgeInsets> {
    let insets = match values? {
        PaddingValues::Uniform(v) => EdgeInsets::uniform(*v),
        PaddingValues::Edges(e) => EdgeInsets {
            top: e.top,
            right: e.right,
            bottom: e.bottom,
            left: e.left,
        },
    };
    (!insets.is_zero()).then_some(insets)
}

/// One non-negative gap per pair of children.
pub fn normalize_spacings(spacings: &Spacings, gaps: usize) -> Vec<f64> {
    let mut out: Vec<f64> = match spacings {
        Spacings::Uniform(v) => vec![*v; gaps],
        Spacings::PerGap(list) => (0..gaps)
            .map(|i| list.get(i).or(list.last()).copied().unwrap_or(0.0))
            .collect(),
    };
    for gap in out.iter_mut() {
        *gap = gap.max(0.0);
    }
    out
}

/// A gap larger than 20 reduced by 3, absorbing the line-height difference
/// between design text boxes and Flutter text. Applied once per sequence,
/// to the first such gap actually emitted.
pub fn trim_spacing(gap: f64) -> Option<f64> {
    (gap > SPACING_TRIM_THRESHOLD).then(|| round_to(gap - SPACING_TRIM, 1))
}
