//! Edge pinning for nodes that keep their offsets from the parent.

use dartboard_core::dart::round_to;

/// Pinned wrappers whose margins are all at or below this are elided.
pub const PIN_ELISION_THRESHOLD: f64 = 2.0;

/// Placement along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pin {
    pub size: f64,
    /// Offset from the parent's start edge.
    pub start: f64,
    /// Offset from the parent's end edge.
    pub end: f64,
    /// Start offset as a fraction of the parent, when neither start nor size is pinned.
    pub start_fraction: Option<f64>,
    /// End offset as a fraction of the parent, when neither end nor size is pinned.
    pub end_fraction: Option<f64>,
    /// Position of the free space before the node, when only the size is pinned.
    pub middle: Option<f64>,
}

impl Pin {
    /// Compute the pin for one axis.
    ///
    /// `pin_start`, `pin_size` and `pin_end` are the resize constraints,
    /// `start` and `size` the node's extent and `parent` the parent's length.
    pub fn along(
        pin_start: bool,
        pin_size: bool,
        pin_end: bool,
        start: f64,
        size: f64,
        parent: f64,
    ) -> Self {
        let end = parent - (start + size);
        let fraction = |v: f64| {
            if parent == 0.0 {
                0.0
            } else {
                round_to(v / parent, 4)
            }
        };

        Self {
            size: round_to(size, 1),
            start: round_to(start, 1),
            end: round_to(end, 1),
            start_fraction: (!pin_start && !pin_size).then(|| fraction(start)),
            end_fraction: (!pin_end && !pin_size).then(|| fraction(end)),
            middle: (pin_size && !pin_start && !pin_end).then(|| {
                if parent == size {
                    0.5
                } else {
                    round_to(start / (parent - size), 4)
                }
            }),
        }
    }
}
