//! Alignment deduction for nodes with a pinned size.

use dartboard_core::dart::fix;
use dartboard_core::document::ResizeConstraints;
use dartboard_core::types::Rect;

use crate::insets::{almost_equal, TOLERANCE};

/// A Flutter `Alignment`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    /// One of the named constants, e.g. `topLeft` or `center`.
    Named(&'static str),
    /// Fractional alignment in `-1.0..=1.0` per axis.
    Fractional(f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Middle,
    End,
}

fn anchor(offset: f64, free: f64) -> Option<Anchor> {
    if almost_equal(offset, 0.0, TOLERANCE) {
        Some(Anchor::Start)
    } else if almost_equal(offset, free / 2.0, TOLERANCE) {
        Some(Anchor::Middle)
    } else if almost_equal(offset, free, TOLERANCE) {
        Some(Anchor::End)
    } else {
        None
    }
}

fn named(v: Anchor, h: Anchor) -> &'static str {
    match (v, h) {
        (Anchor::Start, Anchor::Start) => "topLeft",
        (Anchor::Start, Anchor::Middle) => "topCenter",
        (Anchor::Start, Anchor::End) => "topRight",
        (Anchor::Middle, Anchor::Start) => "centerLeft",
        (Anchor::Middle, Anchor::Middle) => "center",
        (Anchor::Middle, Anchor::End) => "centerRight",
        (Anchor::End, Anchor::Start) => "bottomLeft",
        (Anchor::End, Anchor::Middle) => "bottomCenter",
        (Anchor::End, Anchor::End) => "bottomRight",
    }
}

impl Alignment {
    /// Deduce the alignment of `bounds` inside a parent of `parent` size.
    ///
    /// Returns `None` when a pinned edge contradicts the deduced anchor.
    pub fn deduce(bounds: &Rect, parent: &Rect, o: &ResizeConstraints) -> Option<Alignment> {
        let free_w = parent.width - bounds.width;
        let free_h = parent.height - bounds.height;

        let v = anchor(bounds.y, free_h);
        if (o.top && v != Some(Anchor::Start)) || (o.bottom && v != Some(Anchor::End)) {
            return None;
        }
        let h = anchor(bounds.x, free_w);
        if (o.left && h != Some(Anchor::Start)) || (o.right && h != Some(Anchor::End)) {
            return None;
        }

        if let (Some(v), Some(h)) = (v, h) {
            return Some(Alignment::Named(named(v, h)));
        }

        let fraction = |offset: f64, free: f64| {
            if free.abs() < f64::EPSILON {
                0.5
            } else {
                offset / free
            }
        };
        Some(Alignment::Fractional(
            fraction(bounds.x, free_w) * 2.0 - 1.0,
            fraction(bounds.y, free_h) * 2.0 - 1.0,
        ))
    }

    pub fn is_center(&self) -> bool {
        matches!(self, Alignment::Named("center"))
    }

    pub fn to_dart(&self) -> String {
        match self {
            Alignment::Named(name) => format!("Alignment.{}", name),
            Alignment::Fractional(x, y) => format!("Alignment({}, {})", fix(*x, 3), fix(*y, 3)),
        }
    }
}
