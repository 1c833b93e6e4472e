//! Core value types shared across the exporter.

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA colour as stored by the design tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Alpha in `0.0..=1.0`.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// `#rrggbb` without alpha, as used in SVG attributes.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `AARRGGBB` with the alpha channel scaled by `opacity`.
    pub fn to_argb_hex(&self, opacity: f64) -> String {
        let a = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        format!("{:02x}{:02x}{:02x}{:02x}", a, self.r, self.g, self.b)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Axis-aligned rectangle in design units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Bounding box of this rectangle after applying `m`.
    pub fn transformed(&self, m: &DAffine2) -> Rect {
        let corners = [
            DVec2::new(self.x, self.y),
            DVec2::new(self.right(), self.y),
            DVec2::new(self.x, self.bottom()),
            DVec2::new(self.right(), self.bottom()),
        ]
        .map(|p| m.transform_point2(p));

        let mut min = corners[0];
        let mut max = corners[0];
        for p in &corners[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// 2D affine transform stored as `[a, b, c, d, e, f]`.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transform2D(pub [f64; 6]);

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn translation(x: f64, y: f64) -> Self {
        Transform2D([1.0, 0.0, 0.0, 1.0, x, y])
    }

    pub fn affine(&self) -> DAffine2 {
        DAffine2::from_cols_array(&self.0)
    }

    pub fn from_affine(m: &DAffine2) -> Self {
        Transform2D(m.to_cols_array())
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// True when the transform only translates.
    pub fn is_translation(&self) -> bool {
        let [a, b, c, d, _, _] = self.0;
        a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0
    }

    pub fn tx(&self) -> f64 {
        self.0[4]
    }

    pub fn ty(&self) -> f64 {
        self.0[5]
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}
