//! Dart literal formatting.

use crate::types::Color;

/// Round to `digits` decimals and print the shortest form.
///
/// `fix(10.0, 1)` is `"10"`, `fix(1.25, 1)` is `"1.3"`, negative zero prints
/// as `"0"`.
pub fn fix(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let p = 10f64.powi(digits as i32);
    let mut rounded = (value * p).round() / p;
    if rounded == 0.0 {
        rounded = 0.0;
    }
    format!("{}", rounded)
}

/// Round to `digits` decimals, as a number.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let p = 10f64.powi(digits as i32);
    (value * p).round() / p
}

/// A dimension literal: one decimal plus the configured unit suffix.
pub fn dim(value: f64, unit: &str) -> String {
    format!("{}{}", fix(value, 1), unit)
}

/// A single-quoted Dart string literal.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// `const Color(0xAARRGGBB)` with alpha multiplied by `opacity`.
pub fn color_literal(color: &Color, opacity: f64) -> String {
    format!("const Color(0x{})", color.to_argb_hex(opacity))
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
pub fn shorten(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
