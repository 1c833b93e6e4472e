//! Dart expressions for fills, strokes and shadows.

use dartboard_core::dart::{color_literal, dim, fix};
use dartboard_core::document::{
    ColorStop, CornerRadii, DesignNode, Fill, Shadow, Stroke, StrokeJoin, StrokePosition,
};
use dartboard_core::Log;

/// Radii at or below this are not emitted.
const MIN_RADIUS: f64 = 1.0;

/// `Alignment(x, y)` for a point given as fractions of the box.
fn fraction_alignment(x: f64, y: f64) -> String {
    format!("Alignment({}, {})", fix(x * 2.0 - 1.0, 3), fix(y * 2.0 - 1.0, 3))
}

fn stops(color_stops: &[ColorStop], opacity: f64) -> (String, String) {
    let colors: Vec<String> = color_stops
        .iter()
        .map(|s| color_literal(&s.color, opacity))
        .collect();
    let positions: Vec<String> = color_stops.iter().map(|s| fix(s.stop, 3)).collect();
    (colors.join(", "), positions.join(", "))
}

/// A `LinearGradient` / `RadialGradient` expression, or `None` for fills that
/// are not gradients Flutter can express.
pub fn gradient(fill: &Fill, opacity: f64) -> Option<String> {
    match fill {
        Fill::LinearGradient {
            start_x,
            start_y,
            end_x,
            end_y,
            color_stops,
        } => {
            let (colors, positions) = stops(color_stops, opacity);
            Some(format!(
                "LinearGradient(begin: {}, end: {}, colors: [{}], stops: [{}], )",
                fraction_alignment(*start_x, *start_y),
                fraction_alignment(*end_x, *end_y),
                colors,
                positions
            ))
        }
        Fill::RadialGradient {
            end_x,
            end_y,
            end_r,
            color_stops,
            ..
        } => {
            let (colors, positions) = stops(color_stops, opacity);
            Some(format!(
                "RadialGradient(center: {}, radius: {}, colors: [{}], stops: [{}], )",
                fraction_alignment(*end_x, *end_y),
                fix(*end_r, 3),
                colors,
                positions
            ))
        }
        _ => None,
    }
}

/// Solid colour for a fill, falling back to the first gradient stop with a
/// warning for fills that need one.
pub fn solid_color(fill: &Fill, opacity: f64, node: &DesignNode, log: &mut Log) -> Option<String> {
    match fill {
        Fill::Color(c) => Some(color_literal(c, opacity)),
        Fill::ImageFill { .. } => None,
        other => {
            log.warn(
                format!("Unsupported {}; using its first colour", other.label()),
                Some(node),
            );
            other.first_color().map(|c| color_literal(&c, opacity))
        }
    }
}

/// `BorderRadius` for a rectangle, or `None` when every corner is negligible.
pub fn border_radius(radii: &CornerRadii, unit: &str) -> Option<String> {
    if radii.is_uniform() {
        return (radii.top_left > MIN_RADIUS)
            .then(|| format!("BorderRadius.circular({})", dim(radii.top_left, unit)));
    }
    let corners: Vec<String> = [
        ("topLeft", radii.top_left),
        ("topRight", radii.top_right),
        ("bottomRight", radii.bottom_right),
        ("bottomLeft", radii.bottom_left),
    ]
    .iter()
    .filter(|(_, r)| *r > MIN_RADIUS)
    .map(|(corner, r)| format!("{}: Radius.circular({})", corner, dim(*r, unit)))
    .collect();
    (!corners.is_empty()).then(|| format!("BorderRadius.only({}, )", corners.join(", ")))
}

/// Radius for an ellipse drawn as a box.
pub fn ellipse_radius() -> String {
    "BorderRadius.all(Radius.elliptical(9999.0, 9999.0))".to_string()
}

/// `Border.all` for a stroke. Flutter borders sit inside the box.
pub fn border(stroke: &Stroke, opacity: f64, node: &DesignNode, log: &mut Log, unit: &str) -> String {
    if stroke.position != StrokePosition::Inside {
        log.warn("Only inner strokes are supported on boxes", Some(node));
    }
    if stroke.join != StrokeJoin::Miter {
        log.warn("Stroke joins other than miter are not supported", Some(node));
    }
    if stroke.is_dashed() {
        log.warn("Dashed strokes are not supported on boxes", Some(node));
    }
    format!(
        "Border.all(width: {}, color: {}, )",
        dim(stroke.width, unit),
        color_literal(&stroke.color, opacity)
    )
}

/// `[BoxShadow(...), ]` for a drop shadow.
pub fn box_shadow(shadow: &Shadow, opacity: f64) -> String {
    format!(
        "[BoxShadow(color: {}, offset: Offset({}, {}), blurRadius: {}, ), ]",
        color_literal(&shadow.color, opacity),
        fix(shadow.x, 1),
        fix(shadow.y, 1),
        fix(shadow.blur, 1)
    )
}

/// `Shadow(...)` for text.
pub fn text_shadow(shadow: &Shadow, opacity: f64) -> String {
    format!(
        "Shadow(color: {}, offset: Offset({}, {}), blurRadius: {}, )",
        color_literal(&shadow.color, opacity),
        fix(shadow.x, 1),
        fix(shadow.y, 1),
        fix(shadow.blur, 1)
    )
}
