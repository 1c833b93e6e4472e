//! SVG markup for shape units.

use glam::DAffine2;

use dartboard_core::dart::fix;
use dartboard_core::document::{CornerRadii, DesignKind, Fill, StrokeCap, StrokeJoin, StrokePosition};
use dartboard_core::{Color, DesignNode};

use crate::context::Context;
use crate::shape::{ShapeMember, ShapeUnit};

/// SVG's default miter limit.
const DEFAULT_MITER_LIMIT: f64 = 4.0;

/// Render a unit as a standalone `<svg>` document in its own view box.
pub(crate) fn render(unit: &ShapeUnit<'_>, ctx: &mut Context<'_>) -> String {
    let vb = unit.view_box();
    let mut body = members(unit, ctx);

    let transformed = unit.members().iter().any(|m| match m {
        ShapeMember::Primitive(node) => !node.transform.is_identity(),
        ShapeMember::Nested(_) => false,
    });
    if transformed {
        body = format!("<g>{}</g>", body);
    }

    format!(
        "<svg viewBox=\"{} {} {} {}\" >{}</svg>",
        fix(vb.x, 1),
        fix(vb.y, 1),
        fix(vb.width, 1),
        fix(vb.height, 1),
        body
    )
}

fn members(unit: &ShapeUnit<'_>, ctx: &mut Context<'_>) -> String {
    let mut out = String::new();
    for member in unit.members() {
        match member {
            ShapeMember::Primitive(node) => out.push_str(&path_element(node, ctx)),
            ShapeMember::Nested(inner) => {
                let body = members(inner, ctx);
                match inner.frame().and_then(|f| transform_attr(&f.transform.affine())) {
                    Some(xform) => out.push_str(&format!("<g transform=\"{}\">{}</g>", xform, body)),
                    None => out.push_str(&format!("<g>{}</g>", body)),
                }
            }
        }
    }
    out
}

fn path_element(node: &DesignNode, ctx: &mut Context<'_>) -> String {
    let opacity = ctx.index.inherited_opacity(node);
    let mut defs = String::new();

    let mut fill_attr = "fill=\"none\"".to_string();
    if let Some(fill) = node.active_fill() {
        match fill {
            Fill::Color(c) => fill_attr = paint_attr("fill", c, opacity),
            Fill::LinearGradient { .. } | Fill::RadialGradient { .. } => {
                fill_attr = "fill=\"url(#gradient)\"".to_string();
                defs.push_str(&gradient_def(fill));
            }
            Fill::AngularGradient { .. } => {
                ctx.log
                    .warn("Angular gradient fills are not supported on shapes", Some(node));
            }
            Fill::ImageFill { .. } => {
                ctx.log.warn("Image fills are not supported on shapes", Some(node));
            }
        }
    }

    let stroke_attr = stroke_attr(node, opacity, ctx);

    if node.visible_shadow().is_some() {
        ctx.log.warn("Shadows are not supported on shapes", Some(node));
    }

    let affine = node.transform.affine()
        * DAffine2::from_translation(glam::DVec2::new(node.local_bounds.x, node.local_bounds.y));
    let xform = transform_attr(&affine)
        .map(|t| format!("transform=\"{}\" ", t))
        .unwrap_or_default();

    let defs = if defs.is_empty() {
        defs
    } else {
        format!("<defs>{}</defs>", defs)
    };
    format!(
        "{}<path {}d=\"{}\" {} {} />",
        defs,
        xform,
        path_data(node),
        fill_attr,
        stroke_attr
    )
}

fn paint_attr(name: &str, color: &Color, opacity: f64) -> String {
    let alpha = color.alpha() * opacity;
    let mut attr = format!("{}=\"{}\"", name, color.to_hex());
    if alpha != 1.0 {
        attr.push_str(&format!(" {}-opacity=\"{}\"", name, fix(alpha, 2)));
    }
    attr
}

fn stroke_attr(node: &DesignNode, opacity: f64, ctx: &mut Context<'_>) -> String {
    let Some(stroke) = node.active_stroke() else {
        return "stroke=\"none\"".to_string();
    };
    if stroke.position != StrokePosition::Center {
        ctx.log
            .warn("Only centre strokes are supported on shapes", Some(node));
    }

    let mut attr = paint_attr("stroke", &stroke.color, opacity);
    attr.push_str(&format!(" stroke-width=\"{}\"", fix(stroke.width, 2)));
    if stroke.is_dashed() {
        let dash = stroke.dash_array[0];
        let gap = stroke.dash_array.get(1).copied().unwrap_or(dash);
        attr.push_str(&format!(
            " stroke-dasharray=\"{} {}\"",
            fix(dash, 2),
            fix(gap, 2)
        ));
        if stroke.dash_offset != 0.0 {
            attr.push_str(&format!(" stroke-dashoffset=\"{}\"", fix(stroke.dash_offset, 2)));
        }
    }
    if stroke.join == StrokeJoin::Miter && stroke.miter_limit != DEFAULT_MITER_LIMIT {
        attr.push_str(&format!(" stroke-miterlimit=\"{}\"", fix(stroke.miter_limit, 2)));
    }
    if stroke.cap != StrokeCap::Butt {
        attr.push_str(&format!(" stroke-linecap=\"{}\"", stroke.cap.as_str()));
    }
    if stroke.join != StrokeJoin::Miter {
        attr.push_str(&format!(" stroke-linejoin=\"{}\"", stroke.join.as_str()));
    }
    attr
}

/// `matrix(...)` for any linear part, `translate(...)` for offsets only.
fn transform_attr(m: &DAffine2) -> Option<String> {
    let [a, b] = m.matrix2.x_axis.to_array();
    let [c, d] = m.matrix2.y_axis.to_array();
    let [e, f] = m.translation.to_array();
    if a != 1.0 || b != 0.0 || c != 0.0 || d != 1.0 {
        Some(format!(
            "matrix({}, {}, {}, {}, {}, {})",
            fix(a, 6),
            fix(b, 6),
            fix(c, 6),
            fix(d, 6),
            fix(e, 2),
            fix(f, 2)
        ))
    } else if e != 0.0 || f != 0.0 {
        Some(format!("translate({}, {})", fix(e, 2), fix(f, 2)))
    } else {
        None
    }
}

fn gradient_def(fill: &Fill) -> String {
    let stops: String = fill
        .color_stops()
        .iter()
        .map(|s| {
            let opacity = if s.color.a != 255 {
                format!(" stop-opacity=\"{}\"", fix(s.color.alpha(), 2))
            } else {
                String::new()
            };
            format!(
                "<stop offset=\"{}\" stop-color=\"{}\"{} />",
                fix(s.stop, 6),
                s.color.to_hex(),
                opacity
            )
        })
        .collect();

    match fill {
        Fill::LinearGradient {
            start_x,
            start_y,
            end_x,
            end_y,
            ..
        } => format!(
            "<linearGradient id=\"gradient\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">{}</linearGradient>",
            fix(*start_x, 6),
            fix(*start_y, 6),
            fix(*end_x, 6),
            fix(*end_y, 6),
            stops
        ),
        Fill::RadialGradient {
            start_x,
            start_y,
            start_r,
            end_x,
            end_y,
            end_r,
            gradient_transform,
            ..
        } => {
            let m = gradient_transform.affine();
            let inv = m.inverse();
            let focus = inv.transform_point2(glam::DVec2::new(*start_x, *start_y));
            let center = inv.transform_point2(glam::DVec2::new(*end_x, *end_y));
            let xform = if gradient_transform.is_identity() {
                String::new()
            } else {
                let [a, b, c, d, e, f] = gradient_transform.0;
                format!(
                    " gradientTransform=\"matrix({} {} {} {} {} {})\"",
                    fix(a, 6),
                    fix(b, 6),
                    fix(c, 6),
                    fix(d, 6),
                    fix(e, 6),
                    fix(f, 6)
                )
            };
            format!(
                "<radialGradient id=\"gradient\"{} fx=\"{}\" fy=\"{}\" fr=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\">{}</radialGradient>",
                xform,
                fix(focus.x, 6),
                fix(focus.y, 6),
                fix(*start_r, 6),
                fix(center.x, 6),
                fix(center.y, 6),
                fix(*end_r, 6),
                stops
            )
        }
        _ => String::new(),
    }
}

/// Path data, synthesized for rectangles and ellipses.
fn path_data(node: &DesignNode) -> String {
    let (w, h) = (node.local_bounds.width, node.local_bounds.height);
    match &node.kind {
        DesignKind::Rectangle { corner_radii } => rect_path(w, h, corner_radii),
        DesignKind::Ellipse => {
            let (rx, ry) = (w / 2.0, h / 2.0);
            format!(
                "M{} 0A{} {} 0 0 1 {} {}A{} {} 0 0 1 {} 0Z",
                fix(rx, 2),
                fix(rx, 2),
                fix(ry, 2),
                fix(rx, 2),
                fix(h, 2),
                fix(rx, 2),
                fix(ry, 2),
                fix(rx, 2)
            )
        }
        kind => kind.path_data().unwrap_or_default().to_string(),
    }
}

fn rect_path(w: f64, h: f64, r: &CornerRadii) -> String {
    if r.is_zero() {
        return format!("M0 0H{}V{}H0Z", fix(w, 2), fix(h, 2));
    }
    // Radii are clamped to half the shorter side.
    let max = w.min(h) / 2.0;
    let [tl, tr, br, bl] = [r.top_left, r.top_right, r.bottom_right, r.bottom_left].map(|v| v.min(max));
    let arc = |r: f64, x: f64, y: f64| format!("A{} {} 0 0 1 {} {}", fix(r, 2), fix(r, 2), fix(x, 2), fix(y, 2));
    format!(
        "M{} 0H{}{}V{}{}H{}{}V{}{}Z",
        fix(tl, 2),
        fix(w - tr, 2),
        arc(tr, w, tr),
        fix(h - br, 2),
        arc(br, w - br, h),
        fix(bl, 2),
        arc(bl, 0.0, h - bl),
        fix(tl, 2),
        arc(tl, tl, 0.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Target;
    use dartboard_core::document::{ColorStop, Stroke};
    use dartboard_core::{Document, DocumentIndex, Settings};

    fn with_ctx<F: FnOnce(&DocumentIndex<'_>, &mut Context<'_>)>(nodes: Vec<DesignNode>, f: F) {
        let doc = Document {
            children: vec![DesignNode::new("h", "Home", DesignKind::Artboard).with_children(nodes)],
            ..Default::default()
        };
        let index = DocumentIndex::new(&doc);
        let mut ctx = Context::new(&index, Settings::default(), Target::Files);
        f(&index, &mut ctx);
    }

    #[test]
    fn test_rectangle_markup() {
        let rect = DesignNode::new("r", "Box", DesignKind::Rectangle { corner_radii: Default::default() })
            .with_bounds(20.0, 10.0)
            .with_fill(Fill::Color(Color::rgb(255, 0, 0)));
        with_ctx(vec![rect], |index, ctx| {
            let unit = ShapeUnit::from_primitive(index.node("r").unwrap());
            assert_eq!(
                render(&unit, ctx),
                "<svg viewBox=\"0 0 20 10\" ><path d=\"M0 0H20V10H0Z\" fill=\"#ff0000\" stroke=\"none\" /></svg>"
            );
        });
    }

    #[test]
    fn test_translated_members_are_grouped() {
        let mut line = DesignNode::new("l", "Line", DesignKind::Line { path_data: "M0 0L10 0".into() })
            .with_bounds(10.0, 0.0)
            .at(5.0, 5.0);
        let mut stroke = Stroke::solid(Color::BLACK, 2.0);
        stroke.dash_array = vec![4.0];
        stroke.cap = StrokeCap::Round;
        line.stroke = Some(stroke);
        line.opacity = 0.5;
        with_ctx(vec![line], |index, ctx| {
            let unit = ShapeUnit::from_primitive(index.node("l").unwrap());
            let svg = render(&unit, ctx);
            assert!(svg.starts_with("<svg viewBox=\"5 5 10 1\" ><g><path transform=\"translate(5, 5)\" "));
            assert!(svg.contains("stroke=\"#000000\" stroke-opacity=\"0.5\" stroke-width=\"2\""));
            assert!(svg.contains("stroke-dasharray=\"4 4\""));
            assert!(svg.contains("stroke-linecap=\"round\""));
            assert!(svg.ends_with("</g></svg>"));
        });
    }

    #[test]
    fn test_gradient_defs() {
        let fill = Fill::LinearGradient {
            start_x: 0.0,
            start_y: 0.0,
            end_x: 1.0,
            end_y: 1.0,
            color_stops: vec![
                ColorStop { stop: 0.0, color: Color::WHITE },
                ColorStop { stop: 1.0, color: Color::rgba(0, 0, 0, 0) },
            ],
        };
        let path = DesignNode::new("p", "Blob", DesignKind::Path { path_data: "M0 0L1 1".into() })
            .with_bounds(1.0, 1.0)
            .with_fill(fill);
        with_ctx(vec![path], |index, ctx| {
            let unit = ShapeUnit::from_primitive(index.node("p").unwrap());
            let svg = render(&unit, ctx);
            assert!(svg.contains(
                "<defs><linearGradient id=\"gradient\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\">\
                 <stop offset=\"0\" stop-color=\"#ffffff\" />\
                 <stop offset=\"1\" stop-color=\"#000000\" stop-opacity=\"0\" />\
                 </linearGradient></defs>"
            ));
            assert!(svg.contains("fill=\"url(#gradient)\""));
            assert!(ctx.log.is_empty());
        });
    }

    #[test]
    fn test_unsupported_paint_warns() {
        let mut ellipse = DesignNode::new("e", "Dot", DesignKind::Ellipse)
            .with_bounds(10.0, 10.0)
            .with_fill(Fill::AngularGradient { color_stops: vec![] });
        ellipse.stroke = Some(Stroke {
            position: StrokePosition::Inside,
            ..Stroke::solid(Color::BLACK, 1.0)
        });
        with_ctx(vec![ellipse], |index, ctx| {
            let unit = ShapeUnit::from_primitive(index.node("e").unwrap());
            let svg = render(&unit, ctx);
            assert!(svg.contains("d=\"M5 0A5 5 0 0 1 5 10A5 5 0 0 1 5 0Z\" fill=\"none\""));
            assert_eq!(ctx.log.warnings().count(), 2);
        });
    }

    #[test]
    fn test_rounded_rect_path() {
        let radii = CornerRadii::uniform(4.0);
        assert_eq!(
            rect_path(20.0, 10.0, &radii),
            "M4 0H16A4 4 0 0 1 20 4V6A4 4 0 0 1 16 10H4A4 4 0 0 1 0 6V4A4 4 0 0 1 4 0Z"
        );
    }

    #[test]
    fn test_transform_attr() {
        assert_eq!(transform_attr(&DAffine2::IDENTITY), None);
        let rotated = DAffine2::from_angle(std::f64::consts::FRAC_PI_2);
        assert_eq!(
            transform_attr(&rotated).unwrap(),
            "matrix(0, 1, -1, 0, 0, 0)"
        );
    }
}
