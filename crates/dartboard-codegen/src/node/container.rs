//! Rectangles and ellipses as `Container`.

use convert_case::{Case, Casing};

use dartboard_core::dart::{color_literal, dim, fix};
use dartboard_core::document::{DesignKind, Fill, ImageScale};
use dartboard_core::{DesignNode, Prop};

use super::Node;
use crate::context::Context;
use crate::paint;

pub(super) fn serialize(node: &mut Node<'_>, ctx: &mut Context<'_>) -> String {
    let design = node.design;
    let unit = ctx.settings.width_unit.clone();
    let mut params = String::new();

    if node.layout.enabled && node.layout.should_fix_size {
        node.layout.should_fix_size = false;
        params.push_str(&format!(
            "width: {}, height: {}, ",
            dim(design.local_bounds.width, &unit),
            dim(design.local_bounds.height, &unit)
        ));
    }

    params.push_str(&decoration(node, ctx, &unit));

    if node.layout.enabled {
        if let Some(padding) = node.layout.padding.take() {
            params.push_str(&format!("margin: {}, ", padding.to_dart(&unit)));
        }
    }

    format!("Container({})", params)
}

/// `color: ..., ` for plain boxes, `decoration: BoxDecoration(...), ` otherwise.
fn decoration(node: &Node<'_>, ctx: &mut Context<'_>, unit: &str) -> String {
    let design = node.design;
    let mut opacity = ctx.index.inherited_opacity(design);
    if let Some(blur) = design.blur.as_ref().filter(|b| b.visible && b.is_background_effect) {
        opacity *= blur.fill_opacity;
    }

    let fill = fill_param(node, opacity, ctx);

    let mut extras = String::new();
    match &design.kind {
        DesignKind::Ellipse => {
            extras.push_str(&format!("borderRadius: {}, ", paint::ellipse_radius()));
        }
        DesignKind::Rectangle { corner_radii } => {
            if let Some(radius) = paint::border_radius(corner_radii, unit) {
                extras.push_str(&format!("borderRadius: {}, ", radius));
            }
        }
        _ => {}
    }
    if let Some(stroke) = design.active_stroke() {
        extras.push_str(&format!(
            "border: {}, ",
            paint::border(stroke, opacity, design, &mut ctx.log, unit)
        ));
    }
    if let Some(shadow) = design.visible_shadow() {
        extras.push_str(&format!("boxShadow: {}, ", paint::box_shadow(shadow, opacity)));
    }

    if extras.is_empty() && (fill.is_empty() || fill.starts_with("color: ")) {
        return fill;
    }
    format!("decoration: BoxDecoration({}{}), ", fill, extras)
}

fn fill_param(node: &Node<'_>, opacity: f64, ctx: &mut Context<'_>) -> String {
    let design = node.design;
    let Some(fill) = design.active_fill() else {
        return String::new();
    };
    match fill {
        Fill::Color(c) => match node.param("fill") {
            Some(name) => format!("color: {}, ", name),
            None => format!("color: {}, ", color_literal(c, opacity)),
        },
        Fill::ImageFill { scale_behavior, .. } => {
            let image = match node.param("fill") {
                Some(name) => name.to_string(),
                None => asset_image(design, ctx),
            };
            let fit = match scale_behavior {
                ImageScale::Cover => "BoxFit.cover",
                ImageScale::Stretch => "BoxFit.fill",
            };
            let filter = if opacity < 1.0 {
                format!(
                    "colorFilter: ColorFilter.mode(Colors.black.withOpacity({}), BlendMode.dstIn), ",
                    fix(opacity, 2)
                )
            } else {
                String::new()
            };
            format!(
                "image: DecorationImage(image: {}, fit: {}, {}), ",
                image, fit, filter
            )
        }
        other => match paint::gradient(other, opacity) {
            Some(gradient) => format!("gradient: {}, ", gradient),
            None => paint::solid_color(other, opacity, design, &mut ctx.log)
                .map(|c| format!("color: {}, ", c))
                .unwrap_or_default(),
        },
    }
}

/// `const AssetImage('assets/images/<name>.png')` for an image fill.
///
/// The asset name comes from the document image map, then the node's image
/// fill name, then the layer name.
pub(super) fn asset_image(design: &DesignNode, ctx: &mut Context<'_>) -> String {
    let mapped = match design.active_fill() {
        Some(Fill::ImageFill {
            file_name: Some(key),
            ..
        }) => ctx.settings.image_name(key).map(str::to_string),
        _ => None,
    };
    let name = match mapped.or_else(|| design.prop_str(Prop::ImageFillName).map(str::to_string)) {
        Some(name) => name,
        None => {
            ctx.log
                .warn("Image fill has no asset name; using the layer name", Some(design));
            design.name.trim().to_case(Case::Snake)
        }
    };
    format!("const AssetImage('assets/images/{}.png')", name)
}
