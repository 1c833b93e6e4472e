//! Groups, scroll groups and component instances.

use dartboard_core::dart::{dim, round_to};
use dartboard_core::document::{DesignKind, GroupLayoutType, ScrollDirection, Spacings, StackOrientation};
use dartboard_core::types::Rect;
use dartboard_layout::{normalize_padding, normalize_spacings, trim_spacing};

use super::{child_stack, Node, NodeKind};
use crate::context::Context;
use crate::paint;

#[derive(Debug, Clone, PartialEq)]
pub enum GroupKind {
    Plain,
    Scroll(ScrollDirection),
    /// A component instance, emitted as a call to its master's widget.
    Instance { widget: String },
}

pub(super) fn serialize(node: &mut Node<'_>, ctx: &mut Context<'_>) -> String {
    let design = node.design;
    if design.marked_for_export {
        return export_image(node, ctx);
    }
    if let NodeKind::Group(GroupKind::Instance { widget }) = &node.kind {
        return format!("{}()", widget);
    }
    if node.children.is_empty() {
        return String::new();
    }
    if design.mask {
        ctx.log
            .warn("Masks are not supported; the mask shape is drawn as a layer", Some(design));
    }

    let has_background = node.has_background();
    let start = usize::from(has_background);

    let mut code = match design.layout.stack.as_ref().filter(|_| design.layout.is_stack()) {
        Some(stack) => {
            let spacings = stack.spacings.clone();
            flex(&mut node.children[start..], stack.orientation, &spacings, ctx)
        }
        None => {
            let rest = &mut node.children[start..];
            if has_background && rest.len() == 1 {
                rest[0].serialize(ctx)
            } else {
                child_stack(rest, ctx)
            }
        }
    };

    if design.layout.layout_type != GroupLayoutType::None {
        let values = design.layout.padding.as_ref().and_then(|p| p.values.as_ref());
        if let Some(padding) = normalize_padding(values) {
            code = format!(
                "Padding(padding: {}, child: {}, )",
                padding.to_dart(&ctx.settings.width_unit),
                code
            );
        }
    }

    if has_background {
        code = background(node, code, ctx);
    }

    if let NodeKind::Group(GroupKind::Scroll(direction)) = node.kind {
        code = scroll_content(node, code, ctx);
        code = scroll_view(code, direction);
    }
    code
}

/// `Image` for a group rendered to a PNG by the host.
fn export_image(node: &mut Node<'_>, ctx: &mut Context<'_>) -> String {
    let design = node.design;
    let unit = ctx.settings.width_unit.clone();
    let path = ctx.raster.add(design);
    node.layout.should_fix_size = false;
    format!(
        "Image(width: {}, height: {}, image: AssetImage('{}'), )",
        dim(design.local_bounds.width, &unit),
        dim(design.local_bounds.height, &unit),
        path
    )
}

/// `Column` or `Row` with fixed-size cells and spacers.
///
/// Children are in z-order, so the last child is the first cell.
fn flex(
    children: &mut [Node<'_>],
    orientation: StackOrientation,
    spacings: &Spacings,
    ctx: &mut Context<'_>,
) -> String {
    let unit = ctx.settings.width_unit.clone();
    let (widget, axis) = match orientation {
        StackOrientation::Vertical => ("Column", "height"),
        StackOrientation::Horizontal => ("Row", "width"),
    };
    let gaps = children.len().saturating_sub(1);
    let spacings = normalize_spacings(&emission_order(spacings, gaps), gaps);

    let mut items = String::new();
    let mut trimmed = false;
    for (i, child) in children.iter_mut().rev().enumerate() {
        child.layout.should_fix_size = false;
        let code = child.serialize(ctx);
        if code.is_empty() {
            continue;
        }
        let size = match orientation {
            StackOrientation::Vertical => child.design.local_bounds.height,
            StackOrientation::Horizontal => child.design.local_bounds.width,
        };
        let cell = if code.starts_with("Image(") {
            code
        } else {
            format!("SizedBox({}: {}, child: {}, )", axis, dim(size, &unit), code)
        };
        if i > 0 {
            let mut gap = spacings.get(i - 1).copied().unwrap_or(0.0);
            if !trimmed {
                if let Some(t) = trim_spacing(gap) {
                    gap = t;
                    trimmed = true;
                }
            }
            if gap > 0.0 {
                items.push_str(&format!("SizedBox({}: {}, ), ", axis, dim(gap, &unit)));
            }
        }
        items.push_str(&cell);
        items.push_str(", ");
    }

    format!(
        "{}(crossAxisAlignment: CrossAxisAlignment.start, mainAxisAlignment: MainAxisAlignment.start, children: <Widget>[{}], )",
        widget, items
    )
}

/// Per-gap spacings reordered to match the reversed cells.
fn emission_order(spacings: &Spacings, gaps: usize) -> Spacings {
    match spacings {
        Spacings::Uniform(v) => Spacings::Uniform(*v),
        Spacings::PerGap(list) => Spacings::PerGap(
            (0..gaps)
                .map(|i| list.get(i).or(list.last()).copied().unwrap_or(0.0))
                .rev()
                .collect(),
        ),
    }
}

/// Draw the background child as the group's `BoxDecoration`.
fn background(node: &mut Node<'_>, code: String, ctx: &mut Context<'_>) -> String {
    let unit = ctx.settings.width_unit.clone();
    let bg = node.children[0].design;
    if bg.rotation != 0.0 || bg.flip_y {
        ctx.log
            .warn("Rotation and flip are not supported on backgrounds", Some(bg));
    }

    let opacity = ctx.index.inherited_opacity(bg);
    let mut deco = String::new();
    if let Some(color) = bg
        .active_fill()
        .and_then(|fill| paint::solid_color(fill, opacity, bg, &mut ctx.log))
    {
        deco.push_str(&format!("color: {}, ", color));
    }
    if let Some(stroke) = bg.active_stroke() {
        deco.push_str(&format!(
            "border: {}, ",
            paint::border(stroke, opacity, bg, &mut ctx.log, &unit)
        ));
    }
    match &bg.kind {
        DesignKind::Rectangle { corner_radii } => {
            if let Some(radius) = paint::border_radius(corner_radii, &unit) {
                deco.push_str(&format!("borderRadius: {}, ", radius));
            }
        }
        DesignKind::Ellipse => {
            deco.push_str(&format!("borderRadius: {}, ", paint::ellipse_radius()));
        }
        _ => {}
    }

    let decoration = format!("BoxDecoration({})", deco);
    match code.strip_prefix("Padding(") {
        Some(rest) => format!("Container(decoration: {}, {}", decoration, rest),
        None => format!("Container(decoration: {}, child: {}, )", decoration, code),
    }
}

/// Size the scrolled content to the children's extent.
fn scroll_content(node: &Node<'_>, code: String, ctx: &Context<'_>) -> String {
    let unit = ctx.settings.width_unit.as_str();
    let mut bounds = node.children.iter().map(|c| c.design.bounds_in_parent());
    let Some(first) = bounds.next() else {
        return code;
    };
    let extent: Rect = bounds.fold(first, |acc, b| acc.union(&b));
    format!(
        "SizedBox(width: {}, height: {}, child: {}, )",
        dim(round_to(extent.width, 1), unit),
        dim(round_to(extent.height, 1), unit),
        code
    )
}

pub(super) fn scroll_view(code: String, direction: ScrollDirection) -> String {
    match direction {
        ScrollDirection::Vertical => {
            format!("SingleChildScrollView(primary: false, child: {}, )", code)
        }
        ScrollDirection::Horizontal => format!(
            "SingleChildScrollView(primary: false, scrollDirection: Axis.horizontal, child: {}, )",
            code
        ),
        ScrollDirection::Panning => scroll_view(
            scroll_view(code, ScrollDirection::Vertical),
            ScrollDirection::Horizontal,
        ),
    }
}
