//! Artboard and master component bodies.

use dartboard_core::dart::color_literal;
use dartboard_core::document::{DesignKind, Fill};

use super::{child_stack, Node};
use crate::context::Context;

pub(super) fn serialize(node: &mut Node<'_>, ctx: &mut Context<'_>) -> String {
    match node.design.kind {
        DesignKind::Artboard => artboard(node, ctx),
        _ => child_stack(&mut node.children, ctx),
    }
}

/// `Scaffold` with the artboard fill as background colour.
///
/// A first child named `bg` with a fill supplies the colour instead; when it
/// has exactly one sibling, that sibling is the whole body.
fn artboard(node: &mut Node<'_>, ctx: &mut Context<'_>) -> String {
    let has_bg = node.has_background();
    let fill_owner = match node.children.first() {
        Some(bg) if has_bg && bg.design.active_fill().is_some() => bg.design,
        _ => node.design,
    };

    let color = match fill_owner.active_fill() {
        Some(Fill::Color(c)) => Some(color_literal(c, 1.0)),
        Some(Fill::ImageFill { .. }) => {
            ctx.log
                .warn("Image fills are not supported on artboards", Some(fill_owner));
            None
        }
        Some(other) => {
            ctx.log.warn(
                "Only solid colour backgrounds are supported on artboards",
                Some(fill_owner),
            );
            other.first_color().map(|c| color_literal(&c, 1.0))
        }
        None => None,
    };

    let body = if has_bg && node.children.len() == 2 {
        node.children[1].serialize(ctx)
    } else {
        child_stack(&mut node.children, ctx)
    };

    let color = color
        .map(|c| format!("backgroundColor: {}, ", c))
        .unwrap_or_default();
    format!("Scaffold({}body: {}, )", color, body)
}
