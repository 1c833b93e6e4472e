//! Wrappers applied around a node after its layout.
//!
//! Decorators are plain `String -> String` transforms collected when a node is
//! built and applied in order: tap handler, prototype link, background blur.
//! The layer-name comment is applied last, outside every decorator.

use smallvec::SmallVec;

use dartboard_core::dart::{fix, shorten};
use dartboard_core::document::{InteractionAction, Transition};
use dartboard_core::{DesignNode, Prop};

use crate::context::{Context, DartType, Parameter};
use crate::naming;

/// A node carries at most one decorator of each kind.
pub type Decorators = SmallVec<[Decorator; 3]>;

/// Longest layer name copied into a comment.
const COMMENT_NAME_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum Decorator {
    /// Calls an exposed `VoidCallback` parameter.
    Tap { callback: String },
    /// Navigates to another widget on tap.
    PageLink { widget: String, transition: Transition },
    /// Background blur behind the node.
    Blur { amount: f64 },
}

impl Decorator {
    pub fn apply(&self, child: String, ctx: &mut Context<'_>) -> String {
        match self {
            Decorator::Tap { callback } => format!(
                "GestureDetector(onTap: () => {}?.call(), child: {}, )",
                callback, child
            ),
            Decorator::PageLink { widget, transition } => {
                ctx.add_import("package:adobe_xd/page_link.dart");
                format!(
                    "PageLink(links: [PageLinkInfo(transition: LinkTransition.{}, ease: Curves.{}, duration: {}, pageBuilder: () => {}(), ), ], child: {}, )",
                    link_transition(transition),
                    curve(&transition.easing),
                    fix(transition.duration, 2),
                    widget,
                    child
                )
            }
            Decorator::Blur { amount } => {
                ctx.add_import_as("dart:ui", "ui");
                let sigma = fix(*amount, 1);
                format!(
                    "ClipRect(child: BackdropFilter(filter: ui.ImageFilter.blur(sigmaX: {}, sigmaY: {}), child: {}, ), )",
                    sigma, sigma, child
                )
            }
        }
    }
}

/// Collect the decorators for a node, registering the tap parameter.
///
/// `tap_enabled` is false for export modes that replace the node.
pub fn collect(design: &DesignNode, tap_enabled: bool, ctx: &mut Context<'_>) -> Decorators {
    let mut decorators = Decorators::new();

    if tap_enabled {
        if let Some(raw) = design.prop_str(Prop::TapCallbackName) {
            let callback = naming::identifier(raw, false);
            ctx.add_param(Parameter::new(callback.clone(), DartType::VoidCallback));
            decorators.push(Decorator::Tap { callback });
        }
    }

    if ctx.settings.enable_prototype {
        if let Some(link) = page_link(design, ctx) {
            decorators.push(link);
        }
    }

    if let Some(blur) = design.blur.as_ref().filter(|b| b.visible) {
        if blur.is_background_effect {
            decorators.push(Decorator::Blur {
                amount: blur.amount,
            });
        } else {
            ctx.log.warn("Object blur is not supported", Some(design));
        }
    }

    decorators
}

fn page_link(design: &DesignNode, ctx: &mut Context<'_>) -> Option<Decorator> {
    let mut link = None;
    for interaction in &design.interactions {
        if interaction.trigger != "tap" {
            ctx.log.warn(
                format!("Unsupported interaction trigger '{}'", interaction.trigger),
                Some(design),
            );
            continue;
        }
        match &interaction.action {
            InteractionAction::GoToArtboard {
                destination,
                transition,
            } if link.is_none() => match ctx.widget_name(destination) {
                Some(widget) => {
                    link = Some(Decorator::PageLink {
                        widget: widget.to_string(),
                        transition: transition.clone(),
                    });
                }
                None => ctx
                    .log
                    .warn("Prototype link target is not an artboard", Some(design)),
            },
            InteractionAction::GoToArtboard { .. } => {
                ctx.log
                    .warn("Only one prototype link per layer is supported", Some(design));
            }
            InteractionAction::GoBack | InteractionAction::Unsupported => {
                ctx.log
                    .warn("Only 'go to artboard' interactions are supported", Some(design));
            }
        }
    }
    link
}

fn link_transition(transition: &Transition) -> &'static str {
    let direction = transition.from_direction.as_deref().unwrap_or("R");
    match (transition.kind.as_str(), direction) {
        ("none", _) => "None",
        ("slide", "L") => "SlideRight",
        ("slide", "T") => "SlideDown",
        ("slide", "B") => "SlideUp",
        ("slide", _) => "SlideLeft",
        ("push", "L") => "PushRight",
        ("push", "T") => "PushDown",
        ("push", "B") => "PushUp",
        ("push", _) => "PushLeft",
        _ => "Fade",
    }
}

fn curve(easing: &str) -> &'static str {
    match easing {
        "linear" => "linear",
        "ease-in" => "easeIn",
        "ease-in-out" => "easeInOut",
        "ease-in-back" => "easeInBack",
        "ease-out-back" => "easeOutBack",
        "ease-in-out-back" => "easeInOutBack",
        "bounce" => "bounceOut",
        "snap" => "fastOutSlowIn",
        _ => "easeOut",
    }
}

/// Insert a layer-name comment after the first opening parenthesis.
pub fn comment(code: String, design: &DesignNode) -> String {
    let name = shorten(design.name.trim(), COMMENT_NAME_LENGTH);
    let label = design.kind.label();
    match code.find('(') {
        Some(i) => format!(
            "{}\n// Layer: '{}' ({})\n{}",
            &code[..=i],
            name,
            label,
            &code[i + 1..]
        ),
        None => format!("// Layer: '{}' ({})\n{}", name, label, code),
    }
}
