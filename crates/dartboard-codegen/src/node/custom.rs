//! User code templates with `<CHILDREN>` and `<THIS>` placeholders.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use dartboard_core::Prop;

use super::{child_list, ExportMode, Node};
use crate::context::Context;

const DEFAULT_TEMPLATE: &str = "Container()";

/// Settings object accepted by a placeholder, e.g. `<CHILDREN{"layout":"size"}>`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TagSettings {
    layout: Option<String>,
    decorators: bool,
}

fn placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<(CHILDREN|THIS)(\{[^}]*?\})?>").expect("placeholder pattern is valid")
    })
}

/// Substitute the first placeholder in the node's template.
pub(super) fn expand(node: &mut Node<'_>, ctx: &mut Context<'_>) -> String {
    let design = node.design;
    let template = design
        .prop_str(Prop::CustomCode)
        .unwrap_or(DEFAULT_TEMPLATE)
        .to_string();

    let Some(caps) = placeholder().captures(&template) else {
        return template;
    };
    let Some(whole) = caps.get(0) else {
        return template;
    };
    let range = whole.range();
    let tag = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let settings = match caps.get(2) {
        Some(raw) => parse_settings(raw.as_str()).unwrap_or_else(|e| {
            ctx.log.warn(
                format!("Unable to parse placeholder settings in custom code: {}", e),
                Some(design),
            );
            TagSettings::default()
        }),
        None => TagSettings::default(),
    };

    let replacement = match tag {
        "CHILDREN" => {
            match settings.layout.as_deref() {
                Some("none") => node.children.iter_mut().for_each(|c| c.layout.enabled = false),
                Some("size") => node.children.iter_mut().for_each(|c| c.layout.reset(true)),
                _ => {}
            }
            child_list(&mut node.children, ctx)
        }
        _ => {
            let mode = std::mem::replace(&mut node.mode, ExportMode::Inline);
            let code = if settings.decorators {
                node.serialize(ctx)
            } else {
                node.serialize_body(ctx)
            };
            node.mode = mode;
            code
        }
    };

    format!("{}{}{}", &template[..range.start], replacement, &template[range.end..])
}

/// Strict JSON first, then with single quotes swapped for double quotes.
fn parse_settings(raw: &str) -> serde_json::Result<TagSettings> {
    serde_json::from_str(raw).or_else(|_| serde_json::from_str(&raw.replace('\'', "\"")))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::context::Target;
    use dartboard_core::document::Fill;
    use dartboard_core::{Color, DesignKind, DesignNode, Settings};
    use serde_json::json;

    fn dot(guid: &str, x: f64) -> DesignNode {
        DesignNode::new(guid, "Dot", DesignKind::Ellipse)
            .with_bounds(10.0, 10.0)
            .at(x, 0.0)
            .with_fill(Fill::Color(Color::BLACK))
    }

    fn custom_group(template: Option<&str>) -> DesignNode {
        let mut group = DesignNode::new("g", "Row", DesignKind::Group)
            .with_bounds(40.0, 10.0)
            .with_children(vec![dot("a", 0.0), dot("b", 30.0)]);
        group.set_prop(Prop::ExportMode, json!("custom"));
        if let Some(template) = template {
            group.set_prop(Prop::CustomCode, json!(template));
        }
        group
    }

    #[test]
    fn test_default_template() {
        let doc = board(vec![custom_group(None)]);
        assert_eq!(compile(&doc, "g"), "Container()");
    }

    #[test]
    fn test_children_without_layout() {
        let doc = board(vec![custom_group(Some("Wrap(children: [<CHILDREN{'layout':'none'}>])"))]);
        let dot = "Container(decoration: BoxDecoration(color: const Color(0xff000000), \
                   borderRadius: BorderRadius.all(Radius.elliptical(9999.0, 9999.0)), ), )";
        assert_eq!(compile(&doc, "g"), format!("Wrap(children: [{dot}, {dot}, ])"));
    }

    #[test]
    fn test_children_sized() {
        let doc = board(vec![custom_group(Some("Row(children: [<CHILDREN{\"layout\":\"size\"}>])"))]);
        let out = compile(&doc, "g");
        assert_eq!(out.matches("Container(width: 10, height: 10, ").count(), 2);
        assert!(!out.contains("Transform.translate"));
    }

    #[test]
    fn test_this_placeholder() {
        let doc = board(vec![custom_group(Some("Card(child: <THIS>)"))]);
        let out = compile(&doc, "g");
        assert!(out.starts_with("Card(child: Stack(children: <Widget>["));
        // the second dot keeps its offset inside the stack
        assert!(out.contains("Transform.translate(offset: Offset(30, 0), "));
    }

    #[test]
    fn test_bad_settings_warn() {
        let doc = board(vec![custom_group(Some("Card(child: <THIS{decorators}>)"))]);
        let (out, _, log) = compile_in(&doc, "g", Settings::default(), Target::Clipboard);
        assert!(out.starts_with("Card(child: Stack("));
        assert_eq!(log.warnings().count(), 1);
    }
}
