//! Text layers as `Text` and `Text.rich`.

use dartboard_core::dart::{fix, string_literal};
use dartboard_core::document::{
    DesignKind, TextAlign, TextData, TextLayoutBox, TextRun, TextScript, TextTransform,
};
use dartboard_core::DesignNode;
use dartboard_layout::LayoutType;

use super::group::scroll_view;
use super::Node;
use crate::context::Context;
use crate::text::{style_params, StyleScope, TextContext};

pub(super) fn serialize(node: &mut Node<'_>, ctx: &mut Context<'_>) -> String {
    let design = node.design;
    let DesignKind::Text(data) = &design.kind else {
        return String::new();
    };

    check_unsupported(design, data, ctx);
    let text = TextContext {
        fill: design.active_fill().and_then(|f| f.first_color()),
        opacity: ctx.index.inherited_opacity(design),
        line_spacing: data.line_spacing,
        shadow: design.visible_shadow().copied(),
        color_param: node.param("fill").map(str::to_string),
    };

    let flat = data.style_ranges.len() <= 1 || node.param("text").is_some() || node.param("fill").is_some();
    let mut code = if flat {
        flat_text(node, data, &text, ctx)
    } else {
        rich_text(data, &text, ctx)
    };

    if data.clipped_by_area {
        code = scroll_view(code, Default::default());
    }

    if !node.layout.is_fixed_size {
        node.layout.should_expand = true;
    } else if node.layout.layout_type == LayoutType::Translate {
        code = size_box(node, data, code);
    }
    code
}

fn flat_text(node: &Node<'_>, data: &TextData, text: &TextContext, ctx: &mut Context<'_>) -> String {
    let default_run = TextRun::default();
    let run = data.style_ranges.first().unwrap_or(&default_run);
    add_font(run, ctx);
    let style = style_params(run, text, &ctx.settings, StyleScope::Full);

    let content = match node.param("text") {
        Some(name) => name.to_string(),
        None => string_literal(&data.text),
    };
    format!(
        "Text({}, {}{})",
        content,
        style_arg(&style.to_text_style(), style.is_empty()),
        trailing_params(data, data.line_spacing != 0.0)
    )
}

/// One root span carrying the first run's style, and a child span per run
/// carrying only what differs from it.
fn rich_text(data: &TextData, text: &TextContext, ctx: &mut Context<'_>) -> String {
    let runs = &data.style_ranges;
    let baseline = style_params(&runs[0], text, &ctx.settings, StyleScope::Baseline);

    let chars: Vec<char> = data.text.chars().collect();
    let mut start = 0;
    let mut spans = String::new();
    for (i, run) in runs.iter().enumerate() {
        if run.length == 0 {
            continue;
        }
        add_font(run, ctx);
        // The last run takes whatever text remains.
        let end = if i == runs.len() - 1 {
            chars.len()
        } else {
            (start + run.length).min(chars.len())
        };
        let slice: String = chars[start.min(end)..end].iter().collect();
        start = end;

        let delta = style_params(run, text, &ctx.settings, StyleScope::Run).delta(&baseline);
        spans.push_str(&format!(
            "TextSpan(text: {}, {}), ",
            string_literal(&slice),
            style_arg(&delta.to_text_style(), delta.is_empty())
        ));
    }

    format!(
        "Text.rich(TextSpan({}children: [{}], ), {})",
        style_arg(&baseline.to_text_style(), baseline.is_empty()),
        spans,
        trailing_params(data, data.line_spacing != 0.0)
    )
}

fn style_arg(style: &str, empty: bool) -> String {
    if empty {
        String::new()
    } else {
        format!("style: {}, ", style)
    }
}

fn trailing_params(data: &TextData, has_height: bool) -> String {
    let mut out = String::new();
    if has_height {
        out.push_str("textHeightBehavior: TextHeightBehavior(applyHeightToFirstAscent: false), ");
    }
    match data.text_align {
        TextAlign::Left => {}
        TextAlign::Center => out.push_str("textAlign: TextAlign.center, "),
        TextAlign::Right => out.push_str("textAlign: TextAlign.right, "),
    }
    if data.layout_box == TextLayoutBox::Point {
        out.push_str("softWrap: false, ");
    }
    out
}

fn add_font(run: &TextRun, ctx: &mut Context<'_>) {
    let family = ctx.settings.flutter_font(&run.font_family).to_string();
    if !family.is_empty() {
        ctx.add_font(&family);
    }
}

fn check_unsupported(design: &DesignNode, data: &TextData, ctx: &mut Context<'_>) {
    for run in &data.style_ranges {
        if run.text_script != TextScript::None {
            ctx.log
                .warn("Superscript and subscript are not supported", Some(design));
        }
        if run.text_transform != TextTransform::None {
            ctx.log
                .warn("Text transforms such as all caps are not supported", Some(design));
        }
        if run.paragraph_spacing != 0.0 {
            ctx.log.warn("Paragraph spacing is not supported", Some(design));
        }
    }
    if design.active_stroke().is_some() {
        ctx.log.warn("Text strokes are not supported", Some(design));
    }
}

/// Give translated text a width box so wrapping and alignment survive.
///
/// Point text aligned left keeps its natural width.
fn size_box(node: &mut Node<'_>, data: &TextData, code: String) -> String {
    if data.layout_box == TextLayoutBox::FixedHeight || !node.layout.enabled {
        return code;
    }
    let Some(bounds) = node.layout.bounds.as_mut() else {
        return code;
    };
    node.layout.should_fix_size = false;

    let mut width = bounds.width;
    if data.layout_box == TextLayoutBox::Point {
        match data.text_align {
            TextAlign::Right => {
                width += bounds.x;
                bounds.x = 0.0;
            }
            TextAlign::Center => {
                width += bounds.x;
                bounds.x /= 2.0;
            }
            TextAlign::Left => return code,
        }
    }
    format!("SizedBox(width: {}, child: {}, )", fix(width, 0), code)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::context::Target;
    use dartboard_core::document::{
        Fill, ResizeConstraints, Shadow, TextAlign, TextData, TextLayoutBox, TextRun, TextTransform,
    };
    use dartboard_core::{Color, DesignKind, DesignNode, Prop, Settings};
    use serde_json::json;

    fn run(length: usize, fill: Color) -> TextRun {
        TextRun {
            length,
            font_family: "Roboto".into(),
            font_size: 14.0,
            fill: Some(fill),
            ..Default::default()
        }
    }

    fn text(data: TextData) -> DesignNode {
        DesignNode::new("t", "Title", DesignKind::Text(data))
            .with_bounds(120.0, 20.0)
            .at(40.0, 100.0)
    }

    #[test]
    fn test_flat_text() {
        let data = TextData {
            text: "Hello".into(),
            style_ranges: vec![run(5, Color::BLACK)],
            ..Default::default()
        };
        let doc = board(vec![text(data)]);
        let (out, _, log) = compile_in(
            &doc,
            "t",
            Settings {
                include_name_comments: false,
                ..Default::default()
            },
            Target::Files,
        );
        assert_eq!(
            out,
            "Transform.translate(offset: Offset(40, 100), child: \
             Text('Hello', style: TextStyle(fontFamily: 'Roboto', fontSize: 14, color: const Color(0xff000000), ), softWrap: false, ), )"
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_uniform_runs_stay_flat_with_param() {
        let data = TextData {
            text: "AB".into(),
            style_ranges: vec![run(1, Color::BLACK), run(1, Color::WHITE)],
            ..Default::default()
        };
        let mut node = text(data);
        node.set_prop(Prop::TextParamName, json!("label"));
        let doc = board(vec![node]);
        let (out, scope, _) = compile_in(&doc, "t", Settings::default(), Target::Files);
        assert!(out.contains("Text(label, style: "));
        assert!(!out.contains("Text.rich"));
        assert_eq!(scope.params["label"].default.as_deref(), Some("'AB'"));
    }

    #[test]
    fn test_rich_text_color_delta() {
        let red = Color::rgb(255, 0, 0);
        let data = TextData {
            text: "ABCDEF".into(),
            style_ranges: vec![run(2, Color::BLACK), run(2, red), run(1, Color::BLACK)],
            layout_box: TextLayoutBox::AutoHeight,
            ..Default::default()
        };
        let doc = board(vec![text(data)]);
        let out = compile(&doc, "t");
        assert!(out.contains(
            "Text.rich(TextSpan(style: TextStyle(fontFamily: 'Roboto', fontSize: 14, color: const Color(0xff000000), ), \
             children: [TextSpan(text: 'AB', ), \
             TextSpan(text: 'CD', style: TextStyle(color: const Color(0xffff0000), ), ), \
             TextSpan(text: 'EF', ), ], ), )"
        ));
        // area text keeps the layout's width box
        assert!(out.starts_with("Transform.translate(offset: Offset(40, 100), child: SizedBox(width: 120, child: Text.rich("));
    }

    #[test]
    fn test_point_text_alignment_box() {
        let data = TextData {
            text: "Total".into(),
            style_ranges: vec![run(5, Color::BLACK)],
            text_align: TextAlign::Right,
            ..Default::default()
        };
        let doc = board(vec![text(data)]);
        let out = compile(&doc, "t");
        // the right edge stays put: width grows by x and the offset drops
        assert!(out.starts_with("Transform.translate(offset: Offset(0, 100), child: SizedBox(width: 160, child: Text('Total'"));
        assert!(out.contains("textAlign: TextAlign.right, softWrap: false, )"));
    }

    #[test]
    fn test_line_height_and_shadow() {
        let mut node = text(TextData {
            text: "Hi".into(),
            style_ranges: vec![run(2, Color::BLACK)],
            line_spacing: 21.0,
            layout_box: TextLayoutBox::FixedHeight,
            ..Default::default()
        });
        node.shadow = Some(Shadow {
            x: 0.0,
            y: 1.0,
            blur: 2.0,
            color: Color::BLACK,
            visible: true,
        });
        let doc = board(vec![node]);
        let out = compile(&doc, "t");
        assert!(out.contains(
            "height: 1.5, shadows: [Shadow(color: const Color(0xff000000), offset: Offset(0, 1), blurRadius: 2, ), ], ), \
             textHeightBehavior: TextHeightBehavior(applyHeightToFirstAscent: false), )"
        ));
        // fixed-height text is sized by the layout
        assert!(out.contains("SizedBox(width: 120, height: 20, child: Text('Hi'"));
    }

    #[test]
    fn test_responsive_text_expands_and_warns() {
        let mut transformed = run(2, Color::BLACK);
        transformed.text_transform = TextTransform::Uppercase;
        let mut node = text(TextData {
            text: "Hi".into(),
            style_ranges: vec![transformed],
            layout_box: TextLayoutBox::AutoHeight,
            ..Default::default()
        });
        node.fill = Some(Fill::Color(Color::WHITE));
        node.layout.resize_constraints = Some(ResizeConstraints {
            left: true,
            right: true,
            top: true,
            bottom: true,
            ..Default::default()
        });
        let doc = board(vec![node]);
        let (out, _, log) = compile_in(&doc, "t", Settings::default(), Target::Files);
        assert!(out.contains("SizedBox.expand(child: Text('Hi'"));
        assert_eq!(log.warnings().count(), 1);
    }

    #[test]
    fn test_clipped_text_scrolls() {
        let doc = board(vec![text(TextData {
            text: "Long".into(),
            style_ranges: vec![run(4, Color::BLACK)],
            layout_box: TextLayoutBox::FixedHeight,
            clipped_by_area: true,
            ..Default::default()
        })]);
        assert!(compile(&doc, "t").contains("SingleChildScrollView(primary: false, child: Text('Long'"));
    }
}
