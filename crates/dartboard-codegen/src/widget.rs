//! Widget file assembly.
//!
//! Each artboard and master component becomes one `StatelessWidget` class:
//! imports, `final` fields for the exposed parameters, a constructor, the
//! `build` method, generated build methods and the SVG constants collected
//! while compiling the body.

use dartboard_core::dart::string_literal;
use dartboard_core::DesignNode;

use crate::context::{Context, Parameter, WidgetScope};
use crate::error::{CodegenError, Result};
use crate::naming;
use crate::node::Node;

const MATERIAL_IMPORT: &str = "import 'package:flutter/material.dart';";

/// One generated Dart source file.
#[derive(Debug, Clone, PartialEq)]
pub struct DartFile {
    pub class_name: String,
    pub file_name: String,
    pub source: String,
}

/// Compile a widget root into a Dart file.
pub fn compile_widget(design: &DesignNode, ctx: &mut Context<'_>) -> Result<DartFile> {
    let class_name = ctx
        .widget_name(&design.guid)
        .map(str::to_string)
        .unwrap_or_else(|| naming::widget_class_name(design, &ctx.settings));

    ctx.begin_widget(&class_name);
    let mut root = Node::widget_root(design, ctx);
    let body = root.serialize(ctx);
    let scope = ctx.finish_widget();
    if body.is_empty() {
        return Err(CodegenError::EmptyOutput(class_name));
    }

    log::info!("compiled widget {}", class_name);
    let source = assemble(&class_name, &body, &scope, ctx.settings.null_safe);
    Ok(DartFile {
        file_name: naming::file_name(&class_name),
        class_name,
        source,
    })
}

fn assemble(class_name: &str, body: &str, scope: &WidgetScope, null_safe: bool) -> String {
    let mut lines = Vec::new();

    lines.push(MATERIAL_IMPORT.to_string());
    lines.extend(scope.imports.iter().filter(|i| *i != MATERIAL_IMPORT).cloned());
    lines.push(String::new());

    lines.push(format!("class {} extends StatelessWidget {{", class_name));
    for param in scope.params.values() {
        lines.push(format!("  final {} {};", field_type(param, null_safe), param.name));
    }
    lines.push(format!("  {}", constructor(class_name, scope, null_safe)));
    lines.push(String::new());
    lines.push("  @override".to_string());
    lines.push(method("build", body));
    for (name, code) in &scope.build_methods {
        lines.push(String::new());
        lines.push(method(name, code));
    }
    lines.push("}".to_string());

    for (id, svg) in &scope.svg_data {
        lines.push(String::new());
        lines.push(format!("const String {} = {};", id, string_literal(svg)));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn field_type(param: &Parameter, null_safe: bool) -> String {
    let nullable = null_safe && param.default.is_none() && !param.required;
    format!("{}{}", param.dart_type.as_str(), if nullable { "?" } else { "" })
}

fn constructor(class_name: &str, scope: &WidgetScope, null_safe: bool) -> String {
    let mut args = vec![if null_safe { "Key? key" } else { "Key key" }.to_string()];
    for param in scope.params.values() {
        args.push(match (&param.default, param.required) {
            (_, true) if null_safe => format!("required this.{}", param.name),
            (_, true) => format!("@required this.{}", param.name),
            (Some(default), false) => format!("this.{} = {}", param.name, default),
            (None, false) => format!("this.{}", param.name),
        });
    }
    format!(
        "{}({{{},}}) : super(key: key);",
        class_name,
        args.join(", ")
    )
}

fn method(name: &str, code: &str) -> String {
    format!(
        "  Widget {}(BuildContext context) {{\n    return {};\n  }}",
        name, code
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DartType, Target};
    use dartboard_core::document::Fill;
    use dartboard_core::{Color, DesignKind, Document, DocumentIndex, Prop, Settings};
    use serde_json::json;

    fn compile(doc: &Document, settings: Settings) -> Result<DartFile> {
        let index = DocumentIndex::new(doc);
        let mut ctx = Context::new(&index, settings, Target::Files);
        compile_widget(&doc.children[0], &mut ctx)
    }

    fn quiet() -> Settings {
        Settings {
            include_name_comments: false,
            ..Default::default()
        }
    }

    fn board(children: Vec<DesignNode>) -> Document {
        Document {
            children: vec![DesignNode::new("a", "home page", DesignKind::Artboard)
                .with_bounds(375.0, 812.0)
                .with_children(children)],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_widget_file() {
        let dot = DesignNode::new("d", "Dot", DesignKind::Ellipse)
            .with_bounds(10.0, 10.0)
            .with_fill(Fill::Color(Color::BLACK));
        let file = compile(&board(vec![dot]), quiet()).unwrap();
        assert_eq!(file.class_name, "HomePage");
        assert_eq!(file.file_name, "home_page.dart");
        assert!(file.source.starts_with(
            "import 'package:flutter/material.dart';\n\nclass HomePage extends StatelessWidget {\n  HomePage({Key? key,}) : super(key: key);\n\n  @override\n  Widget build(BuildContext context) {\n    return Scaffold(body: Stack("
        ));
        assert!(file.source.ends_with("  }\n}\n"));
    }

    #[test]
    fn test_parameters_null_safe_and_legacy() {
        let mut dot = DesignNode::new("d", "Dot", DesignKind::Ellipse)
            .with_bounds(10.0, 10.0)
            .with_fill(Fill::Color(Color::BLACK));
        dot.set_prop(Prop::ColorParamName, json!("tint"));
        let mut slot = DesignNode::new("s", "Slot", DesignKind::Group)
            .with_bounds(10.0, 10.0)
            .with_children(vec![dot.clone()]);
        slot.set_prop(Prop::ExportMode, json!("builder"));
        let doc = board(vec![dot, slot]);

        let file = compile(&doc, quiet()).unwrap();
        assert!(file.source.contains("  final Color tint;\n  final WidgetBuilder slotBuilder;\n"));
        assert!(file.source.contains(
            "  HomePage({Key? key, this.tint = const Color(0xff000000), required this.slotBuilder,}) : super(key: key);"
        ));
        assert!(file.source.contains("slotBuilder(context)"));

        let legacy = Settings {
            null_safe: false,
            ..quiet()
        };
        let file = compile(&doc, legacy).unwrap();
        assert!(file.source.contains("HomePage({Key key, this.tint = const Color(0xff000000), @required this.slotBuilder,})"));
    }

    #[test]
    fn test_nullable_field_without_default() {
        let scope = WidgetScope {
            params: [(
                "onTap".to_string(),
                Parameter::new("onTap", DartType::VoidCallback),
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        let out = assemble("Home", "Container()", &scope, true);
        assert!(out.contains("  final VoidCallback? onTap;\n"));
        assert!(out.contains("Home({Key? key, this.onTap,})"));
    }

    #[test]
    fn test_build_methods_and_svg_constants() {
        let mut scope = WidgetScope::default();
        scope.imports.insert("import 'package:flutter_svg/flutter_svg.dart';".to_string());
        scope
            .build_methods
            .insert("_buildCard".to_string(), "Container()".to_string());
        scope
            .svg_data
            .insert("_svg_1a2b3c4d".to_string(), "<svg viewBox=\"0 0 1 1\" ></svg>".to_string());
        let out = assemble("Home", "_buildCard(context)", &scope, true);
        assert!(out.starts_with(
            "import 'package:flutter/material.dart';\nimport 'package:flutter_svg/flutter_svg.dart';\n\n"
        ));
        assert!(out.contains(
            "    return _buildCard(context);\n  }\n\n  Widget _buildCard(BuildContext context) {\n    return Container();\n  }\n}\n"
        ));
        assert!(out.ends_with("const String _svg_1a2b3c4d = '<svg viewBox=\"0 0 1 1\" ></svg>';\n"));
    }

    #[test]
    fn test_childless_master_component_compiles() {
        let doc = Document {
            children: vec![DesignNode::new(
                "m",
                "Chip",
                DesignKind::Component {
                    is_master: true,
                    symbol_id: "chip".into(),
                },
            )],
            ..Default::default()
        };
        let index = DocumentIndex::new(&doc);
        let mut ctx = Context::new(&index, quiet(), Target::Files);
        let file = compile_widget(&doc.children[0], &mut ctx).unwrap();
        assert!(file.source.contains("    return Stack(children: <Widget>[], );\n"));
    }
}
