//! Compiled node tree.
//!
//! A [`Node`] wraps one design node for the duration of a compile. Building
//! the tree classifies layout, collects decorators and registers exposed
//! parameters; serializing it produces the Dart expression, wrapped in the
//! layout widgets, the decorators and an optional layer-name comment.

mod container;
mod custom;
mod group;
mod text;
mod widget_root;

use indexmap::IndexMap;

use dartboard_core::dart::{color_literal, string_literal};
use dartboard_core::document::{DesignKind, Fill};
use dartboard_core::{DesignNode, Log, Prop};
use dartboard_layout::{Layout, LayoutInput};

use crate::context::{Context, DartType, Parameter};
use crate::decorators::{self, Decorators};
use crate::naming;
use crate::shape::{self, ShapeUnit};

pub use group::GroupKind;

/// How a node appears in the generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportMode {
    /// The expression is emitted where the node sits.
    #[default]
    Inline,
    /// The expression moves into a generated build method.
    Method,
    /// The node is replaced by a call to a required `WidgetBuilder` parameter.
    Builder,
    /// The node is replaced by a user template.
    Custom,
}

impl ExportMode {
    fn of(design: &DesignNode, log: &mut Log) -> Self {
        match design.prop_str(Prop::ExportMode) {
            None | Some("inline") => ExportMode::Inline,
            Some("method") => ExportMode::Method,
            Some("builder") => ExportMode::Builder,
            Some("custom") => ExportMode::Custom,
            Some(other) => {
                log.warn(format!("Unknown export mode '{}'", other), Some(design));
                ExportMode::Inline
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind<'a> {
    /// Artboard or master component compiled as a widget class.
    WidgetRoot,
    /// Rectangle or ellipse drawn as a `Container`.
    Container,
    Group(GroupKind),
    /// One or more vector primitives drawn as SVG.
    Shape(ShapeUnit<'a>),
    Text,
}

#[derive(Debug, Clone)]
pub struct Node<'a> {
    pub design: &'a DesignNode,
    pub kind: NodeKind<'a>,
    pub children: Vec<Node<'a>>,
    pub layout: Layout,
    pub decorators: Decorators,
    pub mode: ExportMode,
    /// Exposed parameter names keyed by role (`text`, `fill`, `builder`).
    params: IndexMap<&'static str, String>,
}

impl<'a> Node<'a> {
    /// Build the node tree of a widget root.
    pub fn widget_root(design: &'a DesignNode, ctx: &mut Context<'_>) -> Node<'a> {
        let mut node = Node {
            design,
            kind: NodeKind::WidgetRoot,
            children: Vec::new(),
            layout: Layout::from_input(LayoutInput::default()),
            decorators: Decorators::new(),
            mode: ExportMode::Inline,
            params: IndexMap::new(),
        };
        node.children = Node::build_children(design, ctx);
        shape::combine_shapes(&mut node, ctx.settings.combine_shapes);
        node
    }

    /// Build a node and its descendants. Hidden and unrecognized nodes are
    /// skipped.
    pub fn build(design: &'a DesignNode, ctx: &mut Context<'_>) -> Option<Node<'a>> {
        if !design.visible {
            return None;
        }
        let index = ctx.index;

        let kind = match &design.kind {
            DesignKind::Artboard => {
                ctx.log
                    .error("Artboards cannot be nested inside other layers", Some(design));
                return None;
            }
            DesignKind::Group => NodeKind::Group(GroupKind::Plain),
            DesignKind::ScrollableGroup { scroll } => NodeKind::Group(GroupKind::Scroll(*scroll)),
            DesignKind::Rectangle { .. } | DesignKind::Ellipse => NodeKind::Container,
            DesignKind::Text(_) => NodeKind::Text,
            DesignKind::Component { is_master, symbol_id } => {
                let master = if *is_master {
                    Some(design)
                } else {
                    index.master_component(symbol_id)
                };
                match master.and_then(|m| ctx.widget_name(&m.guid)) {
                    Some(widget) => NodeKind::Group(GroupKind::Instance {
                        widget: widget.to_string(),
                    }),
                    None => {
                        ctx.log.warn(
                            "Master component not found; exporting the instance as a group",
                            Some(design),
                        );
                        NodeKind::Group(GroupKind::Plain)
                    }
                }
            }
            kind if kind.is_path_like() => NodeKind::Shape(ShapeUnit::from_primitive(design)),
            _ => {
                ctx.log.warn(
                    format!("Unsupported layer type '{}'", design.kind.label()),
                    Some(design),
                );
                return None;
            }
        };

        let mode = ExportMode::of(design, &mut ctx.log);
        let layout = Layout::from_input(LayoutInput::for_node(design, index.parent(design)));
        let tap_enabled = matches!(mode, ExportMode::Inline | ExportMode::Method);

        let mut node = Node {
            design,
            kind,
            children: Vec::new(),
            layout,
            decorators: decorators::collect(design, tap_enabled, ctx),
            mode,
            params: IndexMap::new(),
        };

        if matches!(node.kind, NodeKind::Group(GroupKind::Plain | GroupKind::Scroll(_))) {
            node.children = Node::build_children(design, ctx);
        }
        node.register_params(ctx);
        Some(node)
    }

    fn build_children(design: &'a DesignNode, ctx: &mut Context<'_>) -> Vec<Node<'a>> {
        design
            .children
            .iter()
            .filter_map(|child| Node::build(child, ctx))
            .collect()
    }

    fn register_params(&mut self, ctx: &mut Context<'_>) {
        if self.mode == ExportMode::Builder {
            let name = self.builder_name(ctx.settings.normalize_name_case);
            ctx.add_param(Parameter::new(name.clone(), DartType::WidgetBuilder).required());
            self.params.insert("builder", name);
            return;
        }

        let design = self.design;
        let is_container = matches!(self.kind, NodeKind::Container);
        match &design.kind {
            DesignKind::Text(data) => {
                self.expose(ctx, "text", Prop::TextParamName, DartType::String, string_literal(&data.text));
                if let Some(color) = design.active_fill().and_then(Fill::first_color) {
                    self.expose(ctx, "fill", Prop::ColorParamName, DartType::Color, color_literal(&color, 1.0));
                }
            }
            _ if is_container => match design.active_fill() {
                Some(Fill::Color(color)) => {
                    self.expose(ctx, "fill", Prop::ColorParamName, DartType::Color, color_literal(color, 1.0));
                }
                Some(Fill::ImageFill { .. }) if design.prop_str(Prop::ImageParamName).is_some() => {
                    let image = container::asset_image(design, ctx);
                    self.expose(ctx, "fill", Prop::ImageParamName, DartType::ImageProvider, image);
                }
                _ => {}
            },
            _ => {}
        }
    }

    /// Register a constructor parameter when `prop` names one.
    fn expose(
        &mut self,
        ctx: &mut Context<'_>,
        role: &'static str,
        prop: Prop,
        dart_type: DartType,
        default: String,
    ) {
        let Some(raw) = self.design.prop_str(prop) else {
            return;
        };
        let name = naming::identifier(raw, false);
        ctx.add_param(Parameter::new(name.clone(), dart_type).with_default(default));
        self.params.insert(role, name);
    }

    /// Exposed parameter name for a role.
    pub fn param(&self, role: &str) -> Option<&str> {
        self.params.get(role).map(String::as_str)
    }

    /// Decorated, responsive or non-inline nodes never merge with siblings.
    pub fn is_special(&self) -> bool {
        !self.decorators.is_empty() || self.layout.is_responsive || self.mode != ExportMode::Inline
    }

    /// Whether the shape pass may merge this node into a unit.
    pub(crate) fn is_absorbable(&self, aggressive: bool) -> bool {
        match self.kind {
            NodeKind::Shape(_) => true,
            NodeKind::Container => {
                aggressive
                    && !self.design.has_image_fill()
                    && self.design.visible_shadow().is_none()
                    && self.decorators.is_empty()
            }
            _ => false,
        }
    }

    /// Turn an absorbable node into a shape node.
    pub(crate) fn into_shape(mut self) -> Node<'a> {
        if matches!(self.kind, NodeKind::Container) {
            self.kind = NodeKind::Shape(ShapeUnit::from_primitive(self.design));
        }
        self
    }

    /// Merge another absorbable node into this shape node.
    pub(crate) fn absorb(&mut self, other: Node<'a>) {
        let NodeKind::Shape(unit) = &mut self.kind else {
            return;
        };
        match other.kind {
            NodeKind::Shape(inner) => unit.absorb(inner),
            NodeKind::Container => unit.push_primitive(other.design),
            _ => {}
        }
    }

    /// The first child acts as a background: a padding background for
    /// groups, a child named `bg` for groups and widget roots.
    pub fn has_background(&self) -> bool {
        let Some(first) = self.children.first() else {
            return false;
        };
        match self.kind {
            NodeKind::Group(GroupKind::Plain | GroupKind::Scroll(_)) => {
                self.design.layout.background() == Some(first.design.guid.as_str())
                    || is_bg_name(first.design)
            }
            NodeKind::WidgetRoot => is_bg_name(first.design),
            _ => false,
        }
    }

    fn method_name(&self, normalize: bool) -> String {
        match self.design.prop_str(Prop::BuildMethodName) {
            Some(raw) => naming::identifier(raw, false),
            None => format!("_build{}", naming::class_name(&self.design.name, normalize)),
        }
    }

    fn builder_name(&self, normalize: bool) -> String {
        match self.design.prop_str(Prop::BuildMethodName) {
            Some(raw) => naming::identifier(raw, false),
            None => format!("{}Builder", naming::identifier(&self.design.name, normalize)),
        }
    }

    /// Serialize the node as it appears in its parent.
    pub fn serialize(&mut self, ctx: &mut Context<'_>) -> String {
        match self.mode {
            ExportMode::Custom => return custom::expand(self, ctx),
            ExportMode::Builder => {
                let name = self
                    .param("builder")
                    .map(str::to_string)
                    .unwrap_or_else(|| self.builder_name(ctx.settings.normalize_name_case));
                return format!("{}(context)", name);
            }
            ExportMode::Inline | ExportMode::Method => {}
        }

        let body = self.serialize_body(ctx);
        if body.is_empty() {
            return body;
        }
        let code = self.decorate(body, ctx);

        if self.mode == ExportMode::Method {
            let name = self.method_name(ctx.settings.normalize_name_case);
            ctx.add_build_method(&name, code);
            return format!("{}(context)", name);
        }
        code
    }

    /// The node's own expression, without layout or decorators.
    pub(crate) fn serialize_body(&mut self, ctx: &mut Context<'_>) -> String {
        match self.kind {
            NodeKind::WidgetRoot => widget_root::serialize(self, ctx),
            NodeKind::Container => container::serialize(self, ctx),
            NodeKind::Group(_) => group::serialize(self, ctx),
            NodeKind::Shape(_) => shape::serialize(self, ctx),
            NodeKind::Text => text::serialize(self, ctx),
        }
    }

    /// Apply layout, decorators and the layer-name comment.
    pub(crate) fn decorate(&mut self, body: String, ctx: &mut Context<'_>) -> String {
        let mut code = self
            .layout
            .serialize(body, self.design, &ctx.settings, &mut ctx.log);
        for decorator in &self.decorators {
            code = decorator.apply(code, ctx);
        }
        if ctx.settings.include_name_comments && !self.design.has_default_name {
            code = decorators::comment(code, self.design);
        }
        code
    }
}

fn is_bg_name(design: &DesignNode) -> bool {
    design.name.trim() == "bg"
}

/// `Stack(children: <Widget>[...], )` over the serialized nodes.
pub(crate) fn child_stack(children: &mut [Node<'_>], ctx: &mut Context<'_>) -> String {
    format!("Stack(children: <Widget>[{}], )", child_list(children, ctx))
}

/// Each non-empty child followed by `, `.
pub(crate) fn child_list(children: &mut [Node<'_>], ctx: &mut Context<'_>) -> String {
    let mut out = String::new();
    for child in children.iter_mut() {
        let code = child.serialize(ctx);
        if !code.is_empty() {
            out.push_str(&code);
            out.push_str(", ");
        }
    }
    out
}
