//! Shape aggregation.
//!
//! Adjacent vector primitives are merged into one [`ShapeUnit`] and emitted as
//! a single `SvgPicture`. The pass runs once over a widget's node tree before
//! serialization:
//!
//! 1. children are processed first
//! 2. runs of absorbable siblings are merged into one unit
//! 3. a plain group left with a single shape child becomes a shape itself

use std::cell::OnceCell;

use dartboard_core::dart::string_literal;
use dartboard_core::document::GroupLayoutType;
use dartboard_core::types::Rect;
use dartboard_core::{DesignNode, Prop};

use crate::context::{Context, Target};
use crate::node::{ExportMode, GroupKind, Node, NodeKind};
use crate::svg;

/// Length of the markup hash used in SVG constant names.
const SVG_ID_LENGTH: usize = 8;

/// One member of a unit.
#[derive(Debug, Clone)]
pub enum ShapeMember<'a> {
    /// A path, line, polygon, boolean group, rectangle or ellipse, in the
    /// unit's coordinate space.
    Primitive(&'a DesignNode),
    /// A collapsed group, drawn under its frame's transform.
    Nested(ShapeUnit<'a>),
}

impl ShapeMember<'_> {
    fn bounds(&self) -> Rect {
        match self {
            ShapeMember::Primitive(node) => node.bounds_in_parent(),
            ShapeMember::Nested(unit) => unit.bounds_in_parent(),
        }
    }
}

/// Primitives rendered together as one SVG document.
///
/// The view box, markup and identifier are computed on first use and cached
/// until the member list changes.
#[derive(Debug, Clone)]
pub struct ShapeUnit<'a> {
    frame: Option<&'a DesignNode>,
    members: Vec<ShapeMember<'a>>,
    view_box: OnceCell<Rect>,
    svg: OnceCell<String>,
    id: OnceCell<String>,
}

impl<'a> ShapeUnit<'a> {
    pub fn from_primitive(node: &'a DesignNode) -> Self {
        Self::with_members(None, vec![ShapeMember::Primitive(node)])
    }

    /// A unit drawn in the local space of `frame`, a collapsed group.
    pub fn framed(frame: &'a DesignNode, inner: ShapeUnit<'a>) -> Self {
        let members = if inner.frame.is_none() {
            inner.members
        } else {
            vec![ShapeMember::Nested(inner)]
        };
        Self::with_members(Some(frame), members)
    }

    fn with_members(frame: Option<&'a DesignNode>, members: Vec<ShapeMember<'a>>) -> Self {
        Self {
            frame,
            members,
            view_box: OnceCell::new(),
            svg: OnceCell::new(),
            id: OnceCell::new(),
        }
    }

    pub fn frame(&self) -> Option<&'a DesignNode> {
        self.frame
    }

    pub fn members(&self) -> &[ShapeMember<'a>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn push_primitive(&mut self, node: &'a DesignNode) {
        self.members.push(ShapeMember::Primitive(node));
        self.invalidate();
    }

    /// Append another unit. Frameless units contribute their members
    /// directly; framed units are nested.
    pub fn absorb(&mut self, other: ShapeUnit<'a>) {
        if other.frame.is_none() {
            self.members.extend(other.members);
        } else {
            self.members.push(ShapeMember::Nested(other));
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.view_box = OnceCell::new();
        self.svg = OnceCell::new();
        self.id = OnceCell::new();
    }

    /// Union of the members' bounds, at least 1 on each axis.
    pub fn view_box(&self) -> Rect {
        *self.view_box.get_or_init(|| {
            let mut bounds = self.members.iter().map(ShapeMember::bounds);
            let first = bounds.next().unwrap_or_default();
            let mut union = bounds.fold(first, |acc, b| acc.union(&b));
            union.width = union.width.max(1.0);
            union.height = union.height.max(1.0);
            union
        })
    }

    /// The view box in the space of the unit's parent.
    pub fn bounds_in_parent(&self) -> Rect {
        match self.frame {
            Some(frame) => self.view_box().transformed(&frame.transform.affine()),
            None => self.view_box(),
        }
    }

    pub fn to_svg(&self, ctx: &mut Context<'_>) -> &str {
        self.svg.get_or_init(|| svg::render(self, ctx))
    }

    /// `_svg_` followed by a hash of the markup.
    pub fn svg_id(&self, ctx: &mut Context<'_>) -> &str {
        self.id.get_or_init(|| {
            let digest = format!("{:x}", md5::compute(self.to_svg(ctx).as_bytes()));
            format!("_svg_{}", &digest[..SVG_ID_LENGTH])
        })
    }
}

/// Emit a shape node as an `SvgPicture`.
pub(crate) fn serialize(node: &mut Node<'_>, ctx: &mut Context<'_>) -> String {
    let NodeKind::Shape(unit) = &node.kind else {
        return String::new();
    };

    // Absorbing siblings changes the footprint.
    if let Some(parent) = node.layout.input().parent {
        let bounds = unit.bounds_in_parent();
        node.layout
            .recalculate_with_bounds(bounds.translate(-parent.content.x, -parent.content.y));
    }

    let data = match ctx.target {
        Target::Clipboard => string_literal(unit.to_svg(ctx)),
        Target::Files => {
            let id = unit.svg_id(ctx).to_string();
            let markup = unit.to_svg(ctx).to_string();
            ctx.add_svg(&id, &markup);
            id
        }
    };
    ctx.add_import("package:flutter_svg/flutter_svg.dart");

    let fit = if node.layout.is_fixed_size {
        ""
    } else {
        node.layout.should_expand = true;
        "fit: BoxFit.fill, "
    };
    format!(
        "SvgPicture.string({}, allowDrawingOutsideViewBox: true, {})",
        data, fit
    )
}

/// Run the aggregation pass over `node` and its descendants.
pub fn combine_shapes(node: &mut Node<'_>, aggressive: bool) {
    let aggressive = aggressive || node.design.prop_bool(Prop::CombineShapes) == Some(true);
    for child in node.children.iter_mut() {
        combine_shapes(child, aggressive);
    }

    // Stack cells keep their own sizes and spacers.
    if !node.design.layout.is_stack() {
        let keep_first = node.has_background();
        let children = std::mem::take(&mut node.children);
        node.children = merge_siblings(children, keep_first, aggressive);
    }

    collapse_group(node);
}

fn merge_siblings<'a>(children: Vec<Node<'a>>, keep_first: bool, aggressive: bool) -> Vec<Node<'a>> {
    let mut out = Vec::with_capacity(children.len());
    let mut run: Vec<Node<'a>> = Vec::new();

    for (i, child) in children.into_iter().enumerate() {
        let absorbable = !(keep_first && i == 0) && child.is_absorbable(aggressive);
        if absorbable && !child.is_special() {
            run.push(child);
            continue;
        }
        // Special members stand alone.
        flush(&mut run, &mut out);
        out.push(child);
    }
    flush(&mut run, &mut out);
    out
}

fn flush<'a>(run: &mut Vec<Node<'a>>, out: &mut Vec<Node<'a>>) {
    if run.len() < 2 {
        out.append(run);
        return;
    }
    let mut nodes = run.drain(..);
    if let Some(first) = nodes.next() {
        let mut merged = first.into_shape();
        for node in nodes {
            merged.absorb(node);
        }
        log::trace!("merged shapes into '{}'", merged.design.name);
        out.push(merged);
    }
}

/// Replace a plain group holding a single shape with a framed shape.
fn collapse_group(node: &mut Node<'_>) {
    if !matches!(node.kind, NodeKind::Group(GroupKind::Plain))
        || node.mode != ExportMode::Inline
        || node.children.len() != 1
    {
        return;
    }
    let design = node.design;
    if design.marked_for_export
        || design.mask
        || design.rotation != 0.0
        || design.flip_y
        || design.layout.layout_type != GroupLayoutType::None
        || node.has_background()
    {
        return;
    }
    let child = &node.children[0];
    if !matches!(child.kind, NodeKind::Shape(_))
        || !child.decorators.is_empty()
        || child.mode != ExportMode::Inline
    {
        return;
    }
    if let Some(child) = node.children.pop() {
        if let NodeKind::Shape(unit) = child.kind {
            node.kind = NodeKind::Shape(ShapeUnit::framed(design, unit));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartboard_core::document::Fill;
    use dartboard_core::{Color, DesignKind, Document, DocumentIndex, Settings};
    use proptest::prelude::*;

    fn path(guid: &str, x: f64, y: f64, w: f64, h: f64) -> DesignNode {
        DesignNode::new(
            guid,
            guid,
            DesignKind::Path {
                path_data: format!("M0 0L{} {}", w, h),
            },
        )
        .with_bounds(w, h)
        .at(x, y)
    }

    #[test]
    fn test_view_box_minimum() {
        let line = path("l", 10.0, 10.0, 50.0, 0.0);
        let unit = ShapeUnit::from_primitive(&line);
        assert_eq!(unit.view_box(), Rect::new(10.0, 10.0, 50.0, 1.0));
    }

    #[test]
    fn test_absorb_invalidates_view_box() {
        let a = path("a", 0.0, 0.0, 10.0, 10.0);
        let b = path("b", 20.0, 5.0, 10.0, 10.0);
        let mut unit = ShapeUnit::from_primitive(&a);
        assert_eq!(unit.view_box(), Rect::new(0.0, 0.0, 10.0, 10.0));
        unit.absorb(ShapeUnit::from_primitive(&b));
        assert_eq!(unit.len(), 2);
        assert_eq!(unit.view_box(), Rect::new(0.0, 0.0, 30.0, 15.0));
    }

    #[test]
    fn test_framed_unit_bounds() {
        let inner = path("p", 5.0, 5.0, 10.0, 10.0);
        let group = DesignNode::new("g", "Icon", DesignKind::Group).at(100.0, 50.0);
        let unit = ShapeUnit::framed(&group, ShapeUnit::from_primitive(&inner));
        assert_eq!(unit.view_box(), Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(unit.bounds_in_parent(), Rect::new(105.0, 55.0, 10.0, 10.0));

        let mut outer = ShapeUnit::from_primitive(&inner);
        outer.absorb(unit);
        assert!(matches!(outer.members()[1], ShapeMember::Nested(_)));
    }

    #[test]
    fn test_svg_is_memoized() {
        let mut a = path("a", 0.0, 0.0, 10.0, 10.0);
        a.shadow = Some(dartboard_core::document::Shadow {
            x: 0.0,
            y: 2.0,
            blur: 4.0,
            color: Color::BLACK,
            visible: true,
        });
        let doc = Document {
            children: vec![DesignNode::new("h", "Home", DesignKind::Artboard).with_children(vec![a])],
            ..Default::default()
        };
        let index = DocumentIndex::new(&doc);
        let mut ctx = Context::new(&index, Settings::default(), Target::Files);
        let unit = ShapeUnit::from_primitive(index.node("a").unwrap());

        let first = unit.to_svg(&mut ctx).to_string();
        let second = unit.to_svg(&mut ctx).to_string();
        assert_eq!(first, second);
        // the shadow warning is raised once
        assert_eq!(ctx.log.warnings().count(), 1);

        let id = unit.svg_id(&mut ctx).to_string();
        assert!(id.starts_with("_svg_"));
        assert_eq!(id.len(), 5 + SVG_ID_LENGTH);
        assert_eq!(unit.svg_id(&mut ctx), id);
    }

    #[test]
    fn test_aggressive_merge_of_rectangles() {
        let red = Fill::Color(Color::rgb(255, 0, 0));
        let rect = |guid: &str, x: f64| {
            DesignNode::new(guid, guid, DesignKind::Rectangle { corner_radii: Default::default() })
                .with_bounds(20.0, 20.0)
                .at(x, 0.0)
                .with_fill(red.clone())
        };
        for (offset, expect_group) in [(0.0, false), (30.0, true)] {
            let group = DesignNode::new("g", "Pair", DesignKind::Group)
                .with_bounds(60.0, 20.0)
                .with_children(vec![rect("a", 0.0), rect("b", offset)]);
            let board = DesignNode::new("h", "Home", DesignKind::Artboard)
                .with_bounds(100.0, 100.0)
                .with_children(vec![group]);
            let doc = Document {
                children: vec![board],
                ..Default::default()
            };
            let index = DocumentIndex::new(&doc);
            let settings = Settings {
                combine_shapes: true,
                ..Default::default()
            };
            let mut ctx = Context::new(&index, settings, Target::Files);
            let root = Node::widget_root(index.node("h").unwrap(), &mut ctx);

            // the group collapsed into a single framed unit
            let NodeKind::Shape(unit) = &root.children[0].kind else {
                panic!("expected a shape");
            };
            assert_eq!(unit.len(), 2);
            let markup = unit.to_svg(&mut ctx).to_string();
            assert_eq!(markup.matches("<path").count(), 2);
            assert_eq!(markup.contains("<g>"), expect_group);
        }
    }

    #[test]
    fn test_rectangles_stay_containers_without_aggressive_mode() {
        let rect = |guid: &str| {
            DesignNode::new(guid, guid, DesignKind::Rectangle { corner_radii: Default::default() })
                .with_bounds(20.0, 20.0)
                .with_fill(Fill::Color(Color::WHITE))
        };
        let board = DesignNode::new("h", "Home", DesignKind::Artboard)
            .with_bounds(100.0, 100.0)
            .with_children(vec![rect("a"), rect("b"), path("p", 0.0, 0.0, 5.0, 5.0)]);
        let doc = Document {
            children: vec![board],
            ..Default::default()
        };
        let index = DocumentIndex::new(&doc);
        let mut ctx = Context::new(&index, Settings::default(), Target::Files);
        let root = Node::widget_root(index.node("h").unwrap(), &mut ctx);
        assert_eq!(root.children.len(), 3);
        assert!(matches!(root.children[0].kind, NodeKind::Container));
        assert!(matches!(root.children[2].kind, NodeKind::Shape(_)));
    }

    proptest! {
        #[test]
        fn test_view_box_ignores_absorption_order(
            rects in proptest::collection::vec((0.0f64..200.0, 0.0f64..200.0, 1.0f64..50.0, 1.0f64..50.0), 2..6),
            seed in 0usize..100,
        ) {
            let nodes: Vec<DesignNode> = rects
                .iter()
                .enumerate()
                .map(|(i, (x, y, w, h))| path(&format!("p{}", i), *x, *y, *w, *h))
                .collect();

            let build = |order: &[usize]| {
                let mut unit = ShapeUnit::from_primitive(&nodes[order[0]]);
                for i in &order[1..] {
                    unit.push_primitive(&nodes[*i]);
                }
                unit
            };

            let forward: Vec<usize> = (0..nodes.len()).collect();
            let mut rotated = forward.clone();
            rotated.rotate_left(seed % nodes.len());

            let a = build(&forward).view_box();
            let b = build(&rotated).view_box();
            prop_assert!((a.x - b.x).abs() < 1e-9);
            prop_assert!((a.y - b.y).abs() < 1e-9);
            prop_assert!((a.width - b.width).abs() < 1e-9);
            prop_assert!((a.height - b.height).abs() < 1e-9);

            // members keep insertion order
            let unit = build(&rotated);
            for (member, i) in unit.members().iter().zip(&rotated) {
                match member {
                    ShapeMember::Primitive(node) => prop_assert_eq!(&node.guid, &nodes[*i].guid),
                    ShapeMember::Nested(_) => prop_assert!(false),
                }
            }
        }
    }
}
