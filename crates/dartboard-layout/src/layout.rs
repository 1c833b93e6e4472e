//! The layout descriptor attached to every compiled node.

use std::f64::consts::PI;
use std::str::FromStr;

use dartboard_core::dart::{dim, fix};
use dartboard_core::document::{DesignNode, StackOrientation};
use dartboard_core::types::Rect;
use dartboard_core::{Log, Settings};

use crate::alignment::Alignment;
use crate::error::LayoutError;
use crate::frame::LayoutInput;
use crate::insets::{almost_equal, EdgeInsets, TOLERANCE};
use crate::pin::{Pin, PIN_ELISION_THRESHOLD};

/// How a node is placed inside its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutType {
    /// Fills the parent, optionally inset by padding.
    #[default]
    None,
    /// Offset from the parent origin with a fixed size.
    Translate,
    Center,
    Align,
    /// Fixed margins from the pinned edges.
    Pinned,
}

impl LayoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::None => "none",
            LayoutType::Translate => "translate",
            LayoutType::Center => "center",
            LayoutType::Align => "align",
            LayoutType::Pinned => "pinned",
        }
    }
}

impl FromStr for LayoutType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(LayoutType::None),
            "translate" => Ok(LayoutType::Translate),
            "center" => Ok(LayoutType::Center),
            "align" => Ok(LayoutType::Align),
            "pinned" => Ok(LayoutType::Pinned),
            other => Err(LayoutError::UnknownLayoutType(other.to_string())),
        }
    }
}

/// Main axis of the parent stack, or `Both` outside stacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutDirection {
    Vertical,
    Horizontal,
    #[default]
    Both,
}

/// Layout classification and the parameters needed to reproduce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Disabled layouts serialize their child unchanged.
    pub enabled: bool,
    pub layout_type: LayoutType,
    pub direction: LayoutDirection,
    pub padding: Option<EdgeInsets>,
    pub is_fixed_size: bool,
    pub is_responsive: bool,
    pub alignment: Option<Alignment>,
    /// Node bounds relative to the parent content origin.
    pub bounds: Option<Rect>,
    pub parent_bounds: Option<Rect>,
    /// The node's size still has to be emitted. Nodes that emit their own
    /// width and height clear this before the layout serializes.
    pub should_fix_size: bool,
    /// Wrap in `SizedBox.expand` when the node does not fill on its own.
    pub should_expand: bool,
    input: LayoutInput,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            enabled: true,
            layout_type: LayoutType::None,
            direction: LayoutDirection::Both,
            padding: None,
            is_fixed_size: false,
            is_responsive: false,
            alignment: None,
            bounds: None,
            parent_bounds: None,
            should_fix_size: false,
            should_expand: false,
            input: LayoutInput::default(),
        }
    }
}

impl Layout {
    /// Classify a node from its input.
    pub fn from_input(input: LayoutInput) -> Self {
        let mut layout = Self::default();
        layout.calculate(input);
        layout
    }

    pub fn input(&self) -> &LayoutInput {
        &self.input
    }

    /// Reclassify. `enabled` survives; everything else is recomputed.
    pub fn calculate(&mut self, input: LayoutInput) {
        *self = Self {
            enabled: self.enabled,
            input,
            ..Self::default()
        };

        let Some(parent) = input.parent else {
            self.enabled = false;
            return;
        };
        let p = parent.content;
        self.parent_bounds = Some(p);
        self.bounds = input.bounds;
        self.direction = match parent.stack {
            Some(StackOrientation::Vertical) => LayoutDirection::Vertical,
            Some(StackOrientation::Horizontal) => LayoutDirection::Horizontal,
            None => LayoutDirection::Both,
        };

        let o = input.constraints;

        if let Some(orientation) = parent.stack {
            let stretches = match (input.bounds, o) {
                (Some(b), Some(o)) => match orientation {
                    StackOrientation::Vertical => {
                        !o.width
                            && almost_equal(b.x, 0.0, TOLERANCE)
                            && almost_equal(b.width, p.width, TOLERANCE)
                    }
                    StackOrientation::Horizontal => {
                        !o.height
                            && almost_equal(b.y, 0.0, TOLERANCE)
                            && almost_equal(b.height, p.height, TOLERANCE)
                    }
                },
                _ => false,
            };
            if stretches {
                self.layout_type = LayoutType::None;
                self.is_responsive = true;
            } else {
                self.layout_type = LayoutType::Pinned;
                self.is_fixed_size = true;
            }
        } else {
            match (input.bounds, o) {
                (Some(b), Some(o)) if o.left && o.right && o.top && o.bottom => {
                    self.layout_type = LayoutType::None;
                    self.is_responsive = true;
                    let insets = EdgeInsets::from_ltrb(
                        b.x,
                        b.y,
                        p.width - b.right(),
                        p.height - b.bottom(),
                    );
                    let full_size = almost_equal(insets.left, 0.0, TOLERANCE)
                        && almost_equal(insets.top, 0.0, TOLERANCE)
                        && almost_equal(insets.right, 0.0, TOLERANCE)
                        && almost_equal(insets.bottom, 0.0, TOLERANCE);
                    if !full_size {
                        self.padding = Some(insets);
                    }
                }
                (Some(b), Some(o)) => {
                    self.is_responsive = true;
                    let alignment = if o.width && o.height {
                        Alignment::deduce(&b, &p, &o)
                    } else {
                        None
                    };
                    match alignment {
                        Some(a) => {
                            self.layout_type = if a.is_center() {
                                LayoutType::Center
                            } else {
                                LayoutType::Align
                            };
                            self.alignment = Some(a);
                            self.is_fixed_size = true;
                        }
                        None => self.layout_type = LayoutType::Pinned,
                    }
                }
                _ => {
                    self.layout_type = LayoutType::Translate;
                    self.is_fixed_size = true;
                }
            }
        }

        self.should_fix_size = self.is_fixed_size;
    }

    /// Recalculate with the same parent and constraints but new bounds.
    pub fn recalculate_with_bounds(&mut self, bounds: Rect) {
        let input = self.input.with_bounds(bounds);
        self.calculate(input);
    }

    /// Drop the classification, keeping only the bounds. A fixed-size reset
    /// still emits the node's width and height.
    pub fn reset(&mut self, fixed_size: bool) {
        *self = Self {
            bounds: self.bounds,
            is_fixed_size: fixed_size,
            should_fix_size: fixed_size,
            ..Self::default()
        };
    }

    /// Wrap `node_str` in the widgets reproducing this layout.
    ///
    /// Consumes the pending size flags.
    pub fn serialize(
        &mut self,
        node_str: String,
        node: &DesignNode,
        settings: &Settings,
        log: &mut Log,
    ) -> String {
        if !self.enabled {
            return node_str;
        }
        let unit = settings.width_unit.as_str();

        let mut s = self.transform(node_str, node, log);

        if self.should_fix_size {
            // pinned margins keep the child's own size
            if self.layout_type != LayoutType::Pinned {
                s = self.sized_box(s, unit);
            }
        } else if self.should_expand && !self.is_fixed_size && self.layout_type == LayoutType::None
        {
            s = format!("SizedBox.expand(child: {}, )", s);
        }
        self.should_fix_size = false;
        self.should_expand = false;

        if let Some(padding) = &self.padding {
            s = format!("Padding(padding: {}, child: {}, )", padding.to_dart(unit), s);
        }

        match self.layout_type {
            LayoutType::None => s,
            LayoutType::Translate => self.translate(s, unit),
            LayoutType::Center => format!("Center(child: {}, )", s),
            LayoutType::Align => match &self.alignment {
                Some(a) => format!("Align(alignment: {}, child: {}, )", a.to_dart(), s),
                None => {
                    log.error("Align layout without an alignment", Some(node));
                    s
                }
            },
            LayoutType::Pinned => self.pinned(s, unit),
        }
    }

    fn transform(&self, s: String, node: &DesignNode, log: &mut Log) -> String {
        let rotation = self.input.rotation;
        let flip_y = self.input.flip_y;
        if rotation == 0.0 && !flip_y {
            return s;
        }
        if self.is_responsive {
            log.warn(
                "Rotation and flip are not supported on responsive layers",
                Some(node),
            );
            return s;
        }
        let angle = fix(rotation / 180.0 * PI, 4);
        if flip_y {
            format!(
                "Transform(alignment: Alignment.center, transform: Matrix4.identity()..rotateZ({})..scale(1.0, -1.0), child: {}, )",
                angle, s
            )
        } else {
            format!("Transform.rotate(angle: {}, child: {}, )", angle, s)
        }
    }

    fn sized_box(&self, s: String, unit: &str) -> String {
        match self.bounds {
            Some(b) => format!(
                "SizedBox(width: {}, height: {}, child: {}, )",
                dim(b.width, unit),
                dim(b.height, unit),
                s
            ),
            None => s,
        }
    }

    fn translate(&self, s: String, unit: &str) -> String {
        let Some(b) = self.bounds else {
            return s;
        };
        if b.x.abs() < 0.1 && b.y.abs() < 0.1 {
            return s;
        }
        format!(
            "Transform.translate(offset: Offset({}, {}), child: {}, )",
            dim(b.x, unit),
            dim(b.y, unit),
            s
        )
    }

    fn pinned(&self, s: String, unit: &str) -> String {
        let (Some(b), Some(p)) = (self.bounds, self.parent_bounds) else {
            return s;
        };
        // Artboard children are placed by the artboard's Stack.
        if self.input.parent.map_or(false, |f| f.is_artboard) {
            return s;
        }

        let o = self.input.constraints.unwrap_or_default();
        let h = match self.direction {
            LayoutDirection::Horizontal => Pin::default(),
            _ => Pin::along(o.left, o.width, o.right, b.x, b.width, p.width),
        };
        let v = match self.direction {
            LayoutDirection::Vertical => Pin::default(),
            _ => Pin::along(o.top, o.height, o.bottom, b.y, b.height, p.height),
        };

        let starts_with = |s: &str, pat: &str| s.find(pat).map_or(false, |i| i < 4);
        let centre_cross_axis = match self.direction {
            LayoutDirection::Horizontal => starts_with(&s, "Column(") && v.middle.is_some(),
            LayoutDirection::Vertical => starts_with(&s, "Row(") && h.middle.is_some(),
            LayoutDirection::Both => false,
        };
        let s = if centre_cross_axis {
            s.replacen("CrossAxisAlignment.start", "CrossAxisAlignment.center", 1)
        } else {
            s
        };

        let margins = [
            ("top", v.start),
            ("right", h.end),
            ("bottom", v.end),
            ("left", h.start),
        ];
        if margins.iter().all(|(_, m)| *m <= PIN_ELISION_THRESHOLD) {
            return s;
        }
        let margin: Vec<String> = margins
            .iter()
            .filter(|(_, m)| *m > 0.0)
            .map(|(edge, m)| format!("{}: {}", edge, dim(*m, unit)))
            .collect();
        format!(
            "Container(margin: EdgeInsets.only({}), child: {}, )",
            margin.join(", "),
            s
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ParentFrame;
    use dartboard_core::document::{DesignKind, ResizeConstraints};
    use proptest::prelude::*;

    fn frame(width: f64, height: f64) -> ParentFrame {
        ParentFrame {
            content: Rect::new(0.0, 0.0, width, height),
            stack: None,
            is_artboard: false,
        }
    }

    fn all_pinned() -> ResizeConstraints {
        ResizeConstraints {
            left: true,
            right: true,
            top: true,
            bottom: true,
            width: false,
            height: false,
        }
    }

    fn input(parent: ParentFrame, bounds: Rect, o: Option<ResizeConstraints>) -> LayoutInput {
        LayoutInput {
            parent: Some(parent),
            bounds: Some(bounds),
            constraints: o,
            rotation: 0.0,
            flip_y: false,
        }
    }

    fn node() -> DesignNode {
        DesignNode::new("n", "Node", DesignKind::Ellipse)
    }

    fn serialize(layout: &mut Layout, s: &str) -> (String, Log) {
        let mut log = Log::new();
        let out = layout.serialize(s.to_string(), &node(), &Settings::default(), &mut log);
        (out, log)
    }

    #[test]
    fn test_root_is_disabled() {
        let mut layout = Layout::from_input(LayoutInput::default());
        assert!(!layout.enabled);
        assert_eq!(serialize(&mut layout, "Text('a')").0, "Text('a')");
    }

    #[test]
    fn test_all_pinned_with_padding() {
        let mut layout = Layout::from_input(input(
            frame(200.0, 200.0),
            Rect::new(10.0, 10.0, 180.0, 180.0),
            Some(all_pinned()),
        ));
        assert_eq!(layout.layout_type, LayoutType::None);
        assert!(layout.is_responsive);
        assert_eq!(layout.padding, Some(EdgeInsets::uniform(10.0)));
        insta::assert_snapshot!(
            serialize(&mut layout, "X").0,
            @"Padding(padding: EdgeInsets.all(10), child: X, )"
        );
    }

    #[test]
    fn test_full_size_all_pinned_has_no_padding() {
        let layout = Layout::from_input(input(
            frame(200.0, 200.0),
            Rect::new(0.2, 0.0, 199.9, 200.0),
            Some(all_pinned()),
        ));
        assert_eq!(layout.layout_type, LayoutType::None);
        assert_eq!(layout.padding, None);
        assert!(!layout.should_fix_size);
    }

    #[test]
    fn test_centered_child() {
        let o = ResizeConstraints {
            width: true,
            height: true,
            ..Default::default()
        };
        let mut layout = Layout::from_input(input(
            frame(300.0, 200.0),
            Rect::new(100.0, 75.0, 100.0, 50.0),
            Some(o),
        ));
        assert_eq!(layout.layout_type, LayoutType::Center);
        assert!(layout.is_fixed_size);
        assert_eq!(
            serialize(&mut layout, "X").0,
            "Center(child: SizedBox(width: 100, height: 50, child: X, ), )"
        );
    }

    #[test]
    fn test_aligned_child() {
        let o = ResizeConstraints {
            width: true,
            height: true,
            right: true,
            top: true,
            ..Default::default()
        };
        let mut layout = Layout::from_input(input(
            frame(300.0, 200.0),
            Rect::new(200.0, 0.0, 100.0, 50.0),
            Some(o),
        ));
        assert_eq!(layout.layout_type, LayoutType::Align);
        layout.should_fix_size = false;
        assert_eq!(
            serialize(&mut layout, "X").0,
            "Align(alignment: Alignment.topRight, child: X, )"
        );
    }

    #[test]
    fn test_missing_constraints_translate() {
        let mut layout =
            Layout::from_input(input(frame(300.0, 200.0), Rect::new(20.0, 40.0, 10.0, 10.0), None));
        assert_eq!(layout.layout_type, LayoutType::Translate);
        assert!(layout.is_fixed_size);
        assert_eq!(
            serialize(&mut layout, "X").0,
            "Transform.translate(offset: Offset(20, 40), child: SizedBox(width: 10, height: 10, child: X, ), )"
        );
    }

    #[test]
    fn test_translate_at_origin_is_elided() {
        let mut layout =
            Layout::from_input(input(frame(300.0, 200.0), Rect::new(0.05, 0.0, 10.0, 10.0), None));
        layout.should_fix_size = false;
        assert_eq!(serialize(&mut layout, "X").0, "X");
    }

    #[test]
    fn test_pinned_margins() {
        let o = ResizeConstraints {
            left: true,
            top: true,
            width: true,
            height: true,
            ..Default::default()
        };
        let mut layout = Layout::from_input(input(
            frame(300.0, 200.0),
            Rect::new(20.0, 30.0, 100.0, 50.0),
            Some(o),
        ));
        assert_eq!(layout.layout_type, LayoutType::Pinned);
        assert!(!layout.is_fixed_size);
        assert_eq!(
            serialize(&mut layout, "X").0,
            "Container(margin: EdgeInsets.only(top: 30, right: 180, bottom: 120, left: 20), child: X, )"
        );
    }

    #[test]
    fn test_small_pins_are_elided() {
        let o = ResizeConstraints {
            left: true,
            top: true,
            ..Default::default()
        };
        let mut layout = Layout::from_input(input(
            frame(100.0, 50.0),
            Rect::new(1.0, 2.0, 98.0, 46.0),
            Some(o),
        ));
        assert_eq!(layout.layout_type, LayoutType::Pinned);
        assert_eq!(serialize(&mut layout, "X").0, "X");
    }

    #[test]
    fn test_pinned_under_artboard_is_unwrapped() {
        let mut parent = frame(375.0, 812.0);
        parent.is_artboard = true;
        let o = ResizeConstraints {
            left: true,
            top: true,
            width: true,
            height: true,
            ..Default::default()
        };
        let mut layout =
            Layout::from_input(input(parent, Rect::new(20.0, 30.0, 100.0, 50.0), Some(o)));
        assert_eq!(layout.layout_type, LayoutType::Pinned);
        assert_eq!(serialize(&mut layout, "X").0, "X");
    }

    #[test]
    fn test_stack_pinned_child_keeps_own_size() {
        let mut parent = frame(400.0, 200.0);
        parent.stack = Some(StackOrientation::Vertical);
        let mut layout =
            Layout::from_input(input(parent, Rect::new(10.0, 0.0, 100.0, 50.0), Some(all_pinned())));
        assert_eq!(layout.layout_type, LayoutType::Pinned);
        // the size is left for the node itself to emit
        assert!(layout.should_fix_size);
        assert_eq!(
            serialize(&mut layout, "X").0,
            "Container(margin: EdgeInsets.only(right: 290, left: 10), child: X, )"
        );
    }

    #[test]
    fn test_stack_child_stretches_on_cross_axis() {
        let mut parent = frame(200.0, 400.0);
        parent.stack = Some(StackOrientation::Vertical);
        let o = ResizeConstraints {
            left: true,
            right: true,
            ..Default::default()
        };
        let layout =
            Layout::from_input(input(parent, Rect::new(0.0, 50.0, 200.0, 40.0), Some(o)));
        assert_eq!(layout.layout_type, LayoutType::None);
        assert_eq!(layout.direction, LayoutDirection::Vertical);
        assert!(layout.is_responsive);
        assert!(!layout.is_fixed_size);
    }

    #[test]
    fn test_stack_cross_axis_rewrite() {
        let mut parent = frame(400.0, 200.0);
        parent.stack = Some(StackOrientation::Horizontal);
        let o = ResizeConstraints {
            height: true,
            ..Default::default()
        };
        let mut layout =
            Layout::from_input(input(parent, Rect::new(0.0, 50.0, 100.0, 100.0), Some(o)));
        assert_eq!(layout.layout_type, LayoutType::Pinned);
        let (out, _) = serialize(
            &mut layout,
            "Column(crossAxisAlignment: CrossAxisAlignment.start, children: [], )",
        );
        assert_eq!(
            out,
            "Container(margin: EdgeInsets.only(top: 50, bottom: 50), child: Column(crossAxisAlignment: CrossAxisAlignment.center, children: [], ), )"
        );
    }

    #[test]
    fn test_rotation_wrapper() {
        let mut i = input(frame(300.0, 200.0), Rect::new(0.0, 0.0, 10.0, 10.0), None);
        i.rotation = 90.0;
        let mut layout = Layout::from_input(i);
        layout.should_fix_size = false;
        assert_eq!(
            serialize(&mut layout, "X").0,
            "Transform.rotate(angle: 1.5708, child: X, )"
        );

        let mut i = input(frame(300.0, 200.0), Rect::new(0.0, 0.0, 10.0, 10.0), None);
        i.flip_y = true;
        let mut layout = Layout::from_input(i);
        layout.should_fix_size = false;
        assert_eq!(
            serialize(&mut layout, "X").0,
            "Transform(alignment: Alignment.center, transform: Matrix4.identity()..rotateZ(0)..scale(1.0, -1.0), child: X, )"
        );
    }

    #[test]
    fn test_responsive_rotation_warns() {
        let mut i = input(
            frame(200.0, 200.0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Some(all_pinned()),
        );
        i.rotation = 45.0;
        let mut layout = Layout::from_input(i);
        let (out, log) = serialize(&mut layout, "X");
        assert_eq!(out, "X");
        assert_eq!(log.warnings().count(), 1);
    }

    #[test]
    fn test_expand_when_requested() {
        let mut layout = Layout::from_input(input(
            frame(200.0, 200.0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Some(all_pinned()),
        ));
        layout.should_expand = true;
        assert_eq!(serialize(&mut layout, "X").0, "SizedBox.expand(child: X, )");
        // flags are consumed
        assert_eq!(serialize(&mut layout, "X").0, "X");
    }

    #[test]
    fn test_reset_to_size() {
        let mut layout = Layout::from_input(input(
            frame(200.0, 200.0),
            Rect::new(30.0, 40.0, 20.0, 10.0),
            None,
        ));
        layout.reset(true);
        assert_eq!(layout.layout_type, LayoutType::None);
        assert_eq!(
            serialize(&mut layout, "X").0,
            "SizedBox(width: 20, height: 10, child: X, )"
        );
    }

    #[test]
    fn test_recalculate_keeps_disabled() {
        let mut layout = Layout::from_input(input(
            frame(200.0, 200.0),
            Rect::new(0.0, 0.0, 20.0, 20.0),
            None,
        ));
        layout.enabled = false;
        layout.recalculate_with_bounds(Rect::new(5.0, 5.0, 20.0, 20.0));
        assert!(!layout.enabled);
        assert_eq!(layout.bounds, Some(Rect::new(5.0, 5.0, 20.0, 20.0)));
    }

    #[test]
    fn test_layout_type_from_str() {
        assert_eq!("pinned".parse::<LayoutType>(), Ok(LayoutType::Pinned));
        assert_eq!(
            "grid".parse::<LayoutType>(),
            Err(LayoutError::UnknownLayoutType("grid".into()))
        );
    }

    proptest! {
        #[test]
        fn prop_full_size_all_pinned_is_none(w in 1.0f64..2000.0, h in 1.0f64..2000.0) {
            let layout = Layout::from_input(input(
                frame(w, h),
                Rect::new(0.0, 0.0, w, h),
                Some(all_pinned()),
            ));
            prop_assert_eq!(layout.layout_type, LayoutType::None);
            prop_assert!(layout.padding.is_none());
        }

        #[test]
        fn prop_centered_child_is_center(
            pw in 10.0f64..1000.0,
            ph in 10.0f64..1000.0,
            fw in 0.1f64..0.8,
            fh in 0.1f64..0.8,
        ) {
            let (w, h) = (pw * fw, ph * fh);
            let bounds = Rect::new((pw - w) / 2.0, (ph - h) / 2.0, w, h);
            let o = ResizeConstraints { width: true, height: true, ..Default::default() };
            let layout = Layout::from_input(input(frame(pw, ph), bounds, Some(o)));
            prop_assert_eq!(layout.layout_type, LayoutType::Center);
        }
    }
}
