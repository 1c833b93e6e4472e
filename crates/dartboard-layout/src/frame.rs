//! Parent context for layout classification.

use dartboard_core::document::{DesignKind, DesignNode, GroupLayoutType, ResizeConstraints, StackOrientation};
use dartboard_core::types::Rect;

use crate::insets::normalize_padding;

/// What a child needs to know about its parent to be classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentFrame {
    /// Parent content area in the parent's own space, padding removed.
    pub content: Rect,
    /// Orientation when the parent lays its children out as a stack.
    pub stack: Option<StackOrientation>,
    /// Parent is an artboard.
    pub is_artboard: bool,
}

impl ParentFrame {
    pub fn of(parent: &DesignNode) -> Self {
        let is_widget_root = parent.is_widget_root();
        let mut content = if is_widget_root {
            Rect::new(0.0, 0.0, parent.local_bounds.width, parent.local_bounds.height)
        } else {
            parent.local_bounds
        };

        if parent.layout.layout_type != GroupLayoutType::None {
            let values = parent.layout.padding.as_ref().and_then(|p| p.values.as_ref());
            if let Some(p) = normalize_padding(values) {
                content = Rect::new(
                    content.x + p.left,
                    content.y + p.top,
                    (content.width - p.left - p.right).max(0.0),
                    (content.height - p.top - p.bottom).max(0.0),
                );
            }
        }

        let stack = if parent.layout.is_stack() {
            parent.layout.stack.as_ref().map(|s| s.orientation)
        } else {
            None
        };

        Self {
            content,
            stack,
            is_artboard: matches!(parent.kind, DesignKind::Artboard),
        }
    }
}

/// Everything [`Layout::calculate`](crate::Layout::calculate) reads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutInput {
    /// `None` for widget roots.
    pub parent: Option<ParentFrame>,
    /// Bounds relative to the parent's content origin.
    pub bounds: Option<Rect>,
    pub constraints: Option<ResizeConstraints>,
    /// Rotation in degrees.
    pub rotation: f64,
    pub flip_y: bool,
}

impl LayoutInput {
    /// Input for a design node placed in `parent`.
    pub fn for_node(node: &DesignNode, parent: Option<&DesignNode>) -> Self {
        let parent = parent.map(ParentFrame::of);
        Self {
            bounds: Some(match &parent {
                Some(frame) => adjusted_bounds(node, frame),
                None => Rect::new(0.0, 0.0, node.local_bounds.width, node.local_bounds.height),
            }),
            parent,
            constraints: node.layout.resize_constraints,
            rotation: node.rotation,
            flip_y: node.flip_y,
        }
    }

    /// Same parent and constraints with new bounds and no transform.
    pub fn with_bounds(&self, bounds: Rect) -> Self {
        Self {
            bounds: Some(bounds),
            rotation: 0.0,
            flip_y: false,
            ..*self
        }
    }
}

/// Node bounds relative to the parent's content origin.
///
/// Rotated nodes keep their unrotated size, centred on the rotated bounds, so
/// a `Transform.rotate` wrapper lands them in the right place.
pub fn adjusted_bounds(node: &DesignNode, frame: &ParentFrame) -> Rect {
    let bounds = node.bounds_in_parent();
    let bounds = if node.rotation != 0.0 {
        let c = bounds.center();
        let (w, h) = (node.local_bounds.width, node.local_bounds.height);
        Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
    } else {
        bounds
    };
    bounds.translate(-frame.content.x, -frame.content.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartboard_core::document::{PaddingLayout, PaddingValues, StackLayout, Spacings};
    use dartboard_core::types::Transform2D;

    #[test]
    fn test_frame_of_artboard() {
        let mut board = DesignNode::new("a", "Home", DesignKind::Artboard).with_bounds(375.0, 812.0);
        board.local_bounds.x = 40.0;
        let frame = ParentFrame::of(&board);
        assert_eq!(frame.content, Rect::new(0.0, 0.0, 375.0, 812.0));
        assert!(frame.is_artboard);
        assert!(frame.stack.is_none());
    }

    #[test]
    fn test_master_component_is_not_an_artboard() {
        let master = DesignNode::new(
            "m",
            "Chip",
            DesignKind::Component {
                is_master: true,
                symbol_id: "chip".into(),
            },
        )
        .with_bounds(80.0, 32.0);
        let frame = ParentFrame::of(&master);
        assert_eq!(frame.content, Rect::new(0.0, 0.0, 80.0, 32.0));
        assert!(!frame.is_artboard);
    }

    #[test]
    fn test_frame_with_padding_and_stack() {
        let mut group = DesignNode::new("g", "List", DesignKind::Group).with_bounds(200.0, 100.0);
        group.layout.layout_type = GroupLayoutType::Stack;
        group.layout.stack = Some(StackLayout {
            orientation: StackOrientation::Vertical,
            spacings: Spacings::Uniform(4.0),
        });
        group.layout.padding = Some(PaddingLayout {
            values: Some(PaddingValues::Uniform(10.0)),
            background: None,
        });
        let frame = ParentFrame::of(&group);
        assert_eq!(frame.content, Rect::new(10.0, 10.0, 180.0, 80.0));
        assert_eq!(frame.stack, Some(StackOrientation::Vertical));
    }

    #[test]
    fn test_adjusted_bounds_rotated() {
        let frame = ParentFrame {
            content: Rect::new(0.0, 0.0, 100.0, 100.0),
            stack: None,
            is_artboard: false,
        };
        let mut node = DesignNode::new("r", "Bar", DesignKind::Ellipse).with_bounds(40.0, 10.0);
        // rotated 90 degrees about the origin, then moved
        node.transform = Transform2D([0.0, 1.0, -1.0, 0.0, 50.0, 20.0]);
        node.rotation = 90.0;
        let b = adjusted_bounds(&node, &frame);
        assert!((b.width - 40.0).abs() < 1e-9);
        assert!((b.height - 10.0).abs() < 1e-9);
        // centre of the rotated box is (45, 40)
        assert!((b.x - 25.0).abs() < 1e-9);
        assert!((b.y - 35.0).abs() < 1e-9);
    }
}
