//! The design document tree.
//!
//! This mirrors what the host design tool exposes: a root with artboards, each
//! holding groups, primitives and text. Every node carries its own geometry,
//! paint, layout record, prototype interactions and persisted plugin data. The
//! tree is deserialized from JSON and treated as read-only except for plugin
//! data writes.

use std::io::Read;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{DocumentError, Result};
use crate::types::{Color, Rect, Transform2D};

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

/// A whole design document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document-level plugin data (settings, font map, image map).
    #[serde(default)]
    pub plugin_data: IndexMap<String, Value>,
    /// Top-level nodes, normally artboards.
    #[serde(default)]
    pub children: Vec<DesignNode>,
    /// Shared colour and character style assets.
    #[serde(default)]
    pub assets: Assets,
}

impl Document {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Find a node anywhere in the tree.
    pub fn find(&self, guid: &str) -> Option<&DesignNode> {
        self.children.iter().find_map(|c| c.find(guid))
    }

    /// Find a node, failing with [`DocumentError::NodeNotFound`].
    pub fn require(&self, guid: &str) -> Result<&DesignNode> {
        self.find(guid).ok_or_else(|| DocumentError::NodeNotFound {
            guid: guid.to_string(),
        })
    }

    /// Mutable lookup, used for plugin data writes.
    pub fn find_mut(&mut self, guid: &str) -> Option<&mut DesignNode> {
        self.children.iter_mut().find_map(|c| c.find_mut(guid))
    }
}

/// One node in the design tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    pub guid: String,
    #[serde(default)]
    pub name: String,
    /// True when the name was generated by the design tool.
    #[serde(default)]
    pub has_default_name: bool,
    pub kind: DesignKind,
    #[serde(default = "yes")]
    pub visible: bool,

    // Geometry
    /// Transform into the parent's coordinate space.
    #[serde(default)]
    pub transform: Transform2D,
    /// Bounds in the node's own coordinate space.
    #[serde(default)]
    pub local_bounds: Rect,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub flip_y: bool,

    // Paint
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default = "yes")]
    pub fill_enabled: bool,
    #[serde(default)]
    pub stroke: Option<Stroke>,
    #[serde(default)]
    pub shadow: Option<Shadow>,
    #[serde(default)]
    pub blur: Option<Blur>,

    // Structure
    #[serde(default)]
    pub layout: NodeLayout,
    /// Group uses its first child as a mask.
    #[serde(default)]
    pub mask: bool,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    /// Node should be exported as a raster image.
    #[serde(default)]
    pub marked_for_export: bool,
    #[serde(default)]
    pub plugin_data: IndexMap<String, Value>,
    #[serde(default)]
    pub children: Vec<DesignNode>,
}

impl DesignNode {
    /// Create a node with default geometry and paint.
    pub fn new(guid: impl Into<String>, name: impl Into<String>, kind: DesignKind) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            has_default_name: false,
            kind,
            visible: true,
            transform: Transform2D::IDENTITY,
            local_bounds: Rect::default(),
            rotation: 0.0,
            flip_y: false,
            opacity: 1.0,
            fill: None,
            fill_enabled: true,
            stroke: None,
            shadow: None,
            blur: None,
            layout: NodeLayout::default(),
            mask: false,
            interactions: Vec::new(),
            marked_for_export: false,
            plugin_data: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_bounds(mut self, width: f64, height: f64) -> Self {
        self.local_bounds = Rect::new(0.0, 0.0, width, height);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.transform = Transform2D::translation(x, y);
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_children(mut self, children: Vec<DesignNode>) -> Self {
        self.children = children;
        self
    }

    /// Bounds in the parent's coordinate space.
    pub fn bounds_in_parent(&self) -> Rect {
        self.local_bounds.transformed(&self.transform.affine())
    }

    /// Artboards and master components compile to their own widget class.
    pub fn is_widget_root(&self) -> bool {
        matches!(
            self.kind,
            DesignKind::Artboard | DesignKind::Component { is_master: true, .. }
        )
    }

    /// The active fill, if enabled.
    pub fn active_fill(&self) -> Option<&Fill> {
        self.fill.as_ref().filter(|_| self.fill_enabled)
    }

    /// The active stroke, if enabled and visible.
    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref().filter(|s| s.enabled && s.width > 0.0)
    }

    pub fn visible_shadow(&self) -> Option<&Shadow> {
        self.shadow.as_ref().filter(|s| s.visible)
    }

    pub fn has_image_fill(&self) -> bool {
        matches!(self.active_fill(), Some(Fill::ImageFill { .. }))
    }

    /// Depth-first search for a guid.
    pub fn find(&self, guid: &str) -> Option<&DesignNode> {
        if self.guid == guid {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(guid))
    }

    pub fn find_mut(&mut self, guid: &str) -> Option<&mut DesignNode> {
        if self.guid == guid {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(guid))
    }
}

/// Kind-specific data for a design node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DesignKind {
    Artboard,
    Group,
    #[serde(rename_all = "camelCase")]
    ScrollableGroup {
        #[serde(default)]
        scroll: ScrollDirection,
    },
    #[serde(rename_all = "camelCase")]
    Rectangle {
        #[serde(default)]
        corner_radii: CornerRadii,
    },
    Ellipse,
    #[serde(rename_all = "camelCase")]
    Path {
        #[serde(default)]
        path_data: String,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        #[serde(default)]
        path_data: String,
    },
    #[serde(rename_all = "camelCase")]
    Polygon {
        #[serde(default)]
        path_data: String,
    },
    #[serde(rename_all = "camelCase")]
    BooleanGroup {
        #[serde(default)]
        path_data: String,
    },
    Text(TextData),
    #[serde(rename_all = "camelCase")]
    Component {
        #[serde(default)]
        is_master: bool,
        symbol_id: String,
    },
    #[serde(other)]
    Unknown,
}

impl DesignKind {
    /// Human-readable kind label used in comments and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            DesignKind::Artboard => "Artboard",
            DesignKind::Group => "Group",
            DesignKind::ScrollableGroup { .. } => "ScrollGroup",
            DesignKind::Rectangle { .. } => "Rectangle",
            DesignKind::Ellipse => "Ellipse",
            DesignKind::Path { .. } => "Path",
            DesignKind::Line { .. } => "Line",
            DesignKind::Polygon { .. } => "Polygon",
            DesignKind::BooleanGroup { .. } => "BooleanGroup",
            DesignKind::Text(_) => "Text",
            DesignKind::Component { .. } => "Component",
            DesignKind::Unknown => "Unknown",
        }
    }

    /// SVG path data for path-like primitives.
    pub fn path_data(&self) -> Option<&str> {
        match self {
            DesignKind::Path { path_data }
            | DesignKind::Line { path_data }
            | DesignKind::Polygon { path_data }
            | DesignKind::BooleanGroup { path_data } => Some(path_data.as_str()),
            _ => None,
        }
    }

    pub fn is_path_like(&self) -> bool {
        self.path_data().is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Vertical,
    Horizontal,
    Panning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerRadii {
    #[serde(default)]
    pub top_left: f64,
    #[serde(default)]
    pub top_right: f64,
    #[serde(default)]
    pub bottom_right: f64,
    #[serde(default)]
    pub bottom_left: f64,
}

impl CornerRadii {
    pub fn uniform(r: f64) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.top_left == self.top_right
            && self.top_left == self.bottom_right
            && self.top_left == self.bottom_left
    }

    pub fn is_zero(&self) -> bool {
        self.is_uniform() && self.top_left == 0.0
    }
}

/// Text content and style runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData {
    #[serde(default)]
    pub text: String,
    /// Style runs in order; the last run covers whatever characters remain.
    #[serde(default)]
    pub style_ranges: Vec<TextRun>,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub layout_box: TextLayoutBox,
    /// Area text whose content overflows its box.
    #[serde(default)]
    pub clipped_by_area: bool,
    /// Line spacing in design units; 0 means automatic.
    #[serde(default)]
    pub line_spacing: f64,
}

/// One run of uniformly styled characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub length: usize,
    #[serde(default = "default_family")]
    pub font_family: String,
    /// Style name such as `Bold Italic`.
    #[serde(default = "default_font_style")]
    pub font_style: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub fill: Option<Color>,
    /// Tracking in thousandths of an em.
    #[serde(default)]
    pub char_spacing: f64,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub text_script: TextScript,
    #[serde(default)]
    pub text_transform: TextTransform,
    #[serde(default)]
    pub paragraph_spacing: f64,
}

fn default_family() -> String {
    "Helvetica Neue".to_string()
}

fn default_font_style() -> String {
    "Regular".to_string()
}

fn default_font_size() -> f64 {
    14.0
}

impl Default for TextRun {
    fn default() -> Self {
        Self {
            length: 0,
            font_family: default_family(),
            font_style: default_font_style(),
            font_size: default_font_size(),
            fill: None,
            char_spacing: 0.0,
            underline: false,
            strikethrough: false,
            text_script: TextScript::None,
            text_transform: TextTransform::None,
            paragraph_spacing: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextLayoutBox {
    /// Point text grows with its content and never wraps.
    #[default]
    Point,
    FixedHeight,
    AutoHeight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextScript {
    #[default]
    None,
    Superscript,
    Subscript,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    TitleCase,
}

/// A gradient colour stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub stop: f64,
    pub color: Color,
}

/// Node fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fill {
    Color(Color),
    #[serde(rename_all = "camelCase")]
    LinearGradient {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        color_stops: Vec<ColorStop>,
    },
    #[serde(rename_all = "camelCase")]
    RadialGradient {
        start_x: f64,
        start_y: f64,
        start_r: f64,
        end_x: f64,
        end_y: f64,
        end_r: f64,
        #[serde(default)]
        gradient_transform: Transform2D,
        color_stops: Vec<ColorStop>,
    },
    #[serde(rename_all = "camelCase")]
    AngularGradient {
        #[serde(default)]
        color_stops: Vec<ColorStop>,
    },
    #[serde(rename_all = "camelCase")]
    ImageFill {
        #[serde(default)]
        file_name: Option<String>,
        #[serde(default)]
        scale_behavior: ImageScale,
        #[serde(default)]
        natural_width: f64,
        #[serde(default)]
        natural_height: f64,
    },
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Fill::Color(color)
    }

    pub fn color_stops(&self) -> &[ColorStop] {
        match self {
            Fill::LinearGradient { color_stops, .. }
            | Fill::RadialGradient { color_stops, .. }
            | Fill::AngularGradient { color_stops } => color_stops,
            _ => &[],
        }
    }

    /// A representative solid colour: the colour itself or the first stop.
    pub fn first_color(&self) -> Option<Color> {
        match self {
            Fill::Color(c) => Some(*c),
            other => other.color_stops().first().map(|s| s.color),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Fill::Color(_) => "color",
            Fill::LinearGradient { .. } => "linear gradient",
            Fill::RadialGradient { .. } => "radial gradient",
            Fill::AngularGradient { .. } => "angular gradient",
            Fill::ImageFill { .. } => "image fill",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageScale {
    #[default]
    Cover,
    Stretch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub color: Color,
    #[serde(default = "one")]
    pub width: f64,
    #[serde(default = "yes")]
    pub enabled: bool,
    #[serde(default)]
    pub position: StrokePosition,
    #[serde(default)]
    pub join: StrokeJoin,
    #[serde(default)]
    pub cap: StrokeCap,
    #[serde(default)]
    pub dash_array: Vec<f64>,
    #[serde(default)]
    pub dash_offset: f64,
    #[serde(default = "default_miter_limit")]
    pub miter_limit: f64,
}

fn default_miter_limit() -> f64 {
    4.0
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            enabled: true,
            position: StrokePosition::Center,
            join: StrokeJoin::Miter,
            cap: StrokeCap::Butt,
            dash_array: Vec::new(),
            dash_offset: 0.0,
            miter_limit: default_miter_limit(),
        }
    }

    pub fn is_dashed(&self) -> bool {
        self.dash_array.iter().any(|d| *d > 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokePosition {
    #[default]
    Center,
    Inside,
    Outside,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeJoin::Miter => "miter",
            StrokeJoin::Round => "round",
            StrokeJoin::Bevel => "bevel",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeCap::Butt => "butt",
            StrokeCap::Round => "round",
            StrokeCap::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub blur: f64,
    pub color: Color,
    #[serde(default = "yes")]
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blur {
    pub amount: f64,
    #[serde(default)]
    pub brightness: f64,
    #[serde(default = "one")]
    pub fill_opacity: f64,
    #[serde(default = "yes")]
    pub visible: bool,
    /// Blurs what is behind the node rather than the node itself.
    #[serde(default)]
    pub is_background_effect: bool,
}

/// The layout record attached to each node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLayout {
    /// Present only when responsive resize is enabled for the node.
    #[serde(default)]
    pub resize_constraints: Option<ResizeConstraints>,
    #[serde(default, rename = "type")]
    pub layout_type: GroupLayoutType,
    #[serde(default)]
    pub stack: Option<StackLayout>,
    #[serde(default)]
    pub padding: Option<PaddingLayout>,
}

impl NodeLayout {
    pub fn is_stack(&self) -> bool {
        self.layout_type == GroupLayoutType::Stack && self.stack.is_some()
    }

    /// Guid of the designated background child, if any.
    pub fn background(&self) -> Option<&str> {
        self.padding.as_ref()?.background.as_deref()
    }
}

/// Which edges and dimensions are pinned relative to the parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeConstraints {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub top: bool,
    #[serde(default)]
    pub bottom: bool,
    #[serde(default)]
    pub width: bool,
    #[serde(default)]
    pub height: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupLayoutType {
    #[default]
    None,
    Stack,
    Padding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackLayout {
    pub orientation: StackOrientation,
    #[serde(default)]
    pub spacings: Spacings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackOrientation {
    Vertical,
    Horizontal,
}

/// Gaps between stack children: one value for all gaps, or one per gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spacings {
    Uniform(f64),
    PerGap(Vec<f64>),
}

impl Default for Spacings {
    fn default() -> Self {
        Spacings::Uniform(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaddingLayout {
    #[serde(default)]
    pub values: Option<PaddingValues>,
    /// Guid of the child acting as the background.
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaddingValues {
    Uniform(f64),
    Edges(EdgeValues),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeValues {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

/// A prototype interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Trigger kind, e.g. `tap`, `drag`, `time`.
    pub trigger: String,
    pub action: InteractionAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InteractionAction {
    #[serde(rename_all = "camelCase")]
    GoToArtboard {
        destination: String,
        #[serde(default)]
        transition: Transition,
    },
    GoBack,
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(default = "default_transition", rename = "type")]
    pub kind: String,
    /// Seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_easing")]
    pub easing: String,
    /// One of `L`, `R`, `T`, `B` for slide and push transitions.
    #[serde(default)]
    pub from_direction: Option<String>,
}

fn default_transition() -> String {
    "dissolve".to_string()
}

fn default_duration() -> f64 {
    0.3
}

fn default_easing() -> String {
    "ease-out".to_string()
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            kind: default_transition(),
            duration: default_duration(),
            easing: default_easing(),
            from_direction: None,
        }
    }
}

/// Shared document assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assets {
    #[serde(default)]
    pub colors: Vec<ColorAsset>,
    #[serde(default)]
    pub character_styles: Vec<CharacterStyleAsset>,
}

/// A named colour or gradient asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorAsset {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub gradient: Option<Fill>,
}

/// A named character style asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterStyleAsset {
    #[serde(default)]
    pub name: Option<String>,
    pub style: TextRun,
}
