//! Persisted configuration: document settings and per-node properties.
//!
//! The design tool stores arbitrary JSON under string keys on every node
//! ("plugin data"). Document-wide settings live on the root, per-node
//! overrides such as a parameter name or export mode live on the node itself.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{DesignNode, Document};

/// Keys of per-node persisted properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Class name override for a widget root.
    WidgetName,
    /// How the node is emitted (`inline`, `method`, `builder`, `custom`).
    ExportMode,
    /// Name of the generated build method in `method` mode.
    BuildMethodName,
    /// Template for `custom` mode.
    CustomCode,
    /// Exposes a tap callback parameter under this name.
    TapCallbackName,
    /// Exposes the text content as a parameter.
    TextParamName,
    /// Exposes the fill colour as a parameter.
    ColorParamName,
    /// Exposes an image fill as a parameter.
    ImageParamName,
    /// Asset file name for an image fill.
    ImageFillName,
    /// Whether a widget root takes part in export-all.
    IncludeInExportProject,
    /// Enables aggressive shape merging below this node.
    CombineShapes,
}

impl Prop {
    pub fn key(&self) -> &'static str {
        match self {
            Prop::WidgetName => "widgetName",
            Prop::ExportMode => "exportMode",
            Prop::BuildMethodName => "buildMethodName",
            Prop::CustomCode => "customCode",
            Prop::TapCallbackName => "tapCallbackName",
            Prop::TextParamName => "textParamName",
            Prop::ColorParamName => "colorParamName",
            Prop::ImageParamName => "imageParamName",
            Prop::ImageFillName => "imageFillName",
            Prop::IncludeInExportProject => "includeInExportProject",
            Prop::CombineShapes => "combineShapes",
        }
    }
}

/// Root-level keys for maps shared across the document.
pub const FONT_MAP_KEY: &str = "fontMap";
pub const IMAGE_MAP_KEY: &str = "imageMap";

impl DesignNode {
    /// Raw persisted value.
    pub fn prop(&self, prop: Prop) -> Option<&Value> {
        self.plugin_data.get(prop.key())
    }

    /// Persisted string, ignoring empty strings.
    pub fn prop_str(&self, prop: Prop) -> Option<&str> {
        self.prop(prop)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn prop_bool(&self, prop: Prop) -> Option<bool> {
        self.prop(prop).and_then(Value::as_bool)
    }

    /// Store a value; `Value::Null` removes the key.
    pub fn set_prop(&mut self, prop: Prop, value: Value) {
        if value.is_null() {
            self.plugin_data.shift_remove(prop.key());
        } else {
            self.plugin_data.insert(prop.key().to_string(), value);
        }
    }
}

impl Document {
    /// Record the Flutter font family used for a design font family.
    pub fn set_flutter_font(&mut self, family: &str, flutter_family: &str) {
        let map = self
            .plugin_data
            .entry(FONT_MAP_KEY.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
        if let Value::Object(map) = map {
            map.insert(family.to_string(), Value::String(flutter_family.to_string()));
        }
    }

    /// Record the asset name used for an image fill.
    pub fn set_image_name(&mut self, image_key: &str, name: &str) {
        let map = self
            .plugin_data
            .entry(IMAGE_MAP_KEY.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
        if let Value::Object(map) = map {
            map.insert(image_key.to_string(), Value::String(name.to_string()));
        }
    }
}

/// Document-wide export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Prefix prepended to generated widget class names.
    pub widget_prefix: String,
    /// Emit `PageLink` wrappers for prototype interactions.
    pub enable_prototype: bool,
    /// Convert layer names to PascalCase / camelCase identifiers.
    pub normalize_name_case: bool,
    /// Emit a `// Layer:` comment for layers with custom names.
    pub include_name_comments: bool,
    /// Emit null-safe Dart (`Key? key`, `required`).
    pub null_safe: bool,
    pub export_colors: bool,
    pub export_char_styles: bool,
    pub colors_class_name: String,
    pub char_styles_class_name: String,
    /// Suffix appended to dimension literals, e.g. `.w`.
    pub width_unit: String,
    /// Merge rectangles and ellipses into SVG shapes too.
    pub combine_shapes: bool,
    /// Design font family to Flutter font family.
    pub font_map: IndexMap<String, String>,
    /// Image key to asset file name.
    pub image_map: IndexMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            widget_prefix: String::new(),
            enable_prototype: true,
            normalize_name_case: true,
            include_name_comments: true,
            null_safe: true,
            export_colors: true,
            export_char_styles: true,
            colors_class_name: "GenColors".to_string(),
            char_styles_class_name: "GenTextStyles".to_string(),
            width_unit: String::new(),
            combine_shapes: false,
            font_map: IndexMap::new(),
            image_map: IndexMap::new(),
        }
    }
}

impl Settings {
    /// Read settings from the document root.
    ///
    /// Malformed entries are logged and the defaults used instead.
    pub fn from_document(doc: &Document) -> Self {
        let object: serde_json::Map<String, Value> = doc
            .plugin_data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        match serde_json::from_value(Value::Object(object)) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed document settings: {}", e);
                Settings::default()
            }
        }
    }

    /// Flutter font family for a design font family.
    pub fn flutter_font<'a>(&'a self, family: &'a str) -> &'a str {
        self.font_map.get(family).map(String::as_str).unwrap_or(family)
    }

    pub fn image_name(&self, key: &str) -> Option<&str> {
        self.image_map.get(key).map(String::as_str)
    }
}
