//! Compilation context.
//!
//! One context lives for one copy or export operation. It is passed by
//! `&mut` through every serialize call and accumulates what the emitted code
//! needs outside the widget expression itself: imports, constructor
//! parameters, build methods, SVG constants, fonts and diagnostics.

use indexmap::{IndexMap, IndexSet};

use dartboard_core::{DocumentIndex, Log, Settings};

use crate::naming;
use crate::raster::RasterQueue;

/// Where the generated code is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A snippet pasted into existing code; SVG data is inlined.
    Clipboard,
    /// Whole widget files; SVG data becomes file-level constants.
    Files,
}

/// Dart types of exposed constructor parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DartType {
    String,
    Color,
    ImageProvider,
    VoidCallback,
    WidgetBuilder,
}

impl DartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DartType::String => "String",
            DartType::Color => "Color",
            DartType::ImageProvider => "ImageProvider",
            DartType::VoidCallback => "VoidCallback",
            DartType::WidgetBuilder => "WidgetBuilder",
        }
    }
}

/// A constructor parameter of the generated widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub dart_type: DartType,
    /// Default value expression; `None` makes the field nullable.
    pub default: Option<String>,
    pub required: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, dart_type: DartType) -> Self {
        Self {
            name: name.into(),
            dart_type,
            default: None,
            required: false,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Per-widget tables, reset when a new widget starts.
#[derive(Debug, Default, Clone)]
pub struct WidgetScope {
    pub name: String,
    /// Full import directives, e.g. `import 'dart:ui' as ui;`.
    pub imports: IndexSet<String>,
    pub params: IndexMap<String, Parameter>,
    pub build_methods: IndexMap<String, String>,
    /// SVG constant name to markup.
    pub svg_data: IndexMap<String, String>,
}

/// Run-scoped accumulator for one copy/export operation.
pub struct Context<'a> {
    pub index: &'a DocumentIndex<'a>,
    pub settings: Settings,
    pub target: Target,
    pub log: Log,
    /// Flutter font families referenced by emitted text.
    pub fonts: IndexSet<String>,
    pub raster: RasterQueue,
    /// Widget class name per artboard/master component guid.
    widget_names: IndexMap<String, String>,
    scope: WidgetScope,
}

impl<'a> Context<'a> {
    pub fn new(index: &'a DocumentIndex<'a>, settings: Settings, target: Target) -> Self {
        let mut log = Log::new();
        let mut widget_names = IndexMap::new();
        let mut taken = IndexSet::new();
        for widget in index.widgets() {
            let name = naming::widget_class_name(widget, &settings);
            if !taken.insert(name.clone()) {
                log.warn(
                    format!("Duplicate widget name '{}'; the later widget overwrites the earlier", name),
                    Some(widget),
                );
            }
            widget_names.insert(widget.guid.clone(), name);
        }

        Self {
            index,
            settings,
            target,
            log,
            fonts: IndexSet::new(),
            raster: RasterQueue::new(),
            widget_names,
            scope: WidgetScope::default(),
        }
    }

    /// Class name of the widget compiled from `guid`.
    pub fn widget_name(&self, guid: &str) -> Option<&str> {
        self.widget_names.get(guid).map(String::as_str)
    }

    /// Reset the per-widget tables.
    pub fn begin_widget(&mut self, name: &str) {
        log::debug!("compiling widget {}", name);
        self.scope = WidgetScope {
            name: name.to_string(),
            ..Default::default()
        };
        self.raster.start(name);
    }

    /// Take the tables accumulated since [`begin_widget`](Self::begin_widget).
    pub fn finish_widget(&mut self) -> WidgetScope {
        std::mem::take(&mut self.scope)
    }

    pub fn scope(&self) -> &WidgetScope {
        &self.scope
    }

    /// Add an import directive for a package URI, e.g. `package:x/y.dart`.
    pub fn add_import(&mut self, uri: &str) {
        self.scope.imports.insert(format!("import '{}';", uri));
    }

    /// Add an aliased import, e.g. `dart:ui` as `ui`.
    pub fn add_import_as(&mut self, uri: &str, alias: &str) {
        self.scope
            .imports
            .insert(format!("import '{}' as {};", uri, alias));
    }

    pub fn add_font(&mut self, family: &str) {
        self.fonts.insert(family.to_string());
    }

    /// Register a constructor parameter. A second registration under the
    /// same name keeps the first.
    pub fn add_param(&mut self, param: Parameter) {
        match self.scope.params.get(&param.name) {
            Some(existing) if existing.dart_type != param.dart_type => {
                self.log.warn(
                    format!(
                        "Parameter '{}' is declared as both {} and {}",
                        param.name,
                        existing.dart_type.as_str(),
                        param.dart_type.as_str()
                    ),
                    None,
                );
            }
            Some(_) => {}
            None => {
                self.scope.params.insert(param.name.clone(), param);
            }
        }
    }

    /// Register a generated build method. Name collisions warn and the later
    /// body wins.
    pub fn add_build_method(&mut self, name: &str, body: String) {
        if self.scope.build_methods.contains_key(name) {
            self.log
                .warn(format!("Duplicate build method '{}'", name), None);
        }
        self.scope.build_methods.insert(name.to_string(), body);
    }

    pub fn add_svg(&mut self, id: &str, svg: &str) {
        self.scope.svg_data.insert(id.to_string(), svg.to_string());
    }
}
