//! Copy and export operations.
//!
//! Each operation creates one [`Context`], compiles, hands files and raster
//! requests to the host through [`FileWriter`] and [`RasterExporter`], and
//! returns an [`ExportReport`] with the diagnostics. A widget that fails is
//! reported and the batch continues.

use dartboard_core::{Diagnostic, Document, DocumentIndex, DesignNode, Prop, Settings};

use crate::assets;
use crate::context::{Context, Target};
use crate::error::{CodegenError, Result};
use crate::node::Node;
use crate::raster::RasterRequest;
use crate::shape;
use crate::widget::{compile_widget, DartFile};

/// Destination for generated source files.
pub trait FileWriter {
    fn write_file(&mut self, name: &str, text: &str) -> Result<()>;
}

/// Renders nodes marked for export to PNG.
pub trait RasterExporter {
    fn export(&mut self, requests: &[RasterRequest]) -> Result<()>;
}

/// Outcome of one operation.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// One-line summary for the user.
    pub message: String,
    /// Written file names in write order.
    pub files: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// Flutter font families the generated code references.
    pub fonts: Vec<String>,
}

impl ExportReport {
    fn finish(message: String, files: Vec<String>, ctx: &mut Context<'_>) -> Self {
        log::info!("{}", message);
        Self {
            message,
            files,
            diagnostics: ctx.log.take(),
            fonts: ctx.fonts.iter().cloned().collect(),
        }
    }
}

/// A copied snippet.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub code: String,
    pub report: ExportReport,
}

pub struct Exporter<'d> {
    doc: &'d Document,
    settings: Settings,
}

impl<'d> Exporter<'d> {
    /// Exporter using the settings stored in the document.
    pub fn new(doc: &'d Document) -> Self {
        Self::with_settings(doc, Settings::from_document(doc))
    }

    pub fn with_settings(doc: &'d Document, settings: Settings) -> Self {
        Self { doc, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Write every artboard and master component, then the asset classes.
    pub fn export_all(
        &self,
        writer: &mut dyn FileWriter,
        raster: &mut dyn RasterExporter,
    ) -> ExportReport {
        let index = DocumentIndex::new(self.doc);
        let mut ctx = Context::new(&index, self.settings.clone(), Target::Files);
        let mut files = Vec::new();
        let (mut count, mut total) = (0, 0);

        for &widget in index.widgets() {
            if widget.prop_bool(Prop::IncludeInExportProject) == Some(false) {
                log::debug!("skipping {} (excluded from export)", widget.name);
                continue;
            }
            total += 1;
            match write_widget(widget, &mut ctx, writer) {
                Ok(file) => {
                    count += 1;
                    files.push(file);
                }
                Err(e) => ctx
                    .log
                    .error(format!("Unable to export widget: {}", e), Some(widget)),
            }
            flush_rasters(&mut ctx, raster);
        }

        self.write_assets(&mut ctx, writer, &mut files);
        let message = format!("Exported {} of {} widgets", count, total);
        ExportReport::finish(message, files, &mut ctx)
    }

    /// Write the widget enclosing `guid`, then the asset classes.
    pub fn export_selected(
        &self,
        guid: &str,
        writer: &mut dyn FileWriter,
        raster: &mut dyn RasterExporter,
    ) -> Result<ExportReport> {
        let index = DocumentIndex::new(self.doc);
        let node = self.doc.require(guid)?;
        let Some(widget) = index.widget_root_of(node) else {
            return Err(CodegenError::InvalidSelection(
                "Only layers inside an artboard or master component can be exported".to_string(),
            ));
        };

        let mut ctx = Context::new(&index, self.settings.clone(), Target::Files);
        let mut files = Vec::new();
        let message = match write_widget(widget, &mut ctx, writer) {
            Ok(file) => {
                let message = format!("Exported '{}' successfully", file);
                files.push(file);
                message
            }
            Err(e) => {
                ctx.log
                    .error(format!("Unable to export widget: {}", e), Some(widget));
                "Widget export failed".to_string()
            }
        };
        self.write_assets(&mut ctx, writer, &mut files);
        flush_rasters(&mut ctx, raster);
        Ok(ExportReport::finish(message, files, &mut ctx))
    }

    /// Compile one layer into a snippet for the clipboard.
    ///
    /// The layer's own layout is dropped; it is pasted into code the user
    /// positions.
    pub fn copy_selected(&self, guid: &str) -> Result<Snippet> {
        let index = DocumentIndex::new(self.doc);
        let design = self.doc.require(guid)?;
        if design.is_widget_root() {
            return Err(CodegenError::InvalidSelection(format!(
                "'{}' is a widget; export it instead of copying",
                design.name
            )));
        }

        let mut ctx = Context::new(&index, self.settings.clone(), Target::Clipboard);
        let widget_name = index
            .widget_root_of(design)
            .and_then(|w| ctx.widget_name(&w.guid))
            .unwrap_or("snippet")
            .to_string();
        ctx.begin_widget(&widget_name);

        let Some(mut node) = Node::build(design, &mut ctx) else {
            return Err(CodegenError::EmptyOutput(design.name.clone()));
        };
        node.layout.enabled = false;
        shape::combine_shapes(&mut node, ctx.settings.combine_shapes);
        let code = node.serialize(&mut ctx);
        ctx.finish_widget();
        if code.is_empty() {
            return Err(CodegenError::EmptyOutput(design.name.clone()));
        }

        let report = ExportReport::finish(
            "Flutter code copied to clipboard".to_string(),
            Vec::new(),
            &mut ctx,
        );
        Ok(Snippet { code, report })
    }

    /// Colour and character style classes.
    ///
    /// Write failures are logged.
    fn write_assets(&self, ctx: &mut Context<'_>, writer: &mut dyn FileWriter, files: &mut Vec<String>) {
        let generated = [
            assets::colors(&self.doc.assets, &ctx.settings, &mut ctx.log),
            assets::text_styles(&self.doc.assets, &ctx.settings, &mut ctx.log),
        ];
        for file in generated.into_iter().flatten() {
            match writer.write_file(&file.file_name, &file.source) {
                Ok(()) => files.push(file.file_name),
                Err(e) => ctx.log.error(e.to_string(), None),
            }
        }
    }
}

fn write_widget(
    widget: &DesignNode,
    ctx: &mut Context<'_>,
    writer: &mut dyn FileWriter,
) -> Result<String> {
    let DartFile {
        file_name, source, ..
    } = compile_widget(widget, ctx)?;
    writer.write_file(&file_name, &source)?;
    Ok(file_name)
}

/// Hand queued raster requests to the host in insertion order.
fn flush_rasters(ctx: &mut Context<'_>, raster: &mut dyn RasterExporter) {
    let requests = ctx.raster.drain();
    if requests.is_empty() {
        return;
    }
    log::debug!("exporting {} images", requests.len());
    if let Err(e) = raster.export(&requests) {
        ctx.log.error(e.to_string(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartboard_core::document::Fill;
    use dartboard_core::{Color, DesignKind};
    use indexmap::IndexMap;
    use serde_json::json;

    #[derive(Default)]
    struct MemoryWriter {
        files: IndexMap<String, String>,
        fail_on: Option<String>,
    }

    impl FileWriter for MemoryWriter {
        fn write_file(&mut self, name: &str, text: &str) -> Result<()> {
            if self.fail_on.as_deref() == Some(name) {
                return Err(CodegenError::Write {
                    file: name.to_string(),
                    message: "disk full".to_string(),
                });
            }
            self.files.insert(name.to_string(), text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Renders(Vec<Vec<RasterRequest>>);

    impl RasterExporter for Renders {
        fn export(&mut self, requests: &[RasterRequest]) -> Result<()> {
            self.0.push(requests.to_vec());
            Ok(())
        }
    }

    fn dot(guid: &str) -> DesignNode {
        DesignNode::new(guid, "Dot", DesignKind::Ellipse)
            .with_bounds(10.0, 10.0)
            .with_fill(Fill::Color(Color::BLACK))
    }

    fn document() -> Document {
        let mut logo = DesignNode::new("logo", "Logo", DesignKind::Group)
            .with_bounds(20.0, 20.0)
            .with_children(vec![dot("d2")]);
        logo.marked_for_export = true;
        let mut hidden = DesignNode::new("x", "Draft", DesignKind::Artboard).with_bounds(10.0, 10.0);
        hidden.set_prop(Prop::IncludeInExportProject, json!(false));
        Document {
            children: vec![
                DesignNode::new("a", "Home", DesignKind::Artboard)
                    .with_bounds(375.0, 812.0)
                    .with_children(vec![dot("d1"), logo]),
                DesignNode::new("b", "Settings", DesignKind::Artboard)
                    .with_bounds(375.0, 812.0)
                    .with_children(vec![dot("d3")]),
                hidden,
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_export_all() {
        let doc = document();
        let mut writer = MemoryWriter::default();
        let mut renders = Renders::default();
        let report = Exporter::new(&doc).export_all(&mut writer, &mut renders);

        assert_eq!(report.message, "Exported 2 of 2 widgets");
        assert_eq!(report.files, vec!["home.dart", "settings.dart"]);
        assert_eq!(renders.0.len(), 1);
        assert_eq!(renders.0[0][0].path, "assets/images/home/logo.png");
        assert!(writer.files["home.dart"].contains("AssetImage('assets/images/home/logo.png')"));
    }

    #[test]
    fn test_write_failure_continues() {
        let doc = document();
        let mut writer = MemoryWriter {
            fail_on: Some("home.dart".to_string()),
            ..Default::default()
        };
        let report = Exporter::new(&doc).export_all(&mut writer, &mut Renders::default());
        assert_eq!(report.message, "Exported 1 of 2 widgets");
        assert_eq!(report.files, vec!["settings.dart"]);
        assert_eq!(
            report
                .diagnostics
                .iter()
                .filter(|d| d.severity == dartboard_core::Severity::Error)
                .count(),
            1
        );
    }

    #[test]
    fn test_export_selected_uses_enclosing_widget() {
        let doc = document();
        let mut writer = MemoryWriter::default();
        let report = Exporter::new(&doc)
            .export_selected("d3", &mut writer, &mut Renders::default())
            .unwrap();
        assert_eq!(report.message, "Exported 'settings.dart' successfully");
        assert_eq!(writer.files.len(), 1);

        let err = Exporter::new(&doc)
            .export_selected("missing", &mut writer, &mut Renders::default())
            .unwrap_err();
        assert!(matches!(err, CodegenError::Document(_)));
    }

    #[test]
    fn test_asset_classes_are_written() {
        let mut doc = document();
        doc.assets.colors.push(dartboard_core::document::ColorAsset {
            name: Some("primary".to_string()),
            color: Some(Color::WHITE),
            gradient: None,
        });
        let mut writer = MemoryWriter::default();
        let report = Exporter::new(&doc).export_all(&mut writer, &mut Renders::default());
        assert_eq!(report.files.last().map(String::as_str), Some("gen_colors.dart"));
    }

    #[test]
    fn test_copy_selected() {
        let doc = document();
        let exporter = Exporter::with_settings(
            &doc,
            Settings {
                include_name_comments: false,
                ..Default::default()
            },
        );
        let snippet = exporter.copy_selected("d1").unwrap();
        assert_eq!(
            snippet.code,
            "Container(decoration: BoxDecoration(color: const Color(0xff000000), \
             borderRadius: BorderRadius.all(Radius.elliptical(9999.0, 9999.0)), ), )"
        );
        assert_eq!(snippet.report.message, "Flutter code copied to clipboard");

        assert!(matches!(
            exporter.copy_selected("a"),
            Err(CodegenError::InvalidSelection(_))
        ));
    }
}
