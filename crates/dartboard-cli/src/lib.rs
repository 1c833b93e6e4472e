//! Command-line host for the dartboard exporter.
//!
//! Reads a JSON design document, runs one operation and reports the
//! diagnostics. Generated files go to a directory, raster renders to a JSON
//! manifest beside them and copied snippets to stdout.

mod args;
mod config;
mod error;
mod host;

pub use args::{Args, Command};
pub use config::{load_config, CliConfig};
pub use error::{CliError, Result};
pub use host::{DirWriter, ManifestExporter};

use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;

use dartboard_codegen::{naming, ExportReport, Exporter};
use dartboard_core::{Document, DocumentIndex, Settings};

/// Run one command, writing user-facing output to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let config = load_config(args.config.as_ref())?;

    match &args.command {
        Command::Export {
            input,
            out_dir,
            node,
        } => {
            let doc = read_document(input)?;
            let settings = config.apply(Settings::from_document(&doc))?;
            let exporter = Exporter::with_settings(&doc, settings);

            let out_dir = Path::new(out_dir);
            let mut writer = DirWriter::new(out_dir);
            let mut renders = ManifestExporter::new(out_dir.join(&config.render_manifest));
            let report = match node {
                Some(guid) => exporter.export_selected(guid, &mut writer, &mut renders)?,
                None => exporter.export_all(&mut writer, &mut renders),
            };
            print_report(&report, out)?;
        }
        Command::Copy { input, node } => {
            let doc = read_document(input)?;
            let settings = config.apply(Settings::from_document(&doc))?;
            let snippet = Exporter::with_settings(&doc, settings).copy_selected(node)?;
            info!("{}", snippet.report.message);
            writeln!(out, "{}", snippet.code)?;
        }
        Command::Widgets { input } => {
            let doc = read_document(input)?;
            let settings = config.apply(Settings::from_document(&doc))?;
            let index = DocumentIndex::new(&doc);
            for widget in index.widgets() {
                let class = naming::widget_class_name(widget, &settings);
                writeln!(out, "{}\t{}\t{}", widget.guid, class, naming::file_name(&class))?;
            }
        }
    }
    Ok(())
}

fn read_document(path: &str) -> Result<Document> {
    info!("Reading {}", path);
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.into(),
        source,
    })?;
    Ok(Document::from_json(&json)?)
}

fn print_report(report: &ExportReport, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", report.message)?;
    for file in &report.files {
        writeln!(out, "  wrote {}", file)?;
    }
    for diagnostic in &report.diagnostics {
        writeln!(out, "  {}", diagnostic)?;
    }
    if !report.fonts.is_empty() {
        writeln!(out, "  fonts: {}", report.fonts.join(", "))?;
    }
    Ok(())
}
