//! Host side of an export: files go to a directory, renders to a manifest.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use dartboard_codegen::{CodegenError, FileWriter, RasterExporter, RasterRequest};

/// Writes generated files below a root directory.
#[derive(Debug)]
pub struct DirWriter {
    root: PathBuf,
}

impl DirWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileWriter for DirWriter {
    fn write_file(&mut self, name: &str, text: &str) -> dartboard_codegen::Result<()> {
        let path = self.root.join(name);
        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)
        };
        write(&path).map_err(|e| CodegenError::Write {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    renders: &'a [RasterRequest],
}

/// Records raster requests in a JSON manifest for an external renderer.
///
/// The manifest is rewritten after every batch so it is complete even when a
/// later widget fails.
#[derive(Debug)]
pub struct ManifestExporter {
    path: PathBuf,
    renders: Vec<RasterRequest>,
}

impl ManifestExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            renders: Vec::new(),
        }
    }

    pub fn renders(&self) -> &[RasterRequest] {
        &self.renders
    }
}

impl RasterExporter for ManifestExporter {
    fn export(&mut self, requests: &[RasterRequest]) -> dartboard_codegen::Result<()> {
        self.renders.extend_from_slice(requests);
        let json = serde_json::to_string_pretty(&Manifest {
            renders: &self.renders,
        })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json).map_err(|e| CodegenError::Raster(e.to_string()))
    }
}
