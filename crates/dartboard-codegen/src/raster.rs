//! Raster export queue.
//!
//! Groups marked for export are emitted as `Image` widgets. The render itself
//! is the host's job: each request is queued while its widget compiles and
//! the queue is drained after the widget file is written.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use dartboard_core::DesignNode;

/// Largest scale factor before the 3x density multiplier.
const MAX_SCALE: f64 = 20.0;
const MAX_HEIGHT: f64 = 200.0;
const MAX_WIDTH: f64 = 400.0;
const DENSITY: f64 = 3.0;

/// One image the host should render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterRequest {
    /// Node to render.
    pub guid: String,
    /// Project-relative PNG path, also used by `AssetImage`.
    pub path: String,
    pub scale: f64,
}

/// Pending raster requests for the widget being compiled.
#[derive(Debug, Default)]
pub struct RasterQueue {
    folder: String,
    names: HashSet<String>,
    pending: Vec<RasterRequest>,
}

impl RasterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a widget: images go to `assets/images/<widget>/`.
    pub fn start(&mut self, widget_name: &str) {
        let folder: String = widget_name
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        self.folder = format!("assets/images/{}", folder);
        self.names.clear();
    }

    /// Queue a render of `node` and return its asset path.
    pub fn add(&mut self, node: &DesignNode) -> String {
        let mut name: String = node
            .name
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        if name.is_empty() {
            name = "image".to_string();
        }
        if !self.names.insert(name.clone()) {
            name = format!("{}_{}", name, node.guid);
            self.names.insert(name.clone());
        }

        let path = format!("{}/{}.png", self.folder, name);
        let b = node.local_bounds;
        let scale = if b.width > 0.0 && b.height > 0.0 {
            MAX_SCALE.min(MAX_HEIGHT / b.height).min(MAX_WIDTH / b.width) * DENSITY
        } else {
            DENSITY
        };
        self.pending.push(RasterRequest {
            guid: node.guid.clone(),
            path: path.clone(),
            scale,
        });
        path
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove pending requests in insertion order.
    pub fn drain(&mut self) -> Vec<RasterRequest> {
        std::mem::take(&mut self.pending)
    }
}
