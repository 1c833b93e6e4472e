//! Read-only index over a document.
//!
//! Design nodes own their children but not a parent pointer. The index records
//! both directions once so the compiler can ask for a node's parent, its
//! inherited opacity or its enclosing widget root.

use std::collections::HashMap;

use crate::document::{DesignKind, DesignNode, Document};

/// Guid lookup, parent lookup and widget enumeration.
#[derive(Debug)]
pub struct DocumentIndex<'a> {
    doc: &'a Document,
    nodes: HashMap<&'a str, &'a DesignNode>,
    parents: HashMap<&'a str, &'a DesignNode>,
    /// Artboards and master components in document order.
    widgets: Vec<&'a DesignNode>,
}

impl<'a> DocumentIndex<'a> {
    pub fn new(doc: &'a Document) -> Self {
        let mut index = Self {
            doc,
            nodes: HashMap::new(),
            parents: HashMap::new(),
            widgets: Vec::new(),
        };
        for child in &doc.children {
            index.visit(child, None);
        }
        index
    }

    fn visit(&mut self, node: &'a DesignNode, parent: Option<&'a DesignNode>) {
        self.nodes.insert(node.guid.as_str(), node);
        if let Some(parent) = parent {
            self.parents.insert(node.guid.as_str(), parent);
        }
        if node.is_widget_root() {
            self.widgets.push(node);
        }
        for child in &node.children {
            self.visit(child, Some(node));
        }
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn node(&self, guid: &str) -> Option<&'a DesignNode> {
        self.nodes.get(guid).copied()
    }

    /// Parent node; `None` for top-level nodes.
    pub fn parent(&self, node: &DesignNode) -> Option<&'a DesignNode> {
        self.parents.get(node.guid.as_str()).copied()
    }

    /// Every artboard and master component.
    pub fn widgets(&self) -> &[&'a DesignNode] {
        &self.widgets
    }

    /// The master component for a symbol id.
    pub fn master_component(&self, symbol_id: &str) -> Option<&'a DesignNode> {
        self.widgets.iter().copied().find(|w| {
            matches!(&w.kind, DesignKind::Component { is_master: true, symbol_id: id } if id == symbol_id)
        })
    }

    /// Closest enclosing artboard or master component, including the node itself.
    pub fn widget_root_of(&self, node: &'a DesignNode) -> Option<&'a DesignNode> {
        let mut current = Some(node);
        while let Some(n) = current {
            if n.is_widget_root() {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Opacity of the node multiplied by that of its ancestors below the
    /// enclosing widget root.
    pub fn inherited_opacity(&self, node: &DesignNode) -> f64 {
        let mut opacity = node.opacity;
        let mut current = self.parent(node);
        while let Some(n) = current {
            if n.is_widget_root() {
                break;
            }
            opacity *= n.opacity;
            current = self.parent(n);
        }
        opacity
    }
}
