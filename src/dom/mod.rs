//! Owned model of the host page document
//!
//! The engine never touches the live browser DOM. The host hands it a
//! `Document`: a flat arena of element nodes carrying tag, id, classes,
//! attributes, flattened text content, and layout geometry. This is the
//! engine's private copy of the surface it reads, queried during extraction
//! and mutated only to move the highlight marker.
//!
//! A `Document` can be built programmatically through [`Document::add`] or
//! deserialized from a JSON snapshot produced by the host glue.

use crate::{ReaderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node in the document arena.
///
/// This is the non-owning "source ref" carried by queue items: stable for
/// the lifetime of the document, never dangling, and cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Document-relative layout rectangle (vertical axis only)
///
/// The engine only ever needs vertical geometry: where an element sits in
/// the page so the scroller can bring it into view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the top of the document, in CSS pixels
    pub top: f32,
    /// Element height in CSS pixels
    pub height: f32,
}

impl Rect {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// One element of the page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    /// Lowercase tag name ("p", "h2", "pre", ...)
    pub tag: String,

    /// Element id attribute, empty if absent
    #[serde(default)]
    pub id: String,

    /// Class list
    #[serde(default)]
    pub classes: Vec<String>,

    /// Remaining attributes of interest (href, src, alt, data-language, ...)
    #[serde(default)]
    pub attrs: HashMap<String, String>,

    /// Flattened text content of the element
    #[serde(default)]
    pub text: String,

    /// Layout geometry, zero if the host did not measure
    #[serde(default)]
    pub rect: Rect,

    /// Child nodes in document order
    #[serde(default)]
    pub children: Vec<NodeId>,
}

impl Node {
    /// Create an element node with the given tag
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_rect(mut self, top: f32, height: f32) -> Self {
        self.rect = Rect::new(top, height);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// Text content with surrounding whitespace removed
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    /// Add a class if not already present
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Remove a class if present
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}

/// A page document: flat node arena rooted at a body node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Hostname the page was loaded from, drives site-variant dispatch
    pub hostname: String,

    /// Page title (document.title in the host)
    pub title: String,

    /// Node arena; index 0 is the root
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document with a body root node
    pub fn new(hostname: &str, title: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            title: title.to_string(),
            nodes: vec![Node::element("body")],
        }
    }

    /// Deserialize a document from a host-produced JSON snapshot
    ///
    /// Validates that every child reference points inside the arena and
    /// that the arena forms a tree: the root is never a child, no node is
    /// its own child, and no node is claimed by more than one parent.
    /// Traversal assumes this, so a cyclic or shared-child snapshot must
    /// be rejected here rather than looping or duplicating later.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        if doc.nodes.is_empty() {
            return Err(ReaderError::Document("snapshot has no nodes".into()));
        }
        let mut claimed = vec![false; doc.nodes.len()];
        for (i, node) in doc.nodes.iter().enumerate() {
            for &NodeId(child) in &node.children {
                if child >= doc.nodes.len() || child == i || child == 0 {
                    return Err(ReaderError::Document(format!(
                        "node {} has invalid child reference {}",
                        i, child
                    )));
                }
                if claimed[child] {
                    return Err(ReaderError::Document(format!(
                        "node {} is referenced as a child more than once",
                        child
                    )));
                }
                claimed[child] = true;
            }
        }
        Ok(doc)
    }

    /// The root (body) node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a node under the given parent, returning its id
    pub fn add(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All nodes below `scope` in document order (depth-first preorder)
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.get(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.get(id).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// First node in document order matching the predicate
    pub fn find<F>(&self, pred: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.find_in(self.root(), pred)
    }

    /// First node below `scope` matching the predicate
    pub fn find_in<F>(&self, scope: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(scope)
            .into_iter()
            .find(|&id| pred(self.get(id)))
    }

    /// All nodes in document order matching the predicate
    pub fn find_all<F>(&self, pred: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.find_all_in(self.root(), pred)
    }

    /// All nodes below `scope` matching the predicate
    pub fn find_all_in<F>(&self, scope: NodeId, pred: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| pred(self.get(id)))
            .collect()
    }

    /// Look up a node by its id attribute
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.find(|n| n.id == id)
    }
}
