//! # Element Tree
//!
//! Arena-backed element tree for markup documents.
//!
//! Nodes live in a `Vec` owned by the [`Tree`] and are addressed by
//! [`NodeId`]. A node owns its children through the ordered `children`
//! list; the `parent` field is a plain back-reference (an id, never an
//! owning handle). Detached nodes stay in the arena so they can be
//! re-attached later, which is what undoing a delete relies on.
//!
//! Content model: an element holds either non-blank text or child
//! elements, never both.

use crate::error::TreeError;
use serde::{Deserialize, Serialize};

/// Stable handle to a node inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single `name="value"` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Markup element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    tag: String,
    id: String,
    /// Insertion ordered; always contains `id`
    attributes: Vec<Attribute>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(tag: String, id: String) -> Self {
        Self {
            tag,
            attributes: vec![Attribute {
                name: "id".to_string(),
                value: id.clone(),
            }],
            id,
            text: None,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Insert or overwrite an attribute. Setting `id` renames the node;
    /// an empty `id` is ignored so every node keeps a usable id.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        if name == "id" {
            if value.is_empty() {
                return;
            }
            self.id = value.clone();
        }

        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Remove an attribute. The `id` attribute is never removed.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        if name == "id" {
            return None;
        }
        let pos = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(pos).value)
    }

    /// Rename the node, keeping the `id` attribute in sync
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.set_attribute("id", id);
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the text content.
    ///
    /// Fails when the node has children and `text` is not blank.
    pub fn set_text_content(&mut self, text: Option<String>) -> Result<(), TreeError> {
        let blank = text.as_deref().map_or(true, |t| t.trim().is_empty());
        if !self.children.is_empty() && !blank {
            return Err(TreeError::MixedContent {
                id: self.id.clone(),
            });
        }
        self.text = text;
        Ok(())
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_text_content(&self) -> bool {
        self.text.as_deref().map_or(false, |t| !t.trim().is_empty())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_mixed_content(&self) -> bool {
        self.has_text_content() && self.has_children()
    }
}

/// Arena of nodes plus the designated root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    /// Create an empty tree (no root)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree holding a single root element
    pub fn with_root(tag: impl Into<String>, id: impl Into<String>) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        let root = tree.create_node(tag, id)?;
        tree.root = Some(root);
        Ok(tree)
    }

    /// Create a detached node
    pub fn create_node(
        &mut self,
        tag: impl Into<String>,
        id: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let tag = tag.into();
        let id = id.into();

        if !is_valid_name(&tag) {
            return Err(TreeError::InvalidName(tag));
        }
        if id.is_empty() {
            return Err(TreeError::MissingId);
        }

        let node_id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(tag, id));
        Ok(node_id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `node` the root. It is detached from any parent first.
    pub fn set_root(&mut self, node: NodeId) {
        self.detach(node);
        self.root = Some(node);
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    pub fn get(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0)
    }

    /// Panics if `node` was not created by this tree
    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.0]
    }

    /// Panics if `node` was not created by this tree
    pub fn node_mut(&mut self, node: NodeId) -> &mut Node {
        &mut self.nodes[node.0]
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Position of `child` within `parent`'s children
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.node(parent).children.iter().position(|c| *c == child)
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is moved, never duplicated.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Insert `new_child` before `reference` among `parent`'s children.
    ///
    /// Falls back to appending when `reference` is not a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        reference: NodeId,
    ) -> Result<(), TreeError> {
        self.check_attach(parent, new_child)?;
        self.detach(new_child);

        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|c| *c == reference) {
            Some(index) => children.insert(index, new_child),
            None => children.push(new_child),
        }
        self.nodes[new_child.0].parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. No-op when it is not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|c| *c == child) {
            Some(index) => {
                children.remove(index);
                self.nodes[child.0].parent = None;
                true
            }
            None => false,
        }
    }

    /// Detach `node` from whatever parent holds it
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent {
            self.remove_child(parent, node);
        }
    }

    /// `node` and all nodes below it, pre-order
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        out
    }

    /// Every node reachable from the root, pre-order
    pub fn reachable(&self) -> Vec<NodeId> {
        self.root.map(|root| self.descendants(root)).unwrap_or_default()
    }

    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.node(n).parent;
        }
        false
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_node = self.node(parent);
        if parent_node.has_text_content() {
            return Err(TreeError::MixedContent {
                id: parent_node.id.clone(),
            });
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle {
                id: self.node(child).id.clone(),
            });
        }
        Ok(())
    }
}

/// Tag names: a letter or `_`, then letters, digits, `_`, `-`, `.` or `:`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
