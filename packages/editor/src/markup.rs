//! # Markup Documents
//!
//! An element tree plus an index from element id to node.
//!
//! Between commands the index holds exactly the ids of the nodes reachable
//! from the root. Only two things write to it: a full rebuild when the tree
//! is replaced, and [`MarkupBuffer::update_id_mapping`], which commands call
//! around each structural change.

use crate::document::Document;
use crate::errors::{EditError, EditResult};
use crate::markup_commands::{MarkupCommand, NewElement};
use quill_parser::{outline, parse, Node, NodeId, Serializer, Tree};
use std::collections::HashMap;
use std::path::PathBuf;

/// Element tree with an id index
#[derive(Debug, Clone, Default)]
pub struct MarkupBuffer {
    tree: Tree,
    id_index: HashMap<String, NodeId>,
}

impl MarkupBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a tree, indexing every reachable element
    pub fn from_tree(tree: Tree) -> EditResult<Self> {
        let id_index = build_index(&tree)?;
        Ok(Self { tree, id_index })
    }

    pub fn from_source(source: &str) -> EditResult<Self> {
        Self::from_tree(parse(source)?)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    /// Replace the tree wholesale and rebuild the index.
    /// On failure the buffer is unchanged.
    pub fn set_root(&mut self, tree: Tree) -> EditResult<()> {
        let id_index = build_index(&tree)?;
        tracing::debug!(elements = id_index.len(), "replaced element tree");
        self.tree = tree;
        self.id_index = id_index;
        Ok(())
    }

    /// O(1) lookup; `None` when no reachable element has this id
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Element lookup that fails with `ElementNotFound`
    pub fn require(&self, id: &str) -> EditResult<NodeId> {
        self.element_by_id(id)
            .ok_or_else(|| EditError::ElementNotFound(id.to_string()))
    }

    pub fn node(&self, node: NodeId) -> &Node {
        self.tree.node(node)
    }

    /// Remove `old_id` (no-op if absent), then map `new` (overwriting)
    pub fn update_id_mapping(&mut self, old_id: Option<&str>, new: Option<(&str, NodeId)>) {
        if let Some(old_id) = old_id {
            if self.id_index.remove(old_id).is_some() {
                tracing::trace!(id = old_id, "unindexed element");
            }
        }
        if let Some((new_id, node)) = new {
            self.id_index.insert(new_id.to_string(), node);
            tracing::trace!(id = new_id, node = node.index(), "indexed element");
        }
    }

    /// Ids currently in the index, in no particular order
    pub fn indexed_ids(&self) -> impl Iterator<Item = &str> {
        self.id_index.keys().map(String::as_str)
    }

    /// Whether the index matches the ids reachable from the root
    pub fn is_index_consistent(&self) -> bool {
        let reachable = self.tree.reachable();
        reachable.len() == self.id_index.len()
            && reachable.iter().all(|node| {
                self.id_index.get(self.tree.node(*node).id()) == Some(node)
            })
    }

    pub fn to_source(&self) -> String {
        Serializer::new().serialize(&self.tree)
    }

    pub fn to_source_with(&self, serializer: &mut Serializer) -> String {
        serializer.serialize(&self.tree)
    }

    /// Root carries `log="true"`
    pub fn log_requested(&self) -> bool {
        self.root()
            .and_then(|root| self.node(root).attribute("log"))
            .map_or(false, |value| value == "true")
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Index `node` and everything below it
    pub(crate) fn index_subtree(&mut self, node: NodeId) {
        for n in self.tree.descendants(node) {
            let id = self.tree.node(n).id().to_string();
            self.update_id_mapping(None, Some((&id, n)));
        }
    }

    /// Drop `node` and everything below it from the index
    pub(crate) fn unindex_subtree(&mut self, node: NodeId) {
        for n in self.tree.descendants(node) {
            let id = self.tree.node(n).id().to_string();
            self.update_id_mapping(Some(&id), None);
        }
    }
}

fn build_index(tree: &Tree) -> EditResult<HashMap<String, NodeId>> {
    let mut index = HashMap::new();
    for node in tree.reachable() {
        let id = tree.node(node).id();
        if index.insert(id.to_string(), node).is_some() {
            return Err(EditError::DuplicateId(id.to_string()));
        }
    }
    Ok(index)
}

/// Markup document with undo/redo
pub type MarkupDocument = Document<MarkupCommand>;

impl Document<MarkupCommand> {
    /// Parse `source` into a clean document
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> EditResult<Self> {
        Ok(Self::with_buffer(path, MarkupBuffer::from_source(source)?))
    }

    pub fn to_source(&self) -> String {
        self.buffer().to_source()
    }

    pub fn tree(&self) -> &Tree {
        self.buffer().tree()
    }

    /// Box-drawing outline of the tree
    pub fn outline(&self) -> String {
        outline(self.buffer().tree())
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Node> {
        self.buffer()
            .element_by_id(id)
            .map(|node| self.buffer().node(node))
    }

    pub fn log_requested(&self) -> bool {
        self.buffer().log_requested()
    }

    /// Replace the tree wholesale. Clears the history.
    pub fn set_root(&mut self, tree: Tree) -> EditResult<()> {
        let buffer = MarkupBuffer::from_tree(tree)?;
        self.replace_buffer(buffer);
        Ok(())
    }

    pub fn insert_before(&mut self, reference_id: &str, element: NewElement) -> EditResult<()> {
        self.execute(MarkupCommand::insert_before(reference_id, element))
    }

    pub fn append_child(&mut self, parent_id: &str, element: NewElement) -> EditResult<()> {
        self.execute(MarkupCommand::append_child(parent_id, element))
    }

    pub fn edit_id(&mut self, old_id: &str, new_id: &str) -> EditResult<()> {
        self.execute(MarkupCommand::edit_id(old_id, new_id))
    }

    pub fn edit_text(&mut self, id: &str, text: impl Into<String>) -> EditResult<()> {
        self.execute(MarkupCommand::edit_text(id, text))
    }

    pub fn delete_element(&mut self, id: &str) -> EditResult<()> {
        self.execute(MarkupCommand::delete_element(id))
    }
}
