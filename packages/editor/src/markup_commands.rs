//! # Markup Commands
//!
//! Reversible structural edits of a [`MarkupBuffer`].
//!
//! Every command follows the same sequence:
//! 1. validate against the current tree and index, failing without side effects
//! 2. change the tree
//! 3. update the id index through `update_id_mapping`
//! 4. remember what undo needs
//!
//! ## Undo state
//!
//! - `InsertBefore` / `AppendChild` keep the created node, so redo re-attaches
//!   the same node instead of creating another
//! - `EditText` keeps the previous text
//! - `DeleteElement` keeps the parent and sibling index of the removed node,
//!   so undo puts it back in the same place rather than at the end
//! - `EditId` needs nothing beyond its arguments

use crate::errors::{EditError, EditResult};
use crate::markup::MarkupBuffer;
use crate::observers::EditAction;
use crate::undo_stack::Command;
use quill_parser::NodeId;

/// Description of an element to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewElement {
    pub tag: String,
    pub id: String,
    /// Extra attributes, in order; `id` is never listed here
    pub attributes: Vec<(String, String)>,
}

impl NewElement {
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: id.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute. Passing `id` sets the element id instead.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == "id" {
            self.id = value;
        } else if let Some(existing) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name, value));
        }
        self
    }
}

/// Where a deleted element used to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub node: NodeId,
    pub parent: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupCommand {
    /// Insert a new element as the preceding sibling of `reference_id`
    InsertBefore {
        reference_id: String,
        element: NewElement,
        node: Option<NodeId>,
    },

    /// Append a new element as the last child of `parent_id`
    AppendChild {
        parent_id: String,
        element: NewElement,
        node: Option<NodeId>,
    },

    EditId {
        old_id: String,
        new_id: String,
        applied: bool,
    },

    /// Replace the text content of an element
    EditText {
        id: String,
        text: String,
        previous: Option<Option<String>>,
    },

    /// Detach an element and its subtree
    DeleteElement {
        id: String,
        removed: Option<Removed>,
    },
}

impl MarkupCommand {
    pub fn insert_before(reference_id: impl Into<String>, element: NewElement) -> Self {
        MarkupCommand::InsertBefore {
            reference_id: reference_id.into(),
            element,
            node: None,
        }
    }

    pub fn append_child(parent_id: impl Into<String>, element: NewElement) -> Self {
        MarkupCommand::AppendChild {
            parent_id: parent_id.into(),
            element,
            node: None,
        }
    }

    pub fn edit_id(old_id: impl Into<String>, new_id: impl Into<String>) -> Self {
        MarkupCommand::EditId {
            old_id: old_id.into(),
            new_id: new_id.into(),
            applied: false,
        }
    }

    pub fn edit_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        MarkupCommand::EditText {
            id: id.into(),
            text: text.into(),
            previous: None,
        }
    }

    pub fn delete_element(id: impl Into<String>) -> Self {
        MarkupCommand::DeleteElement {
            id: id.into(),
            removed: None,
        }
    }
}

impl Command for MarkupCommand {
    type Target = MarkupBuffer;

    fn execute(&mut self, buffer: &mut MarkupBuffer) -> EditResult<()> {
        match self {
            MarkupCommand::InsertBefore {
                reference_id,
                element,
                node,
            } => {
                let reference = buffer.require(reference_id)?;
                let parent = buffer.tree().parent(reference).ok_or_else(|| {
                    EditError::RootViolation(format!(
                        "cannot insert a sibling before the root element '{}'",
                        reference_id
                    ))
                })?;
                check_new_element(buffer, parent, element)?;

                let created = attachable_node(buffer, element, *node)?;
                buffer.tree_mut().insert_before(parent, created, reference)?;
                buffer.index_subtree(created);
                *node = Some(created);
            }
            MarkupCommand::AppendChild {
                parent_id,
                element,
                node,
            } => {
                let parent = buffer.require(parent_id)?;
                check_new_element(buffer, parent, element)?;

                let created = attachable_node(buffer, element, *node)?;
                buffer.tree_mut().add_child(parent, created)?;
                buffer.index_subtree(created);
                *node = Some(created);
            }
            MarkupCommand::EditId {
                old_id,
                new_id,
                applied,
            } => {
                rename(buffer, old_id, new_id)?;
                *applied = true;
            }
            MarkupCommand::EditText { id, text, previous } => {
                let node = buffer.require(id)?;
                let before = buffer.node(node).text_content().map(str::to_string);
                buffer
                    .tree_mut()
                    .node_mut(node)
                    .set_text_content(Some(text.clone()))?;
                *previous = Some(before);
            }
            MarkupCommand::DeleteElement { id, removed } => {
                let node = buffer.require(id)?;
                let parent = buffer.tree().parent(node).ok_or_else(|| {
                    EditError::RootViolation(format!("cannot delete the root element '{}'", id))
                })?;
                let index = buffer.tree().index_of(parent, node).ok_or_else(|| {
                    EditError::ElementNotFound(id.clone())
                })?;

                buffer.unindex_subtree(node);
                buffer.tree_mut().remove_child(parent, node);
                *removed = Some(Removed {
                    node,
                    parent,
                    index,
                });
            }
        }
        Ok(())
    }

    fn undo(&mut self, buffer: &mut MarkupBuffer) -> EditResult<()> {
        match self {
            MarkupCommand::InsertBefore { node, .. } | MarkupCommand::AppendChild { node, .. } => {
                if let Some(created) = *node {
                    buffer.unindex_subtree(created);
                    buffer.tree_mut().detach(created);
                }
            }
            MarkupCommand::EditId { old_id, new_id, .. } => {
                rename(buffer, new_id, old_id)?;
            }
            MarkupCommand::EditText { id, previous, .. } => {
                if let Some(before) = previous {
                    let node = buffer.require(id)?;
                    buffer
                        .tree_mut()
                        .node_mut(node)
                        .set_text_content(before.clone())?;
                }
            }
            MarkupCommand::DeleteElement { removed, .. } => {
                if let Some(Removed {
                    node,
                    parent,
                    index,
                }) = *removed
                {
                    let tree = buffer.tree_mut();
                    let sibling = tree.children(parent).get(index).copied();
                    match sibling {
                        Some(sibling) => tree.insert_before(parent, node, sibling)?,
                        None => tree.add_child(parent, node)?,
                    }
                    buffer.index_subtree(node);
                }
            }
        }
        Ok(())
    }

    fn can_undo(&self) -> bool {
        match self {
            MarkupCommand::InsertBefore { node, .. } | MarkupCommand::AppendChild { node, .. } => {
                node.is_some()
            }
            MarkupCommand::EditId { applied, .. } => *applied,
            MarkupCommand::EditText { previous, .. } => previous.is_some(),
            MarkupCommand::DeleteElement { removed, .. } => removed.is_some(),
        }
    }

    fn action(&self) -> EditAction {
        match self {
            MarkupCommand::InsertBefore { .. } => EditAction::InsertBefore,
            MarkupCommand::AppendChild { .. } => EditAction::AppendChild,
            MarkupCommand::EditId { .. } => EditAction::EditId,
            MarkupCommand::EditText { .. } => EditAction::EditText,
            MarkupCommand::DeleteElement { .. } => EditAction::DeleteElement,
        }
    }
}

/// The new element's id must be free and its parent must not hold text
fn check_new_element(buffer: &MarkupBuffer, parent: NodeId, element: &NewElement) -> EditResult<()> {
    if element.id.is_empty() {
        return Err(EditError::MissingId);
    }
    if buffer.element_by_id(&element.id).is_some() {
        return Err(EditError::DuplicateId(element.id.clone()));
    }
    let parent_node = buffer.node(parent);
    if parent_node.has_text_content() {
        return Err(EditError::MixedContent(parent_node.id().to_string()));
    }
    Ok(())
}

/// The node created by an earlier execute, or a fresh detached one
fn attachable_node(
    buffer: &mut MarkupBuffer,
    element: &NewElement,
    existing: Option<NodeId>,
) -> EditResult<NodeId> {
    if let Some(node) = existing {
        return Ok(node);
    }
    let tree = buffer.tree_mut();
    let node = tree.create_node(element.tag.as_str(), element.id.as_str())?;
    let created = tree.node_mut(node);
    for (name, value) in &element.attributes {
        created.set_attribute(name.as_str(), value.as_str());
    }
    Ok(node)
}

/// Move the index entry first, then relabel the node
fn rename(buffer: &mut MarkupBuffer, from: &str, to: &str) -> EditResult<()> {
    let node = buffer.require(from)?;
    if to.is_empty() {
        return Err(EditError::MissingId);
    }
    if to != from && buffer.element_by_id(to).is_some() {
        return Err(EditError::DuplicateId(to.to_string()));
    }

    buffer.update_id_mapping(Some(from), Some((to, node)));
    buffer.tree_mut().node_mut(node).set_id(to);
    Ok(())
}
