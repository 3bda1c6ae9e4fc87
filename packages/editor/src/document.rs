//! # Document Handle
//!
//! Editing state common to text and markup documents.
//!
//! A `Document` owns a buffer (the content), the command history for that
//! buffer, the observers to notify and a dirty flag. Content changes only
//! go through [`Document::execute`], so every change can be undone.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Undo/Redo → Serialize → mark_clean
//!   ↓      ↓         ↓           ↓
//! source Command  history     source
//! ```

use crate::errors::EditResult;
use crate::observers::{EditAction, EditEvent, Observer, ObserverId, Observers};
use crate::undo_stack::{Command, UndoStack};
use std::fmt;
use std::path::{Path, PathBuf};

/// Editable document over the buffer type targeted by `C`
pub struct Document<C: Command> {
    /// Subject path reported in edit events
    path: PathBuf,

    buffer: C::Target,

    history: UndoStack<C>,

    observers: Observers,

    /// Set by every change, cleared by `mark_clean`
    dirty: bool,
}

impl<C: Command> Document<C> {
    /// Create an empty document
    pub fn new(path: impl Into<PathBuf>) -> Self
    where
        C::Target: Default,
    {
        Self::with_buffer(path, <C::Target as Default>::default())
    }

    /// Create a document around existing content. The result is clean.
    pub fn with_buffer(path: impl Into<PathBuf>, buffer: C::Target) -> Self {
        Self {
            path: path.into(),
            buffer,
            history: UndoStack::new(),
            observers: Observers::new(),
            dirty: false,
        }
    }

    /// Bound the history to `max_levels` entries (0 = unlimited).
    /// Discards any existing history.
    pub fn with_history_limit(mut self, max_levels: usize) -> Self {
        self.history = UndoStack::with_max_levels(max_levels);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    pub fn buffer(&self) -> &C::Target {
        &self.buffer
    }

    pub fn history(&self) -> &UndoStack<C> {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current content has been saved
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Execute a command and record it for undo.
    ///
    /// On failure nothing changes: not the content, the history or the dirty flag.
    pub fn execute(&mut self, command: C) -> EditResult<()> {
        let action = command.action();
        self.history.apply(command, &mut self.buffer)?;
        self.dirty = true;
        self.emit(action);
        Ok(())
    }

    /// Undo the most recent command. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> EditResult<bool> {
        let undone = self.history.undo(&mut self.buffer)?;
        if undone {
            self.dirty = true;
            self.emit(EditAction::Undo);
        }
        Ok(undone)
    }

    /// Redo the most recently undone command. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> EditResult<bool> {
        let redone = self.history.redo(&mut self.buffer)?;
        if redone {
            self.dirty = true;
            self.emit(EditAction::Redo);
        }
        Ok(redone)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn attach(&mut self, observer: impl Observer + 'static) -> ObserverId {
        self.observers.attach(observer)
    }

    pub fn detach(&mut self, id: ObserverId) -> bool {
        self.observers.detach(id)
    }

    /// Swap in new content wholesale. History no longer applies and is dropped.
    pub(crate) fn replace_buffer(&mut self, buffer: C::Target) {
        self.buffer = buffer;
        self.history.clear();
        self.dirty = true;
    }

    fn emit(&mut self, action: EditAction) {
        let event = EditEvent::edit(action, &self.path);
        self.observers.notify(&event);
    }
}

impl<C> fmt::Debug for Document<C>
where
    C: Command,
    C::Target: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("buffer", &self.buffer)
            .field("history", &self.history)
            .field("observers", &self.observers)
            .field("dirty", &self.dirty)
            .finish()
    }
}
