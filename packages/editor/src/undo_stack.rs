//! # Undo/Redo Stack
//!
//! Linear command history shared by both document kinds.
//!
//! ## Design
//!
//! - A command captures whatever it needs to reverse itself while executing
//! - Undo reverses the most recent command and moves it to the redo stack
//! - Redo executes the command again and moves it back
//! - Executing a new command clears the redo stack
//! - A failed execute leaves both stacks untouched
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut buffer = TextBuffer::new();
//!
//! stack.apply(TextCommand::append("hello"), &mut buffer)?;
//! stack.undo(&mut buffer)?;
//! stack.redo(&mut buffer)?;
//! ```

use crate::errors::EditResult;
use crate::observers::EditAction;
use std::collections::VecDeque;
use std::fmt;

/// A reversible operation against a `Target`
pub trait Command: fmt::Debug {
    type Target;

    /// Apply the forward effect, capturing the state `undo` will need.
    /// Must leave `target` unchanged when it fails.
    fn execute(&mut self, target: &mut Self::Target) -> EditResult<()>;

    /// Restore the state from before the last `execute`
    fn undo(&mut self, target: &mut Self::Target) -> EditResult<()>;

    /// Whether enough state has been captured to undo
    fn can_undo(&self) -> bool;

    fn action(&self) -> EditAction;
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack<C> {
    /// Applied commands (most recent last)
    undo_stack: VecDeque<C>,

    /// Undone commands (most recent last)
    redo_stack: Vec<C>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl<C: Command> UndoStack<C> {
    /// Create an unlimited undo stack
    pub fn new() -> Self {
        Self::with_max_levels(0)
    }

    /// Create an undo stack that keeps at most `max_levels` entries
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Execute a command and record it for undo
    pub fn apply(&mut self, mut command: C, target: &mut C::Target) -> EditResult<()> {
        command.execute(target)?;
        tracing::debug!(action = %command.action(), "executed command");

        self.undo_stack.push_back(command);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            if let Some(dropped) = self.undo_stack.pop_front() {
                tracing::warn!(
                    action = %dropped.action(),
                    max_levels = self.max_levels,
                    "undo history full, dropping oldest entry"
                );
            }
        }

        // New action invalidates the future
        self.redo_stack.clear();

        Ok(())
    }

    /// Undo the most recent command. Returns false when there is nothing to undo.
    ///
    /// A command that fails to undo stays on the undo stack.
    pub fn undo(&mut self, target: &mut C::Target) -> EditResult<bool> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if !command.can_undo() {
            self.undo_stack.push_back(command);
            return Ok(false);
        }

        if let Err(e) = command.undo(target) {
            self.undo_stack.push_back(command);
            return Err(e);
        }
        tracing::debug!(action = %command.action(), "undid command");

        self.redo_stack.push(command);
        Ok(true)
    }

    /// Redo the most recently undone command. Returns false when there is nothing to redo.
    pub fn redo(&mut self, target: &mut C::Target) -> EditResult<bool> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };

        if let Err(e) = command.execute(target) {
            self.redo_stack.push(command);
            return Err(e);
        }
        tracing::debug!(action = %command.action(), "redid command");

        self.undo_stack.push_back(command);
        Ok(true)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.undo_stack.back().map_or(false, C::can_undo)
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Action name of the next undo operation
    pub fn undo_description(&self) -> Option<&'static str> {
        self.undo_stack.back().map(|c| c.action().as_str())
    }

    /// Action name of the next redo operation
    pub fn redo_description(&self) -> Option<&'static str> {
        self.redo_stack.last().map(|c| c.action().as_str())
    }
}

impl<C: Command> Default for UndoStack<C> {
    fn default() -> Self {
        Self::new()
    }
}
