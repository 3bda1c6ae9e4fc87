//! # Text Commands
//!
//! Reversible edits of a [`TextBuffer`].
//!
//! Each variant carries its arguments plus the state captured while
//! executing, which is all undo needs:
//!
//! - `Append` needs nothing; undo drops the last line
//! - `Insert` records whether it created a new line
//! - `Delete` records the characters it displaced
//! - `Replace` records the characters it overwrote
//!
//! Undo relies on strict LIFO order: when a command is undone, every
//! command executed after it has already been undone.

use crate::errors::EditResult;
use crate::observers::EditAction;
use crate::position::Position;
use crate::text::TextBuffer;
use crate::undo_stack::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCommand {
    Append {
        text: String,
        applied: bool,
    },

    Insert {
        at: Position,
        text: String,
        /// Set on execute: true when the insert added a new last line
        created_line: Option<bool>,
    },

    Delete {
        at: Position,
        len: usize,
        displaced: Option<String>,
    },

    Replace {
        at: Position,
        len: usize,
        text: String,
        original: Option<String>,
    },
}

impl TextCommand {
    pub fn append(text: impl Into<String>) -> Self {
        TextCommand::Append {
            text: text.into(),
            applied: false,
        }
    }

    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        TextCommand::Insert {
            at,
            text: text.into(),
            created_line: None,
        }
    }

    pub fn delete(at: Position, len: usize) -> Self {
        TextCommand::Delete {
            at,
            len,
            displaced: None,
        }
    }

    pub fn replace(at: Position, len: usize, text: impl Into<String>) -> Self {
        TextCommand::Replace {
            at,
            len,
            text: text.into(),
            original: None,
        }
    }
}

impl Command for TextCommand {
    type Target = TextBuffer;

    fn execute(&mut self, buffer: &mut TextBuffer) -> EditResult<()> {
        match self {
            TextCommand::Append { text, applied } => {
                buffer.append(text)?;
                *applied = true;
            }
            TextCommand::Insert {
                at,
                text,
                created_line,
            } => {
                let creates = at.line == buffer.line_count() + 1;
                buffer.insert(at.line, at.col, text)?;
                *created_line = Some(creates);
            }
            TextCommand::Delete { at, len, displaced } => {
                let captured = buffer.slice(at.line, at.col, *len)?.to_string();
                buffer.delete(at.line, at.col, *len)?;
                *displaced = Some(captured);
            }
            TextCommand::Replace {
                at,
                len,
                text,
                original,
            } => {
                let captured = buffer.slice(at.line, at.col, *len)?.to_string();
                buffer.replace(at.line, at.col, *len, text)?;
                *original = Some(captured);
            }
        }
        Ok(())
    }

    fn undo(&mut self, buffer: &mut TextBuffer) -> EditResult<()> {
        match self {
            TextCommand::Append { .. } => {
                let last = buffer.line_count();
                buffer.remove_line(last)?;
            }
            TextCommand::Insert {
                at,
                text,
                created_line,
            } => match created_line {
                Some(true) => {
                    buffer.remove_line(at.line)?;
                }
                _ => buffer.delete(at.line, at.col, text.chars().count())?,
            },
            TextCommand::Delete { at, displaced, .. } => {
                let text = displaced.as_deref().unwrap_or_default();
                buffer.insert(at.line, at.col, text)?;
            }
            TextCommand::Replace {
                at, text, original, ..
            } => {
                let restored = original.as_deref().unwrap_or_default();
                buffer.replace(at.line, at.col, text.chars().count(), restored)?;
            }
        }
        Ok(())
    }

    fn can_undo(&self) -> bool {
        match self {
            TextCommand::Append { applied, .. } => *applied,
            TextCommand::Insert { created_line, .. } => created_line.is_some(),
            TextCommand::Delete { displaced, .. } => displaced.is_some(),
            TextCommand::Replace { original, .. } => original.is_some(),
        }
    }

    fn action(&self) -> EditAction {
        match self {
            TextCommand::Append { .. } => EditAction::Append,
            TextCommand::Insert { .. } => EditAction::Insert,
            TextCommand::Delete { .. } => EditAction::Delete,
            TextCommand::Replace { .. } => EditAction::Replace,
        }
    }
}
