//! # Quill Editor
//!
//! Document editing engine for line-oriented text and element-tree markup.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ quill-parser: markup source ⇄ element tree  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ quill-editor: Document<C>                   │
//! │  - buffer (TextBuffer / MarkupBuffer)       │
//! │  - UndoStack<C> of reversible commands      │
//! │  - observers notified after each change     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Commands are the only writers**: every change can be undone
//! 2. **No snapshots**: a command captures just what its undo needs
//! 3. **Fail without side effects**: a rejected command changes nothing
//! 4. **Index never stale**: a markup document's id index equals the set
//!    of reachable ids whenever no command is running
//!
//! ## Usage
//!
//! ### Text
//!
//! ```rust,ignore
//! use quill_editor::{Position, TextDocument};
//!
//! let mut doc = TextDocument::from_source("notes.txt", "Hello\n");
//! doc.insert(Position::new(1, 6), " World")?;
//! assert_eq!(doc.lines(), ["Hello World"]);
//! doc.undo()?;
//! ```
//!
//! ### Markup
//!
//! ```rust,ignore
//! use quill_editor::{MarkupDocument, NewElement};
//!
//! let mut doc = MarkupDocument::from_source("list.xml", r#"<list id="l"/>"#)?;
//! doc.append_child("l", NewElement::new("item", "i1"))?;
//! doc.edit_text("i1", "milk")?;
//! let source = doc.to_source();
//! ```

mod document;
mod errors;
mod markup;
mod markup_commands;
mod observers;
mod position;
mod text;
mod text_commands;
mod undo_stack;

pub use document::Document;
pub use errors::{EditError, EditResult};
pub use markup::{MarkupBuffer, MarkupDocument};
pub use markup_commands::{MarkupCommand, NewElement, Removed};
pub use observers::{
    EditAction, EditEvent, EventKind, Observer, ObserverId, Observers, TracingObserver,
};
pub use position::{parse_length, Position, ShowRange};
pub use text::{ShowRows, TextBuffer, TextDocument};
pub use text_commands::TextCommand;
pub use undo_stack::{Command, UndoStack};

// Re-export the tree types for convenience
pub use quill_parser::{Node, NodeId, Serializer, Tree};
