//! # Edit Events
//!
//! Documents announce every completed mutation to their observers.
//!
//! An event names what happened (`action`) and to which file (`subject`).
//! What a subscriber does with it, such as writing an audit trail or
//! refreshing a view, is outside the editor. Any `FnMut(&EditEvent)`
//! closure is an observer:
//!
//! ```rust,ignore
//! let mut doc = TextDocument::new("notes.txt");
//! let id = doc.attach(|event: &EditEvent| println!("{}", event.action));
//! doc.append("hello")?;
//! doc.detach(id);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Category of an event. Only edits are reported today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Edit,
}

/// The operation that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditAction {
    Append,
    Insert,
    Delete,
    Replace,
    InsertBefore,
    AppendChild,
    EditId,
    EditText,
    DeleteElement,
    Undo,
    Redo,
}

impl EditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditAction::Append => "append",
            EditAction::Insert => "insert",
            EditAction::Delete => "delete",
            EditAction::Replace => "replace",
            EditAction::InsertBefore => "insert-before",
            EditAction::AppendChild => "append-child",
            EditAction::EditId => "edit-id",
            EditAction::EditText => "edit-text",
            EditAction::DeleteElement => "delete-element",
            EditAction::Undo => "undo",
            EditAction::Redo => "redo",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(kind, action, subject)` record sent after a mutation completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditEvent {
    pub kind: EventKind,
    pub action: EditAction,
    pub subject: PathBuf,
}

impl EditEvent {
    pub fn edit(action: EditAction, subject: impl AsRef<Path>) -> Self {
        Self {
            kind: EventKind::Edit,
            action,
            subject: subject.as_ref().to_path_buf(),
        }
    }
}

/// Receiver of edit events
pub trait Observer {
    fn on_event(&mut self, event: &EditEvent);
}

impl<F> Observer for F
where
    F: FnMut(&EditEvent),
{
    fn on_event(&mut self, event: &EditEvent) {
        self(event)
    }
}

/// Reports every event through `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&mut self, event: &EditEvent) {
        tracing::info!(
            kind = ?event.kind,
            action = %event.action,
            subject = %event.subject.display(),
            "edit event"
        );
    }
}

/// Handle returned by [`Observers::attach`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Registered observers, notified in attachment order
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Box<dyn Observer>)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, observer: impl Observer + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Returns false when `id` was not attached
    pub fn detach(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, event: &EditEvent) {
        for (_, observer) in &mut self.entries {
            observer.on_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("attached", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_attach_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();

        let first = Rc::clone(&seen);
        observers.attach(move |e: &EditEvent| first.borrow_mut().push(format!("a:{}", e.action)));
        let second = Rc::clone(&seen);
        observers.attach(move |e: &EditEvent| second.borrow_mut().push(format!("b:{}", e.action)));

        observers.notify(&EditEvent::edit(EditAction::Insert, "notes.txt"));
        assert_eq!(*seen.borrow(), vec!["a:insert", "b:insert"]);
    }

    #[test]
    fn test_detach() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::new();

        let counter = Rc::clone(&count);
        let id = observers.attach(move |_: &EditEvent| *counter.borrow_mut() += 1);
        observers.notify(&EditEvent::edit(EditAction::Append, "a.txt"));

        assert!(observers.detach(id));
        assert!(!observers.detach(id));
        observers.notify(&EditEvent::edit(EditAction::Append, "a.txt"));

        assert_eq!(*count.borrow(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = EditEvent::edit(EditAction::DeleteElement, "doc.xml");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "EDIT");
        assert_eq!(json["action"], "delete-element");
        assert_eq!(json["subject"], "doc.xml");
    }

    #[test]
    fn test_action_names_match_serde() {
        for action in [EditAction::InsertBefore, EditAction::EditId, EditAction::Redo] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }
}
