//! Loading and saving documents on disk

use crate::config::Config;
use crate::script::{Op, ScriptError};
use anyhow::{anyhow, Context, Result};
use quill_editor::{EditError, MarkupDocument, TextDocument, TracingObserver};
use quill_parser::format_error;
use std::fs;
use std::path::Path;

/// A document opened from disk, typed by its extension
#[derive(Debug)]
pub enum OpenDocument {
    Text(TextDocument),
    Markup(MarkupDocument),
}

impl OpenDocument {
    pub fn load(path: &Path, config: &Config) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        Self::from_source(path, &source, config)
    }

    pub fn from_source(path: &Path, source: &str, config: &Config) -> Result<Self> {
        let document = if config.is_markup(path) {
            let doc = MarkupDocument::from_source(path, source).map_err(|e| match e {
                EditError::Parse(err) => {
                    anyhow!(format_error(source, &path.display().to_string(), &err))
                }
                other => anyhow!(other),
            })?;
            OpenDocument::Markup(doc.with_history_limit(config.max_undo_levels))
        } else {
            let doc = TextDocument::from_source(path, source);
            OpenDocument::Text(doc.with_history_limit(config.max_undo_levels))
        };
        tracing::debug!(path = %path.display(), kind = document.kind(), "opened document");
        Ok(document)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OpenDocument::Text(_) => "text",
            OpenDocument::Markup(_) => "markup",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            OpenDocument::Text(doc) => doc.path(),
            OpenDocument::Markup(doc) => doc.path(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        match self {
            OpenDocument::Text(doc) => doc.is_dirty(),
            OpenDocument::Markup(doc) => doc.is_dirty(),
        }
    }

    /// Attach a [`TracingObserver`] when forced or when the file asks for it:
    /// a `# log` first line for text, `log="true"` on the root for markup.
    /// Returns whether one was attached.
    pub fn attach_logging(&mut self, force: bool) -> bool {
        match self {
            OpenDocument::Text(doc) if force || doc.log_requested() => {
                doc.attach(TracingObserver);
                true
            }
            OpenDocument::Markup(doc) if force || doc.log_requested() => {
                doc.attach(TracingObserver);
                true
            }
            _ => false,
        }
    }

    /// Apply one operation. Returns false when an undo/redo had nothing to do.
    pub fn apply(&mut self, op: Op) -> Result<bool, ScriptError> {
        let applied = match (self, op) {
            (OpenDocument::Text(doc), Op::Text(command)) => doc.execute(command).map(|_| true)?,
            (OpenDocument::Markup(doc), Op::Markup(command)) => {
                doc.execute(command).map(|_| true)?
            }
            (OpenDocument::Text(doc), Op::Undo) => doc.undo()?,
            (OpenDocument::Markup(doc), Op::Undo) => doc.undo()?,
            (OpenDocument::Text(doc), Op::Redo) => doc.redo()?,
            (OpenDocument::Markup(doc), Op::Redo) => doc.redo()?,
            (OpenDocument::Text(_), op) => {
                return Err(ScriptError::WrongKind {
                    op: op.name(),
                    kind: "text",
                })
            }
            (OpenDocument::Markup(_), op) => {
                return Err(ScriptError::WrongKind {
                    op: op.name(),
                    kind: "markup",
                })
            }
        };
        Ok(applied)
    }

    /// Current content in its on-disk format
    pub fn render(&self, config: &Config) -> String {
        match self {
            OpenDocument::Text(doc) => doc.to_source(),
            OpenDocument::Markup(doc) => doc.buffer().to_source_with(&mut config.serializer()),
        }
    }

    pub fn save(&mut self, config: &Config) -> Result<()> {
        let output = self.render(config);
        fs::write(self.path(), output)
            .with_context(|| format!("Cannot write {}", self.path().display()))?;

        match self {
            OpenDocument::Text(doc) => doc.mark_clean(),
            OpenDocument::Markup(doc) => doc.mark_clean(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_op;

    #[test]
    fn test_kind_follows_extension() {
        let config = Config::default();
        let doc = OpenDocument::from_source(Path::new("a.txt"), "x", &config).unwrap();
        assert_eq!(doc.kind(), "text");
        let doc =
            OpenDocument::from_source(Path::new("a.xml"), r#"<a id="a"/>"#, &config).unwrap();
        assert_eq!(doc.kind(), "markup");
    }

    #[test]
    fn test_parse_error_is_reported_with_context() {
        let config = Config::default();
        let err = OpenDocument::from_source(Path::new("bad.xml"), "<a>\n</a>", &config)
            .unwrap_err()
            .to_string();
        assert!(err.contains("has no id attribute"));
        assert!(err.contains("bad.xml"));
    }

    #[test]
    fn test_wrong_kind_operation() {
        let config = Config::default();
        let mut doc = OpenDocument::from_source(Path::new("a.txt"), "x", &config).unwrap();
        let err = doc.apply(parse_op("delete-element a").unwrap()).unwrap_err();
        assert!(matches!(err, ScriptError::WrongKind { kind: "text", .. }));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_markup_logging_requested_by_root() {
        let config = Config::default();
        let mut doc =
            OpenDocument::from_source(Path::new("a.xml"), r#"<a id="a" log="true"/>"#, &config)
                .unwrap();
        assert!(doc.attach_logging(false));

        let mut doc = OpenDocument::from_source(Path::new("a.txt"), "x", &config).unwrap();
        assert!(!doc.attach_logging(false));
        assert!(doc.attach_logging(true));
    }

    #[test]
    fn test_text_logging_requested_by_first_line() {
        let config = Config::default();
        let mut doc =
            OpenDocument::from_source(Path::new("notes.txt"), "# log\nmilk\n", &config).unwrap();
        assert!(doc.attach_logging(false));

        let mut doc =
            OpenDocument::from_source(Path::new("notes.txt"), "milk\n# log\n", &config).unwrap();
        assert!(!doc.attach_logging(false));
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.xml");
        fs::write(&path, r#"<list id="l"><item id="i1">milk</item></list>"#).unwrap();

        let config: Config = serde_json::from_str(r#"{ "indent": "\t" }"#).unwrap();
        let mut doc = OpenDocument::load(&path, &config).unwrap();
        doc.apply(parse_op(r#"append-child l item i2 qty="2""#).unwrap())
            .unwrap();
        assert!(doc.is_dirty());
        doc.save(&config).unwrap();
        assert!(!doc.is_dirty());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n\t<item id=\"i2\" qty=\"2\"/>\n"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OpenDocument::load(&dir.path().join("nope.txt"), &Config::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("Cannot read"));
    }
}
