//! Error types for the markup parser and the element tree

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure while reading markup source.
///
/// Positions are byte offsets into the source text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed markup at {pos}: {message}")]
    Malformed { pos: usize, message: String },

    #[error("Element <{tag}> at {pos} has no id attribute")]
    MissingId { pos: usize, tag: String },

    #[error("Duplicate id '{id}' at {pos}")]
    DuplicateId { pos: usize, id: String },

    #[error("Element <{tag}> at {pos} mixes text and child elements")]
    MixedContent { pos: usize, tag: String },
}

impl ParseError {
    pub fn malformed(pos: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            pos,
            message: message.into(),
        }
    }

    pub fn missing_id(pos: usize, tag: impl Into<String>) -> Self {
        Self::MissingId {
            pos,
            tag: tag.into(),
        }
    }

    pub fn duplicate_id(pos: usize, id: impl Into<String>) -> Self {
        Self::DuplicateId { pos, id: id.into() }
    }

    pub fn mixed_content(pos: usize, tag: impl Into<String>) -> Self {
        Self::MixedContent {
            pos,
            tag: tag.into(),
        }
    }

    pub fn pos(&self) -> usize {
        match self {
            ParseError::Malformed { pos, .. }
            | ParseError::MissingId { pos, .. }
            | ParseError::DuplicateId { pos, .. }
            | ParseError::MixedContent { pos, .. } => *pos,
        }
    }

    fn label(&self) -> String {
        match self {
            ParseError::Malformed { message, .. } => message.clone(),
            ParseError::MissingId { .. } => "add an id=\"...\" attribute".to_string(),
            ParseError::DuplicateId { id, .. } => format!("'{}' is already used", id),
            ParseError::MixedContent { .. } => {
                "an element holds either text or elements".to_string()
            }
        }
    }
}

/// Violation of the element tree's structural rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Element '{id}' cannot hold both text and child elements")]
    MixedContent { id: String },

    #[error("Attaching '{id}' here would make it its own ancestor")]
    Cycle { id: String },

    #[error("Invalid tag name: '{0}'")]
    InvalidName(String),

    #[error("Element id must not be empty")]
    MissingId,
}

/// Pretty-print a parse error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    // ariadne spans count chars, error positions count bytes
    let mut byte = error.pos().min(source.len());
    while !source.is_char_boundary(byte) {
        byte -= 1;
    }
    let start = source[..byte].chars().count();
    let end = if byte < source.len() { start + 1 } else { start };

    let mut output = Vec::new();
    let report = Report::build(ReportKind::Error, filename, start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, start..end))
                .with_color(Color::Red)
                .with_message(error.label()),
        )
        .finish();

    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_positions() {
        assert_eq!(ParseError::malformed(7, "x").pos(), 7);
        assert_eq!(ParseError::missing_id(3, "a").pos(), 3);
        assert_eq!(ParseError::duplicate_id(1, "a").pos(), 1);
        assert_eq!(ParseError::mixed_content(9, "p").pos(), 9);
    }

    #[test]
    fn test_error_messages() {
        let err = ParseError::missing_id(0, "item");
        assert_eq!(err.to_string(), "Element <item> at 0 has no id attribute");

        let err = TreeError::MixedContent { id: "p1".to_string() };
        assert!(err.to_string().contains("p1"));
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_format_error_mentions_message() {
        let source = "<root>\n</root>";
        let rendered = format_error(source, "doc.xml", &ParseError::missing_id(0, "root"));
        assert!(rendered.contains("has no id attribute"));
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_format_error_after_multibyte_text() {
        let source = "<p id=\"p\">héllo wörld ✓</p>\n<q/>";
        let pos = source.find("<q").unwrap();
        let rendered = format_error(source, "doc.xml", &ParseError::missing_id(pos, "q"));
        assert!(rendered.contains("add an id"));
        // Line 2, column 1 once offsets are counted in chars
        assert!(rendered.contains("doc.xml:2:1"));
    }
}
