//! # Text Documents
//!
//! Line-oriented buffers addressed by 1-based line and column.
//!
//! Columns count characters, not bytes. Lines never contain line
//! terminators; text passed to an edit must not either.

use crate::document::Document;
use crate::errors::{EditError, EditResult};
use crate::position::{Position, ShowRange};
use crate::text_commands::TextCommand;
use std::path::PathBuf;

/// Ordered sequence of lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from pre-split lines
    pub fn from_lines<I, S>(lines: I) -> EditResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .map(|line| {
                let line = line.into();
                check_single_line(&line)?;
                Ok(line)
            })
            .collect::<EditResult<Vec<_>>>()?;
        Ok(Self { lines })
    }

    /// Split `source` on `\r\n`, `\n` or a lone `\r`. A final terminator
    /// does not start another line.
    pub fn from_source(source: &str) -> Self {
        let mut lines: Vec<String> = source
            .split("\r\n")
            .flat_map(|chunk| chunk.split(['\n', '\r']))
            .map(str::to_string)
            .collect();
        if lines.last().map_or(false, String::is_empty) {
            lines.pop();
        }
        Self { lines }
    }

    /// Lines joined with `\n`, with a trailing newline when non-empty
    pub fn to_source(&self) -> String {
        let mut out = self.lines.join("\n");
        if !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 1-based line lookup
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First line reads `# log`
    pub fn log_requested(&self) -> bool {
        self.line(1).map_or(false, |first| first.trim() == "# log")
    }

    /// Add `text` as a new final line
    pub fn append(&mut self, text: &str) -> EditResult<()> {
        check_single_line(text)?;
        self.lines.push(text.to_string());
        Ok(())
    }

    /// Insert `text` at `col` of `line`.
    ///
    /// `line = line_count + 1` appends `text` as a new line, which starts
    /// out empty, so `col` must be 1 there.
    pub fn insert(&mut self, line: usize, col: usize, text: &str) -> EditResult<()> {
        check_single_line(text)?;
        let count = self.lines.len();
        if line < 1 || line > count + 1 {
            return Err(EditError::line(line, count + 1));
        }
        if line == count + 1 {
            byte_offset("", col)?;
            self.lines.push(text.to_string());
            return Ok(());
        }

        let target = &mut self.lines[line - 1];
        let at = byte_offset(target, col)?;
        target.insert_str(at, text);
        Ok(())
    }

    /// Remove up to `len` characters at `col` of `line`, clipped to the end of the line
    pub fn delete(&mut self, line: usize, col: usize, len: usize) -> EditResult<()> {
        let (start, end) = self.span(line, col, len)?;
        self.lines[line - 1].replace_range(start..end, "");
        Ok(())
    }

    /// `delete(line, col, len)` followed by `insert(line, col, text)`
    pub fn replace(&mut self, line: usize, col: usize, len: usize, text: &str) -> EditResult<()> {
        check_single_line(text)?;
        // Validate the anchor before mutating anything
        self.span(line, col, len)?;
        self.delete(line, col, len)?;
        self.insert(line, col, text)
    }

    /// The characters `delete(line, col, len)` would remove
    pub fn slice(&self, line: usize, col: usize, len: usize) -> EditResult<&str> {
        let (start, end) = self.span(line, col, len)?;
        Ok(&self.lines[line - 1][start..end])
    }

    /// Lazy `"{n}: {line}"` rows for the inclusive range, clamped to the buffer
    pub fn show(&self, range: ShowRange) -> ShowRows<'_> {
        let count = self.lines.len();
        let start = range.start.max(1);
        let end = range.end.map_or(count, |end| end.min(count));
        ShowRows {
            lines: &self.lines,
            next: start,
            end,
        }
    }

    /// Remove line `line` entirely
    pub(crate) fn remove_line(&mut self, line: usize) -> EditResult<String> {
        let count = self.lines.len();
        if line < 1 || line > count {
            return Err(EditError::line(line, count));
        }
        Ok(self.lines.remove(line - 1))
    }

    /// Byte range of the clipped character span starting at `col`
    fn span(&self, line: usize, col: usize, len: usize) -> EditResult<(usize, usize)> {
        let count = self.lines.len();
        if line < 1 || line > count {
            return Err(EditError::line(line, count));
        }
        let text = &self.lines[line - 1];
        let start = byte_offset(text, col)?;
        let end = text[start..]
            .char_indices()
            .nth(len)
            .map_or(text.len(), |(i, _)| start + i);
        Ok((start, end))
    }
}

/// Byte offset of 1-based character column `col`; `len + 1` is the end of the line
fn byte_offset(text: &str, col: usize) -> EditResult<usize> {
    let chars = text.chars().count();
    if col < 1 || col > chars + 1 {
        return Err(EditError::column(col, chars + 1));
    }
    Ok(text
        .char_indices()
        .nth(col - 1)
        .map_or(text.len(), |(i, _)| i))
}

fn check_single_line(text: &str) -> EditResult<()> {
    if text.contains(['\n', '\r']) {
        return Err(EditError::InvalidArgument(
            "text must not contain line breaks".to_string(),
        ));
    }
    Ok(())
}

/// Iterator returned by [`TextBuffer::show`]. Clone it to restart.
#[derive(Debug, Clone)]
pub struct ShowRows<'a> {
    lines: &'a [String],
    /// Next 1-based line to yield
    next: usize,
    /// Last 1-based line to yield
    end: usize,
}

impl<'a> Iterator for ShowRows<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next > self.end {
            return None;
        }
        let n = self.next;
        self.next += 1;
        Some(format!("{}: {}", n, self.lines[n - 1]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ShowRows<'_> {}

/// Text document with undo/redo
pub type TextDocument = Document<TextCommand>;

impl Document<TextCommand> {
    /// Load content from source text. The result is clean.
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Self {
        Self::with_buffer(path, TextBuffer::from_source(source))
    }

    pub fn to_source(&self) -> String {
        self.buffer().to_source()
    }

    pub fn lines(&self) -> &[String] {
        self.buffer().lines()
    }

    pub fn line_count(&self) -> usize {
        self.buffer().line_count()
    }

    pub fn log_requested(&self) -> bool {
        self.buffer().log_requested()
    }

    pub fn append(&mut self, text: impl Into<String>) -> EditResult<()> {
        self.execute(TextCommand::append(text))
    }

    pub fn insert(&mut self, at: Position, text: impl Into<String>) -> EditResult<()> {
        self.execute(TextCommand::insert(at, text))
    }

    pub fn delete(&mut self, at: Position, len: usize) -> EditResult<()> {
        self.execute(TextCommand::delete(at, len))
    }

    pub fn replace(&mut self, at: Position, len: usize, text: impl Into<String>) -> EditResult<()> {
        self.execute(TextCommand::replace(at, len, text))
    }

    pub fn show(&self, range: ShowRange) -> ShowRows<'_> {
        self.buffer().show(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> TextBuffer {
        TextBuffer::from_lines(lines.iter().copied()).unwrap()
    }

    #[test]
    fn test_insert_within_line() {
        let mut buf = buffer(&["Hello"]);
        buf.insert(1, 6, " World").unwrap();
        assert_eq!(buf.lines(), ["Hello World"]);

        buf.insert(1, 1, ">").unwrap();
        assert_eq!(buf.lines(), [">Hello World"]);
    }

    #[test]
    fn test_insert_past_last_line_appends() {
        let mut buf = buffer(&["one"]);
        buf.insert(2, 1, "two").unwrap();
        assert_eq!(buf.lines(), ["one", "two"]);
    }

    #[test]
    fn test_insert_past_last_line_checks_column() {
        let mut buf = buffer(&["abc"]);
        for col in [0, 2] {
            assert!(matches!(
                buf.insert(2, col, "x"),
                Err(EditError::OutOfRange { what: "column", max: 1, .. })
            ));
        }
        assert_eq!(buf.lines(), ["abc"]);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut buf = buffer(&["abc"]);
        assert!(matches!(
            buf.insert(0, 1, "x"),
            Err(EditError::OutOfRange { what: "line", .. })
        ));
        assert!(matches!(
            buf.insert(3, 1, "x"),
            Err(EditError::OutOfRange { what: "line", .. })
        ));
        assert!(matches!(
            buf.insert(1, 5, "x"),
            Err(EditError::OutOfRange { what: "column", .. })
        ));
        assert!(matches!(
            buf.insert(1, 0, "x"),
            Err(EditError::OutOfRange { what: "column", .. })
        ));
        assert_eq!(buf.lines(), ["abc"]);
    }

    #[test]
    fn test_line_breaks_rejected() {
        let mut buf = TextBuffer::new();
        assert!(matches!(
            buf.append("a\nb"),
            Err(EditError::InvalidArgument(_))
        ));
        assert!(TextBuffer::from_lines(["ok", "no\r"]).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_delete_clips_to_end_of_line() {
        let mut buf = buffer(&["Hello World"]);
        buf.delete(1, 1, 5).unwrap();
        assert_eq!(buf.lines(), [" World"]);

        buf.delete(1, 3, 100).unwrap();
        assert_eq!(buf.lines(), [" W"]);

        // Deleting at the end of the line removes nothing
        buf.delete(1, 3, 4).unwrap();
        assert_eq!(buf.lines(), [" W"]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut buf = buffer(&["abc"]);
        assert!(buf.delete(2, 1, 1).is_err());
        assert!(buf.delete(1, 5, 1).is_err());
        assert!(TextBuffer::new().delete(1, 1, 1).is_err());
    }

    #[test]
    fn test_replace_is_delete_then_insert() {
        let mut buf = buffer(&["Hello World"]);
        buf.replace(1, 7, 5, "Rust").unwrap();
        assert_eq!(buf.lines(), ["Hello Rust"]);

        // Length clips like delete does
        buf.replace(1, 7, 50, "there").unwrap();
        assert_eq!(buf.lines(), ["Hello there"]);
    }

    #[test]
    fn test_replace_rejects_line_breaks_without_mutating() {
        let mut buf = buffer(&["Hello"]);
        assert!(buf.replace(1, 1, 5, "a\nb").is_err());
        assert_eq!(buf.lines(), ["Hello"]);
    }

    #[test]
    fn test_columns_count_characters() {
        let mut buf = buffer(&["héllo"]);
        assert_eq!(buf.slice(1, 2, 2).unwrap(), "él");
        buf.delete(1, 2, 1).unwrap();
        assert_eq!(buf.lines(), ["hllo"]);
        buf.insert(1, 5, "ö").unwrap();
        assert_eq!(buf.lines(), ["hlloö"]);
    }

    #[test]
    fn test_show_clamps_range() {
        let buf = buffer(&["a", "b", "c"]);
        let rows: Vec<_> = buf.show(ShowRange::all()).collect();
        assert_eq!(rows, ["1: a", "2: b", "3: c"]);

        let rows: Vec<_> = buf
            .show(ShowRange {
                start: 0,
                end: Some(2),
            })
            .collect();
        assert_eq!(rows, ["1: a", "2: b"]);

        let rows: Vec<_> = buf
            .show(ShowRange {
                start: 2,
                end: Some(99),
            })
            .collect();
        assert_eq!(rows, ["2: b", "3: c"]);
    }

    #[test]
    fn test_show_empty_ranges() {
        let buf = buffer(&["a", "b"]);
        let inverted = ShowRange {
            start: 2,
            end: Some(1),
        };
        assert_eq!(buf.show(inverted).count(), 0);
        assert_eq!(TextBuffer::new().show(ShowRange::all()).count(), 0);
    }

    #[test]
    fn test_show_is_restartable() {
        let buf = buffer(&["a", "b"]);
        let rows = buf.show(ShowRange::all());
        assert_eq!(rows.len(), 2);
        let first: Vec<_> = rows.clone().collect();
        let second: Vec<_> = rows.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_source_roundtrip() {
        let buf = TextBuffer::from_source("one\r\ntwo\nthree\n");
        assert_eq!(buf.lines(), ["one", "two", "three"]);
        assert_eq!(buf.to_source(), "one\ntwo\nthree\n");
        assert_eq!(TextBuffer::new().to_source(), "");
    }

    #[test]
    fn test_log_requested_by_first_line() {
        assert!(buffer(&["  # log ", "body"]).log_requested());
        assert!(!buffer(&["body", "# log"]).log_requested());
        assert!(!buffer(&["# logging"]).log_requested());
        assert!(!TextBuffer::new().log_requested());

        let doc = TextDocument::from_source("notes.txt", "# log\nfirst\n");
        assert!(doc.log_requested());
    }

    #[test]
    fn test_lone_carriage_return_ends_a_line() {
        let buf = TextBuffer::from_source("one\rtwo\nthree\r");
        assert_eq!(buf.lines(), ["one", "two", "three"]);
        assert!(buf.lines().iter().all(|l| !l.contains(['\r', '\n'])));

        assert_eq!(TextBuffer::from_source("a\r\n\r\nb").lines(), ["a", "", "b"]);
        assert_eq!(TextBuffer::from_source("a\n\n").lines(), ["a", ""]);
        assert!(TextBuffer::from_source("").is_empty());
    }
}
