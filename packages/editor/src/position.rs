//! Parsing of the positional tokens callers pass to text edits:
//! `line:col`, `start:end` and lengths

use crate::errors::{EditError, EditResult};
use std::fmt;
use std::str::FromStr;

/// 1-based `line:col` anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl FromStr for Position {
    type Err = EditError;

    fn from_str(s: &str) -> EditResult<Self> {
        let (line, col) = split_pair(s, "line:col")?;
        Ok(Position {
            line: parse_index(line, s)?,
            col: parse_index(col, s)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Inclusive line range for `show`. `end = None` means "to the last line".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShowRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl ShowRange {
    /// Every line of the document
    pub fn all() -> Self {
        Self {
            start: 1,
            end: None,
        }
    }
}

impl Default for ShowRange {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for ShowRange {
    type Err = EditError;

    /// `start:end`; a start below 1 is clamped, a negative end means "to end"
    fn from_str(s: &str) -> EditResult<Self> {
        let (start, end) = split_pair(s, "start:end")?;
        let start = parse_signed(start, s)?;
        let end = parse_signed(end, s)?;

        Ok(ShowRange {
            start: usize::try_from(start.max(1)).unwrap_or(1),
            end: usize::try_from(end).ok(),
        })
    }
}

/// Parse a character count, rejecting negative values
pub fn parse_length(s: &str) -> EditResult<usize> {
    let value = parse_signed(s, s)?;
    usize::try_from(value)
        .map_err(|_| EditError::InvalidArgument(format!("length must not be negative: {}", s)))
}

fn split_pair<'a>(s: &'a str, shape: &str) -> EditResult<(&'a str, &'a str)> {
    s.trim().split_once(':').ok_or_else(|| {
        EditError::InvalidArgument(format!("expected {}, got '{}'", shape, s))
    })
}

/// Negative indices read as 0, which every edit rejects as out of range
fn parse_index(part: &str, token: &str) -> EditResult<usize> {
    let value: i64 = part
        .trim()
        .parse()
        .map_err(|_| EditError::InvalidArgument(format!("malformed position token '{}'", token)))?;
    Ok(usize::try_from(value).unwrap_or(0))
}

fn parse_signed(part: &str, token: &str) -> EditResult<i64> {
    part.trim()
        .parse()
        .map_err(|_| EditError::InvalidArgument(format!("malformed number '{}'", token)))
}
