//! Error types for the editor

use quill_parser::{ParseError, TreeError};
use thiserror::Error;

pub type EditResult<T> = Result<T, EditError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("{what} {value} is out of range (valid: 1..={max})")]
    OutOfRange {
        what: &'static str,
        value: usize,
        max: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Element '{0}' cannot hold both text and child elements")]
    MixedContent(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Element id must not be empty")]
    MissingId,

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Root violation: {0}")]
    RootViolation(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl EditError {
    pub(crate) fn line(value: usize, max: usize) -> Self {
        EditError::OutOfRange {
            what: "line",
            value,
            max,
        }
    }

    pub(crate) fn column(value: usize, max: usize) -> Self {
        EditError::OutOfRange {
            what: "column",
            value,
            max,
        }
    }
}

impl From<TreeError> for EditError {
    fn from(e: TreeError) -> Self {
        match e {
            TreeError::MixedContent { id } => EditError::MixedContent(id),
            TreeError::MissingId => EditError::MissingId,
            other => EditError::InvalidArgument(other.to_string()),
        }
    }
}
