//! Edit operations as written on the command line or in a script file
//!
//! ```text
//! append "text"                 insert-before REF TAG ID [name="value"...]
//! insert L:C "text"             append-child PARENT TAG ID [name="value"...]
//! delete L:C N                  edit-id OLD NEW
//! replace L:C N "text"          edit-text ID "text"
//! undo                          delete-element ID
//! redo
//! ```
//!
//! Double quotes group words; `\"` and `\\` escape inside quotes.

use quill_editor::{
    parse_length, EditError, MarkupCommand, NewElement, Position, TextCommand,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text(TextCommand),
    Markup(MarkupCommand),
    Undo,
    Redo,
}

impl Op {
    pub fn name(&self) -> &'static str {
        use quill_editor::Command;
        match self {
            Op::Text(command) => command.action().as_str(),
            Op::Markup(command) => command.action().as_str(),
            Op::Undo => "undo",
            Op::Redo => "redo",
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ScriptError {
    #[error("Unterminated quote in: {0}")]
    UnterminatedQuote(String),

    #[error("Empty operation")]
    Empty,

    #[error("Unknown operation '{0}'")]
    UnknownOp(String),

    #[error("Usage: {op} {usage}")]
    Usage { op: String, usage: &'static str },

    #[error("Invalid attribute '{0}', expected name=\"value\"")]
    InvalidAttribute(String),

    #[error("'{op}' cannot be applied to a {kind} document")]
    WrongKind { op: &'static str, kind: &'static str },

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Split a line into words, honoring double quotes
pub fn tokenize(line: &str) -> Result<Vec<String>, ScriptError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '\\' if quoted => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err(ScriptError::UnterminatedQuote(line.to_string())),
            },
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(ScriptError::UnterminatedQuote(line.to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse one operation
pub fn parse_op(line: &str) -> Result<Op, ScriptError> {
    let tokens = tokenize(line)?;
    let (name, args) = tokens.split_first().ok_or(ScriptError::Empty)?;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let usage = |usage: &'static str| ScriptError::Usage {
        op: name.clone(),
        usage,
    };

    let op = match name.as_str() {
        "append" => match args[..] {
            [text] => Op::Text(TextCommand::append(text)),
            _ => return Err(usage("\"text\"")),
        },
        "insert" => match args[..] {
            [at, text] => Op::Text(TextCommand::insert(at.parse::<Position>()?, text)),
            _ => return Err(usage("L:C \"text\"")),
        },
        "delete" => match args[..] {
            [at, len] => Op::Text(TextCommand::delete(at.parse()?, parse_length(len)?)),
            _ => return Err(usage("L:C N")),
        },
        "replace" => match args[..] {
            [at, len, text] => {
                Op::Text(TextCommand::replace(at.parse()?, parse_length(len)?, text))
            }
            _ => return Err(usage("L:C N \"text\"")),
        },
        "insert-before" => match args[..] {
            [reference, tag, id, ref attributes @ ..] => Op::Markup(MarkupCommand::insert_before(
                reference,
                new_element(tag, id, attributes)?,
            )),
            _ => return Err(usage("REF TAG ID [name=\"value\"...]")),
        },
        "append-child" => match args[..] {
            [parent, tag, id, ref attributes @ ..] => Op::Markup(MarkupCommand::append_child(
                parent,
                new_element(tag, id, attributes)?,
            )),
            _ => return Err(usage("PARENT TAG ID [name=\"value\"...]")),
        },
        "edit-id" => match args[..] {
            [old, new] => Op::Markup(MarkupCommand::edit_id(old, new)),
            _ => return Err(usage("OLD NEW")),
        },
        "edit-text" => match args[..] {
            [id, text] => Op::Markup(MarkupCommand::edit_text(id, text)),
            _ => return Err(usage("ID \"text\"")),
        },
        "delete-element" => match args[..] {
            [id] => Op::Markup(MarkupCommand::delete_element(id)),
            _ => return Err(usage("ID")),
        },
        "undo" if args.is_empty() => Op::Undo,
        "redo" if args.is_empty() => Op::Redo,
        "undo" | "redo" => return Err(usage("(no arguments)")),
        other => return Err(ScriptError::UnknownOp(other.to_string())),
    };
    Ok(op)
}

/// Non-blank lines of a script that are not `#` comments, with their line numbers
pub fn script_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn new_element(tag: &str, id: &str, attributes: &[&str]) -> Result<NewElement, ScriptError> {
    attributes
        .iter()
        .try_fold(NewElement::new(tag, id), |element, attribute| {
            match attribute.split_once('=') {
                Some((name, value)) if !name.is_empty() => {
                    Ok(element.with_attribute(name, value))
                }
                _ => Err(ScriptError::InvalidAttribute(attribute.to_string())),
            }
        })
}
