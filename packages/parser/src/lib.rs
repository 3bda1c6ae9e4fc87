//! # Quill Parser
//!
//! Element tree model and codec for the Quill markup dialect: elements,
//! attributes, flat text content and a mandatory unique `id` per element.
//!
//! ```rust,ignore
//! use quill_parser::{parse, serialize};
//!
//! let tree = parse(r#"<list id="l"><item id="i1">milk</item></list>"#)?;
//! let source = serialize(&tree);
//! ```

pub mod error;
pub mod outline;
pub mod parser;
pub mod serializer;
pub mod tokenizer;
pub mod tree;

pub use error::{ParseError, ParseResult, TreeError};
pub use outline::outline;
pub use parser::{parse, Parser};
pub use serializer::{escape, serialize, unescape, Serializer, XML_HEADER};
pub use tree::{Attribute, Node, NodeId, Tree};

#[cfg(feature = "pretty-errors")]
pub use error::format_error;
