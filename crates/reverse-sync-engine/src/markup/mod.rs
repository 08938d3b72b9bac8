//! Storage-format markup: lossless lexing, an element tree, and the
//! block-level walk used to address elements by path.

pub mod lexer;
pub mod tree;
pub mod walk;

pub use tree::{Document, Element, Node, Text, TextKind, parse_nodes};
pub use walk::{BlockSite, block_sites};
