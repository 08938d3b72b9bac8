//! # Block Parsing
//!
//! Splits an MDX document into an ordered sequence of typed [`TextBlock`]s.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` holding local facts (blank, which block it would open,
//!    whether it continues a list).
//!
//! 2. **Block Construction** (`builder`): a `BlockBuilder` walks the classified
//!    lines with a cursor and greedily groups them into blocks.
//!
//! ## Modules
//!
//! - **`types`**: `TextBlock` and `BlockKind`
//! - **`kinds`**: per-syntax detectors (code fences, frontmatter, list markers)
//! - **`classify`**: `MdxLineClassifier`
//! - **`builder`**: `BlockBuilder`
//!
//! ## Key Invariants
//!
//! - Lossless: concatenating every block's `content` reproduces the source.
//! - No normalization happens here; blocks carry raw source text.

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod types;

pub use builder::BlockBuilder;
pub use classify::{LineClass, MdxLineClassifier, Opener};
pub use kinds::{ListMarker, MarkerKind};
pub use types::{BlockKind, TextBlock};
