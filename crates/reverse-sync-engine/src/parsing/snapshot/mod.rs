//! # Snapshot Testing Support
//!
//! Utilities for testing the block parser via snapshot assertions and
//! invariant checks.
//!
//! - **`normalize`**: renders parsed blocks to a stable, line-per-block text
//!   form for `insta` string snapshots
//! - **`invariants`**: runtime checks for parser correctness (lossless
//!   concatenation, contiguous spans, consistent line numbers)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{BlockSnap, normalize, render};
