use serde::Serialize;

use crate::parsing::{blocks::TextBlock, rope::slice::preview};

/// Snapshot of a single block for testing.
#[derive(Debug, Serialize)]
pub struct BlockSnap {
    /// Block kind in its serialized form (`heading`, `list`, ...).
    pub kind: String,
    /// 1-based inclusive line range.
    pub lines: (usize, usize),
    /// Preview of block text (truncated for readability).
    pub text: String,
}

pub fn normalize(blocks: &[TextBlock]) -> Vec<BlockSnap> {
    blocks
        .iter()
        .map(|b| BlockSnap {
            kind: b.kind.as_str().to_string(),
            lines: (b.line_start, b.line_end),
            text: preview(&b.content, 40),
        })
        .collect()
}

/// One line per block: `kind start-end "escaped text"`.
pub fn render(blocks: &[TextBlock]) -> String {
    normalize(blocks)
        .iter()
        .map(|s| format!("{} {}-{} {:?}", s.kind, s.lines.0, s.lines.1, s.text))
        .collect::<Vec<_>>()
        .join("\n")
}
