pub mod blocks;
pub mod rope;
pub mod snapshot;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

use blocks::{BlockBuilder, LineClass, MdxLineClassifier, TextBlock};
use rope::lines_with_spans;

/// Parses an MDX document into blocks.
///
/// `parse_blocks(text).iter().map(|b| b.content.as_str()).collect::<String>() == text`
/// holds for every input.
pub fn parse_blocks(text: &str) -> Vec<TextBlock> {
    let rope = Rope::from(text);
    let classifier = MdxLineClassifier;
    let lines: Vec<LineClass> = lines_with_spans(&rope)
        .map(|lr| classifier.classify(&lr))
        .collect();

    BlockBuilder::new(&lines).finish()
}
