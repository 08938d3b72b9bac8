/// Backtick code fences. MDX exports only ever use backticks, so tildes are
/// treated as ordinary paragraph text.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";

    /// Whether a line body opens or closes a fenced code block.
    pub fn is_fence(body: &str) -> bool {
        body.starts_with(Self::BACKTICKS)
    }
}

/// The YAML frontmatter delimiter, only honoured on the first line.
pub struct Frontmatter;

impl Frontmatter {
    pub const DELIMITER: &'static str = "---";

    pub fn is_delimiter(body: &str) -> bool {
        body == Self::DELIMITER
    }
}
