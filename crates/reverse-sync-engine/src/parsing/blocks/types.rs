use serde::Serialize;

use crate::parsing::rope::span::Span;

/// The kind of a top-level text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// YAML frontmatter between `---` fences at the very start of the document.
    Frontmatter,
    /// A single `import ...` line.
    Import,
    /// A single `#`-prefixed line.
    Heading,
    /// Fallback block: consecutive non-blank lines.
    Paragraph,
    /// Bullet or numbered items plus their indented continuations.
    List,
    /// A fenced code block, fences included.
    Code,
    /// Raw markup lines starting with a tag, up to the next blank line.
    Html,
    /// A single blank line.
    Empty,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Frontmatter => "frontmatter",
            BlockKind::Import => "import",
            BlockKind::Heading => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::List => "list",
            BlockKind::Code => "code",
            BlockKind::Html => "html",
            BlockKind::Empty => "empty",
        }
    }

    /// Blocks that never carry page content and are skipped when building patches.
    #[must_use]
    pub fn is_non_content(self) -> bool {
        matches!(self, BlockKind::Frontmatter | BlockKind::Import | BlockKind::Empty)
    }
}

/// A contiguous, classified unit of the text document.
///
/// `content` is the exact source text of the block including line
/// terminators, so concatenating every block's content reproduces the
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub content: String,
    /// 1-based, inclusive.
    pub line_start: usize,
    /// 1-based, inclusive.
    pub line_end: usize,
    #[serde(skip)]
    pub span: Span,
}
