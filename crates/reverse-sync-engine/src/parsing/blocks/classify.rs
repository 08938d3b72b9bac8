use crate::parsing::rope::{lines::LineRef, span::Span};

use super::kinds::{CodeFence, Frontmatter, ListMarker};

/// Inline JSX components that may open a line without starting a markup block.
pub const INLINE_COMPONENTS: &[&str] = &["<Badge", "<Callout"];

/// What kind of block a line would open if it started one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opener {
    Frontmatter,
    CodeFence,
    Heading,
    Import,
    Markup,
    ListItem,
}

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// 1-based line number.
    pub number: usize,
    /// Full byte span of this line, terminator included.
    pub line: Span,
    /// The raw line text, terminator included.
    pub text: String,
    /// The line is exactly empty (no spaces either).
    pub is_blank: bool,
    /// The block this line opens, if any.
    pub opener: Option<Opener>,
    /// Starts with `<`, whether or not it is an inline component. Paragraphs stop here.
    pub starts_tag: bool,
    /// A list item line, or a line indented by two spaces or a tab.
    pub is_list_continuation: bool,
}

impl LineClass {
    pub fn body(&self) -> &str {
        self.text.trim_end_matches(['\r', '\n'])
    }

    /// Whether a paragraph in progress must end before this line.
    pub fn interrupts_paragraph(&self) -> bool {
        self.is_blank
            || self.starts_tag
            || matches!(
                self.opener,
                Some(Opener::CodeFence | Opener::Heading | Opener::Import | Opener::ListItem)
            )
    }
}

/// Classifies individual lines of an MDX document.
pub struct MdxLineClassifier;

impl MdxLineClassifier {
    /// Classifies a line into a [`LineClass`].
    ///
    /// The frontmatter opener is only reported for the first line; later `---`
    /// lines are ordinary paragraph text.
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        let body = lr.body();
        let is_blank = body.is_empty();
        let starts_tag = body.starts_with('<');
        let is_list_item = ListMarker::parse(body).is_some();

        let opener = if is_blank {
            None
        } else if lr.number == 1 && Frontmatter::is_delimiter(body) {
            Some(Opener::Frontmatter)
        } else if CodeFence::is_fence(body) {
            Some(Opener::CodeFence)
        } else if body.starts_with('#') {
            Some(Opener::Heading)
        } else if body.starts_with("import ") {
            Some(Opener::Import)
        } else if starts_tag && !INLINE_COMPONENTS.iter().any(|c| body.starts_with(c)) {
            Some(Opener::Markup)
        } else if is_list_item {
            Some(Opener::ListItem)
        } else {
            None
        };

        LineClass {
            number: lr.number,
            line: lr.span,
            text: lr.text.clone(),
            is_blank,
            opener,
            starts_tag,
            is_list_continuation: is_list_item || body.starts_with("  ") || body.starts_with('\t'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(number: usize, text: &str) -> LineRef {
        LineRef {
            number,
            span: Span::new(0, text.len()),
            text: text.to_string(),
        }
    }

    #[rstest]
    #[case(1, "---\n", Some(Opener::Frontmatter))]
    #[case(2, "---\n", None)]
    #[case(3, "```python\n", Some(Opener::CodeFence))]
    #[case(3, "## Title\n", Some(Opener::Heading))]
    #[case(3, "import { Callout } from 'nextra/components'\n", Some(Opener::Import))]
    #[case(3, "<figure>\n", Some(Opener::Markup))]
    #[case(3, "<Callout type=\"info\">\n", None)]
    #[case(3, "<Badge color=\"blue\">New</Badge> text\n", None)]
    #[case(3, "* item\n", Some(Opener::ListItem))]
    #[case(3, "plain text\n", None)]
    #[case(3, "\n", None)]
    fn classify_openers(#[case] number: usize, #[case] text: &str, #[case] expected: Option<Opener>) {
        let lc = MdxLineClassifier.classify(&line(number, text));
        assert_eq!(lc.opener, expected);
    }

    #[test]
    fn inline_component_still_interrupts_paragraph() {
        let lc = MdxLineClassifier.classify(&line(4, "<Callout>\n"));
        assert!(lc.opener.is_none());
        assert!(lc.interrupts_paragraph());
    }

    #[test]
    fn indented_lines_continue_lists() {
        let lc = MdxLineClassifier.classify(&line(4, "    continued\n"));
        assert!(lc.is_list_continuation);
        let lc = MdxLineClassifier.classify(&line(4, "\tcontinued\n"));
        assert!(lc.is_list_continuation);
        let lc = MdxLineClassifier.classify(&line(4, " one space\n"));
        assert!(!lc.is_list_continuation);
    }

    #[test]
    fn whitespace_only_line_is_not_blank() {
        let lc = MdxLineClassifier.classify(&line(4, "   \n"));
        assert!(!lc.is_blank);
    }
}
