use xi_rope::Rope;

use super::span::Span;

/// A single physical line of the source with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// 1-based line number.
    pub number: usize,
    /// Byte span of this line in the rope (includes the newline if present).
    pub span: Span,
    /// The line text including its line terminator.
    pub text: String,
}

impl LineRef {
    /// The line without its `\n` / `\r\n` terminator.
    pub fn body(&self) -> &str {
        self.text.trim_end_matches(['\r', '\n'])
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` so terminators stay attached to their line; a text that
/// does not end in a newline yields a final unterminated line. Joining every
/// `text` gives back the rope contents exactly.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).enumerate().map(move |(idx, line)| {
        let start = offset;
        offset += line.len();
        LineRef {
            number: idx + 1,
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_keep_terminators_and_numbers() {
        let rope = Rope::from("a\r\nb\n\nc");
        let lines: Vec<LineRef> = lines_with_spans(&rope).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].text, "a\r\n");
        assert_eq!(lines[0].body(), "a");
        assert_eq!(lines[2].body(), "");
        assert_eq!(lines[3].text, "c");
        assert_eq!(lines[3].number, 4);
        assert_eq!(lines[3].span, Span { start: 6, end: 7 });
    }

    #[test]
    fn empty_rope_has_no_lines() {
        let rope = Rope::from("");
        assert_eq!(lines_with_spans(&rope).count(), 0);
    }
}
