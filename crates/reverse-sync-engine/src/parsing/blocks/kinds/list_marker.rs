/// Whether a list marker is a bullet (`-`, `*`, `+`) or a number (`1.`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Bullet,
    Ordered,
}

/// A list item marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: MarkerKind,
    /// Leading whitespace before the marker, in bytes.
    pub indent: usize,
    /// Byte offset where the item text starts (after the marker and its spacing).
    pub content_start: usize,
}

impl ListMarker {
    /// Recognises `- `, `* ` and `N. ` item starts after optional indentation.
    ///
    /// `+` is deliberately absent here: the block parser never treated it as a
    /// list opener. Use [`ListMarker::parse_any`] when stripping markers.
    pub fn parse(line: &str) -> Option<Self> {
        Self::parse_with(line, &['-', '*'])
    }

    /// Like [`ListMarker::parse`] but also accepts `+` bullets.
    pub fn parse_any(line: &str) -> Option<Self> {
        Self::parse_with(line, &['-', '*', '+'])
    }

    fn parse_with(line: &str, bullets: &[char]) -> Option<Self> {
        let stripped = line.trim_start();
        let indent = line.len() - stripped.len();

        let mut chars = stripped.chars();
        let first = chars.next()?;
        if bullets.contains(&first) {
            let rest = &stripped[first.len_utf8()..];
            let spacing = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            if spacing == 0 {
                return None;
            }
            return Some(Self {
                kind: MarkerKind::Bullet,
                indent,
                content_start: indent + first.len_utf8() + spacing,
            });
        }

        let digits = stripped.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let rest = &stripped[digits..];
        let after_dot = rest.strip_prefix('.')?;
        let spacing = after_dot.len() - after_dot.trim_start_matches([' ', '\t']).len();
        if spacing == 0 {
            return None;
        }
        Some(Self {
            kind: MarkerKind::Ordered,
            indent,
            content_start: indent + digits + 1 + spacing,
        })
    }
}
