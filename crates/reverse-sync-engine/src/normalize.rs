//! Text normalizer: turns a text block into the plain text its markup
//! counterpart renders, so the two can be compared.
//!
//! Markers are stripped but their text kept. Link labels drop a trailing
//! ` | anchor` decoration that only exists on the text side.

use crate::parsing::blocks::{BlockKind, kinds::CodeFence};

cached_regex!(emoji_regex, r"[\x{1F000}-\x{1F9FF}\x{2700}-\x{27BF}\x{FE00}-\x{FE0F}\x{200D}]+");
cached_regex!(
    invisible_regex,
    r"[\x{200B}\x{200C}\x{200D}\x{2060}\x{FEFF}\x{00AD}\x{3164}\x{115F}\x{1160}]+"
);
cached_regex!(bold_regex, r"\*\*(.+?)\*\*");
cached_regex!(code_span_regex, r"`([^`]+)`");
cached_regex!(italic_regex, r"\*([^*]+)\*");
cached_regex!(link_regex, r"\[([^\]]+)\]\([^)]+\)");
cached_regex!(tag_regex, r"<[^>]+>");
cached_regex!(table_separator_regex, r"^\|[\s\-:|]+\|$");
cached_regex!(ordered_marker_regex, r"^\d+\.\s+");
cached_regex!(bullet_marker_regex, r"^[-*+]\s+");
cached_regex!(bare_marker_regex, r"^(?:[-*+]|\d+\.)");
cached_regex!(marker_prefix_regex, r"^(?:[-*+]\s+|\d+\.\s+)");

/// Normalizes a block's content for comparison with record plain text.
///
/// Never fails; content-free input yields an empty string.
pub fn normalize_block(content: &str, kind: BlockKind) -> String {
    match kind {
        BlockKind::Heading => normalize_heading(content),
        BlockKind::Code => code_body(content),
        _ => content
            .trim()
            .lines()
            .filter_map(normalize_line)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn normalize_heading(content: &str) -> String {
    let text = content.trim().trim_start_matches('#').trim();
    strip_inline(text).trim().to_string()
}

/// Body lines of a fenced code block, fences removed.
pub(crate) fn code_body(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let is_fence = |line: &&str| CodeFence::is_fence(line.trim());
    let start = usize::from(lines.first().is_some_and(is_fence));
    let end = if lines.len() > start && lines.last().is_some_and(is_fence) {
        lines.len() - 1
    } else {
        lines.len()
    };
    lines[start..end].join("\n")
}

/// Normalizes one line of a paragraph, list or markup block.
///
/// Returns `None` for lines with no counterpart in the markup text: blank
/// lines, figure/image lines and table separator rows.
pub fn normalize_line(line: &str) -> Option<String> {
    let s = line.trim();
    if s.is_empty()
        || s.starts_with("<figure")
        || s.starts_with("<img")
        || s.starts_with("</figure")
        || table_separator_regex().is_match(s)
    {
        return None;
    }

    let s = if s.starts_with('|') && s.ends_with('|') {
        table_cells(s).join(" ")
    } else {
        s.to_string()
    };
    let s = ordered_marker_regex().replace(&s, "");
    let s = bullet_marker_regex().replace(&s, "");
    let s = strip_inline(&s);
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn table_cells(row: &str) -> Vec<&str> {
    let cells: Vec<&str> = row.split('|').collect();
    match cells.len() {
        0..=2 => Vec::new(),
        n => cells[1..n - 1]
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect(),
    }
}

/// Normalizes a markdown table row cell by cell.
pub fn normalize_table_row(row: &str) -> String {
    table_cells(row.trim())
        .into_iter()
        .map(|cell| strip_inline(cell).trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `line` is a markdown table separator row (`| --- | :-: |`).
pub fn is_table_separator(line: &str) -> bool {
    table_separator_regex().is_match(line.trim())
}

/// Strips inline markdown and markup, keeping the visible text.
fn strip_inline(text: &str) -> String {
    let s = bold_regex().replace_all(text, "$1");
    let s = code_span_regex().replace_all(&s, "$1");
    let s = strip_italic(&s);
    let s = link_regex().replace_all(&s, |caps: &regex::Captures<'_>| {
        let label = caps.get(1).map_or("", |m| m.as_str());
        label.split(" | ").next().unwrap_or(label).to_string()
    });
    let s = tag_regex().replace_all(&s, "");
    html_escape::decode_html_entities(&s).into_owned()
}

/// Unwraps `*italic*` spans that are not part of a `**` run.
fn strip_italic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;
    while let Some(caps) = italic_regex().captures_at(text, pos) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        if text[..whole.start()].ends_with('*') || text[whole.end()..].starts_with('*') {
            // Retry from the next star; the rejected one may close a later span.
            pos = whole.start() + 1;
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str(inner.as_str());
        last = whole.end();
        pos = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Collapses every whitespace run to one space and trims the ends.
pub fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Removes zero-width and filler characters.
pub fn strip_invisible(text: &str) -> String {
    invisible_regex().replace_all(text, "").into_owned()
}

/// Removes emoji and variation selectors.
pub fn strip_emoji(text: &str) -> String {
    emoji_regex().replace_all(text, "").into_owned()
}

/// Removes a leading `-`, `*`, `+` or `N.` from whitespace-free text.
pub fn strip_list_marker(text: &str) -> String {
    bare_marker_regex().replace(text, "").into_owned()
}

/// The leading list marker and its spacing (`"- "`, `"2. "`), if any.
pub fn list_marker_prefix(text: &str) -> Option<&str> {
    marker_prefix_regex().find(text).map(|m| m.as_str())
}
