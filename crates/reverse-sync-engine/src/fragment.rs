//! Converts a text block into the inner markup of its target element.
//!
//! Used when an edit changes a block's shape (a list gaining or losing
//! items) and the element's children must be regenerated instead of having
//! their text rewritten.

use crate::normalize::code_body;
use crate::parsing::blocks::{BlockKind, ListMarker, MarkerKind};

const CODE_PLACEHOLDER: &str = "\u{0}CODE";

cached_regex!(code_span_regex, r"`([^`]+)`");
cached_regex!(bold_regex, r"\*\*(.+?)\*\*");
cached_regex!(link_regex, r"\[([^\]]+)\]\(([^)]+)\)");
cached_regex!(placeholder_regex, r"\x00CODE(\d+)\x00");
cached_regex!(heading_marker_regex, r"^#+\s+");

/// Inner markup for a block of the given kind.
pub fn to_inner_markup(content: &str, kind: BlockKind) -> String {
    let text = content.trim();
    match kind {
        BlockKind::Heading => convert_heading(text),
        BlockKind::Paragraph => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(convert_inline)
            .collect(),
        BlockKind::List => render_items(&parse_items(text)),
        BlockKind::Code => code_body(text),
        _ => convert_inline(text),
    }
}

/// Heading text keeps code spans and links but loses bold markers, which
/// the forward converter drops inside headings.
fn convert_heading(text: &str) -> String {
    let s = heading_marker_regex().replace(text, "");
    let s = bold_regex().replace_all(&s, "$1");
    let s = code_span_regex().replace_all(&s, "<code>$1</code>");
    convert_links(&s)
}

/// `[label](url)` to an anchor, the url attribute-escaped.
fn convert_links(text: &str) -> String {
    link_regex()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let label = caps.get(1).map_or("", |m| m.as_str());
            let href = caps.get(2).map_or("", |m| m.as_str());
            format!(
                r#"<a href="{}">{label}</a>"#,
                html_escape::encode_double_quoted_attribute(href)
            )
        })
        .into_owned()
}

/// Converts code spans, bold and links. Code span contents are protected
/// from the other conversions. Entities and inline tags pass through.
pub fn convert_inline(text: &str) -> String {
    let mut spans: Vec<String> = Vec::new();
    let s = code_span_regex().replace_all(text, |caps: &regex::Captures<'_>| {
        spans.push(caps.get(1).map_or("", |m| m.as_str()).to_string());
        format!("{CODE_PLACEHOLDER}{}\u{0}", spans.len() - 1)
    });
    let s = bold_regex().replace_all(&s, "<strong>$1</strong>");
    let s = convert_links(&s);
    placeholder_regex()
        .replace_all(&s, |caps: &regex::Captures<'_>| {
            let span = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .and_then(|i| spans.get(i));
            match span {
                Some(code) => format!("<code>{code}</code>"),
                None => caps.get(0).map_or("", |m| m.as_str()).to_string(),
            }
        })
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListItem {
    indent: usize,
    ordered: bool,
    content: String,
}

fn parse_items(text: &str) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = Vec::new();
    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty()
            || stripped.starts_with("<figure")
            || stripped.starts_with("<img")
            || stripped.starts_with("</figure")
        {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        match ListMarker::parse_any(stripped) {
            Some(marker) => items.push(ListItem {
                indent,
                ordered: marker.kind == MarkerKind::Ordered,
                content: stripped[marker.content_start..].to_string(),
            }),
            None => {
                if let Some(last) = items.last_mut() {
                    last.content.push(' ');
                    last.content.push_str(stripped);
                }
            }
        }
    }
    items
}

/// Renders `<li><p>..</p></li>` items; deeper-indented runs nest inside the
/// preceding item as `<ul>`/`<ol>`.
fn render_items(items: &[ListItem]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < items.len() {
        let item = &items[i];
        let children_end = items[i + 1..]
            .iter()
            .position(|child| child.indent <= item.indent)
            .map_or(items.len(), |offset| i + 1 + offset);

        out.push_str("<li><p>");
        out.push_str(&convert_inline(&item.content));
        out.push_str("</p>");
        if children_end > i + 1 {
            let children = &items[i + 1..children_end];
            let tag = if children[0].ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>{}</{tag}>", render_items(children)));
        }
        out.push_str("</li>");
        i = children_end;
    }
    out
}
