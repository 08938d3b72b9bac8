//! Block-level addressing shared by the mapping recorder and the patcher.
//!
//! A path is `key[n]` where `n` counts earlier blocks with the same key, or
//! `parent/key[n]` for blocks inside a callout body. Keys are tag names,
//! `macro-<name>` for structured macros and `#text` for bare text.

use crate::mapping::RecordKind;

use super::tree::{Document, Element, Node};

/// Macro and panel kinds whose bodies are addressed block by block.
pub const CALLOUT_KINDS: &[&str] = &["tip", "info", "note", "warning", "panel"];

const CALLOUT_CHILD_TAGS: &[&str] = &["p", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "table"];

pub const TEXT_KEY: &str = "#text";

/// An addressable block of the markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSite {
    pub path: String,
    /// Child-index path from the document root.
    pub location: Vec<usize>,
    pub kind: RecordKind,
    /// The `n` in `key[n]`.
    pub ordinal: usize,
    /// Position of the enclosing callout in the site list.
    pub parent: Option<usize>,
}

#[derive(Debug, Default)]
struct Counters(Vec<(String, usize)>);

impl Counters {
    fn next(&mut self, key: &str) -> usize {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => {
                *n += 1;
                *n
            }
            None => {
                self.0.push((key.to_string(), 1));
                1
            }
        }
    }
}

/// Lists every addressable block in document order.
///
/// `ac:layout` / `ac:layout-section` / `ac:layout-cell` wrappers are
/// descended; their contents count as top-level blocks.
pub fn block_sites(doc: &Document) -> Vec<BlockSite> {
    let mut sites = Vec::new();
    let mut counters = Counters::default();

    for (location, node) in block_level_nodes(doc) {
        match node {
            Node::Text(text) => {
                if !text.decoded().trim().is_empty() {
                    let n = counters.next(TEXT_KEY);
                    sites.push(BlockSite {
                        path: format!("{TEXT_KEY}[{n}]"),
                        location,
                        kind: RecordKind::Paragraph,
                        ordinal: n,
                        parent: None,
                    });
                }
            }
            Node::Raw(_) => {}
            Node::Element(el) => {
                let (key, kind) = classify(el);
                let n = counters.next(&key);
                let path = format!("{key}[{n}]");
                let parent = sites.len();
                let body = callout_body(el);
                sites.push(BlockSite {
                    path: path.clone(),
                    location: location.clone(),
                    kind,
                    ordinal: n,
                    parent: None,
                });
                if let Some(body_path) = body {
                    push_callout_children(el, &path, &location, &body_path, parent, &mut sites);
                }
            }
        }
    }

    sites
}

fn block_level_nodes(doc: &Document) -> Vec<(Vec<usize>, &Node)> {
    let mut out = Vec::new();
    for (i, node) in doc.children.iter().enumerate() {
        match node {
            Node::Element(layout) if layout.name == "ac:layout" => {
                for (si, section) in layout.child_elements() {
                    if section.name != "ac:layout-section" {
                        continue;
                    }
                    for (ci, cell) in section.child_elements() {
                        if cell.name != "ac:layout-cell" {
                            continue;
                        }
                        for (k, child) in cell.children.iter().enumerate() {
                            out.push((vec![i, si, ci, k], child));
                        }
                    }
                }
            }
            _ => out.push((vec![i], node)),
        }
    }
    out
}

/// Counter key and record kind of a block-level element.
pub fn classify(el: &Element) -> (String, RecordKind) {
    let kind = match el.name.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => RecordKind::Heading,
        "p" => RecordKind::Paragraph,
        "ul" | "ol" => RecordKind::List,
        "table" => RecordKind::Table,
        "ac:structured-macro" => {
            let name = el.attr("ac:name").unwrap_or("");
            let kind = if name == "code" {
                RecordKind::Code
            } else {
                RecordKind::Html
            };
            return (format!("macro-{name}"), kind);
        }
        _ => RecordKind::Html,
    };
    (el.name.clone(), kind)
}

/// Path (relative to `el`) of the body holding a callout's blocks.
fn callout_body(el: &Element) -> Option<Vec<usize>> {
    match el.name.as_str() {
        "ac:structured-macro" => {
            let name = el.attr("ac:name")?;
            if !CALLOUT_KINDS.contains(&name) {
                return None;
            }
            el.find("ac:rich-text-body")
        }
        "ac:adf-extension" => {
            let node_path = el.find("ac:adf-node")?;
            let node = el.descendant(&node_path)?.as_element()?;
            let attr_path = node.find_by(&|e| {
                e.name == "ac:adf-attribute" && e.attr("key") == Some("panel-type")
            })?;
            let panel_type = node.descendant(&attr_path)?.text();
            if !CALLOUT_KINDS.contains(&panel_type.trim()) {
                return None;
            }
            let content = node.find("ac:adf-content")?;
            Some([node_path, content].concat())
        }
        _ => None,
    }
}

fn push_callout_children(
    el: &Element,
    parent_path: &str,
    location: &[usize],
    body_path: &[usize],
    parent: usize,
    sites: &mut Vec<BlockSite>,
) {
    let Some(body) = el.descendant(body_path).and_then(Node::as_element) else {
        return;
    };
    let mut counters = Counters::default();
    for (i, child) in body.child_elements() {
        if !CALLOUT_CHILD_TAGS.contains(&child.name.as_str()) {
            continue;
        }
        let (key, kind) = classify(child);
        let n = counters.next(&key);
        sites.push(BlockSite {
            path: format!("{parent_path}/{key}[{n}]"),
            location: [location, body_path, &[i][..]].concat(),
            kind,
            ordinal: n,
            parent: Some(parent),
        });
    }
}

/// Path (relative to `el`) of a code macro's `ac:plain-text-body`.
pub fn code_body(el: &Element) -> Option<Vec<usize>> {
    el.find("ac:plain-text-body")
}
