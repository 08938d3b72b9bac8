//! Markup patcher: applies patches to the markup while keeping its inline
//! structure.
//!
//! Text patches are checked against the element's current text first and
//! skipped when it no longer matches. Otherwise only the text leaves an edit
//! touches are rewritten; tags, attributes and untouched leaves keep their
//! original bytes.

use std::ops::Range;

use similar::DiffTag;

use crate::mapping::RecordKind;
use crate::markup::{Document, Node, Text, parse_nodes, walk};
use crate::patches::{Patch, PatchPayload};
use crate::transfer::{EditOp, edit_ops};

/// Applies `patches` in order and returns the patched markup.
pub fn apply_patches(markup: &str, patches: &[Patch]) -> String {
    let mut doc = Document::parse(markup);
    let sites = walk::block_sites(&doc);

    for patch in patches {
        let Some(site) = sites.iter().find(|s| s.path == patch.path) else {
            log::debug!("no element at {}", patch.path);
            continue;
        };

        let mut location = site.location.clone();
        if site.kind == RecordKind::Code
            && let Some(Node::Element(el)) = doc.node(&location)
            && let Some(body) = walk::code_body(el)
        {
            location.extend(body);
        }
        let Some(node) = doc.node_mut(&location) else {
            continue;
        };

        match &patch.payload {
            PatchPayload::NewMarkupFragment(fragment) => match node {
                Node::Element(el) => el.replace_children(parse_nodes(fragment)),
                _ => log::debug!("{} cannot take a markup fragment", patch.path),
            },
            PatchPayload::NewPlainText(new_text) => {
                if !rewrite_text(node, &patch.old_plain_text, new_text) {
                    log::debug!("skipped stale patch at {}", patch.path);
                }
            }
        }
    }

    doc.to_markup()
}

/// Rewrites `node`'s text leaves so its text reads `new_text`.
///
/// Returns `false`, leaving the node untouched, when the node's current text
/// is not `old_text`.
fn rewrite_text(node: &mut Node, old_text: &str, new_text: &str) -> bool {
    let old_text = old_text.trim();
    if node.text().trim() != old_text {
        return false;
    }

    let old: Vec<char> = old_text.chars().collect();
    let new: Vec<char> = new_text.trim().chars().collect();
    let ops = edit_ops(&old, &new);

    let mut leaves: Vec<&mut Text> = Vec::new();
    node.text_leaves_mut(&mut leaves);
    let decoded: Vec<String> = leaves.iter().map(|leaf| leaf.decoded()).collect();
    let ranges = leaf_ranges(old_text, &decoded);
    let owners = insert_owners(&ops, &ranges);

    for (i, leaf) in leaves.iter_mut().enumerate() {
        let Some(range) = ranges[i].clone() else {
            continue;
        };
        let replacement = leaf_text(&ops, &owners, i, range, &new);
        let text = &decoded[i];
        let body = text.trim();
        if replacement == body {
            continue;
        }
        let leading = &text[..text.len() - text.trim_start().len()];
        let trailing = &text[text.trim_end().len()..];
        leaf.set_decoded(&format!("{leading}{replacement}{trailing}"));
    }
    true
}

/// Char range of each leaf's trimmed text within `old_text`, found in order.
/// Whitespace-only leaves get `None`.
fn leaf_ranges(old_text: &str, leaves: &[String]) -> Vec<Option<Range<usize>>> {
    let mut byte_pos = 0;
    leaves
        .iter()
        .map(|leaf| {
            let body = leaf.trim();
            if body.is_empty() {
                return None;
            }
            let at = byte_pos + old_text.get(byte_pos..)?.find(body)?;
            byte_pos = at + body.len();
            let start = old_text[..at].chars().count();
            Some(start..start + body.chars().count())
        })
        .collect()
}

/// For each insert op, the leaf that receives the inserted text.
///
/// An insert inside a leaf belongs to it. At a boundary between two leaves
/// the earlier leaf wins; a leaf starting there is used only when nothing
/// ends there. Inserts outside every leaf go to the nearest preceding leaf,
/// or the first leaf.
fn insert_owners(ops: &[EditOp], ranges: &[Option<Range<usize>>]) -> Vec<Option<usize>> {
    let covered: Vec<(usize, &Range<usize>)> = ranges
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.as_ref().map(|r| (i, r)))
        .collect();

    ops.iter()
        .map(|op| {
            if op.tag != DiffTag::Insert {
                return None;
            }
            let at = op.old.start;
            covered
                .iter()
                .find(|(_, r)| r.start < at && at <= r.end)
                .or_else(|| covered.iter().find(|(_, r)| r.start == at))
                .or_else(|| covered.iter().rev().find(|(_, r)| r.end <= at))
                .or_else(|| covered.first())
                .map(|(i, _)| *i)
        })
        .collect()
}

/// New text for the leaf `leaf` covering `range` of the old text.
fn leaf_text(
    ops: &[EditOp],
    owners: &[Option<usize>],
    leaf: usize,
    range: Range<usize>,
    new: &[char],
) -> String {
    let mut out = String::new();
    for (op, owner) in ops.iter().zip(owners) {
        if op.tag == DiffTag::Insert {
            if *owner == Some(leaf) {
                out.extend(&new[op.new.clone()]);
            }
            continue;
        }

        let from = op.old.start.max(range.start);
        let to = op.old.end.min(range.end);
        if from >= to {
            continue;
        }
        let sub = match op.tag {
            DiffTag::Equal => {
                op.new.start + (from - op.old.start)..op.new.start + (to - op.old.start)
            }
            _ => {
                // Spread the replacement over the leaves in proportion to
                // how much of the old range each one covers.
                let old_len = op.old.len().max(1);
                let new_len = op.new.len();
                let start = op.new.start + (from - op.old.start) * new_len / old_len;
                let end = op.new.start + (to - op.old.start) * new_len / old_len;
                start..end
            }
        };
        out.extend(&new[sub]);
    }
    out
}
