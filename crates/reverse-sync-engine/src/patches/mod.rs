//! Patch builder: turns block changes into element-level patches.
//!
//! Each changed block is normalized and matched to a mapping record. Lists
//! and markdown tables that do not match as a whole are retried item by
//! item or row by row. Anything still unresolved falls back to the smallest
//! record containing its text; edits to the same container are composed in
//! order into one patch. A block nothing resolves yields no patch.

mod list;
mod table;

use serde::Serialize;

use crate::diff::BlockChange;
use crate::fragment::to_inner_markup;
use crate::mapping::{MappingRecord, RecordKind};
use crate::matcher::{BlockMatcher, MatchContext};
use crate::normalize::{collapse_ws, normalize_block};
use crate::parsing::blocks::BlockKind;
use crate::transfer::transfer;

pub use list::{list_item_count, split_list_items};
pub use table::{is_markdown_table, split_table_rows};

/// An edit to one addressable markup element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub path: String,
    /// The element's text the patch was computed against.
    pub old_plain_text: String,
    #[serde(flatten)]
    pub payload: PatchPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchPayload {
    /// Rewrite the element's text leaves to spell this text.
    NewPlainText(String),
    /// Replace the element's children with this markup.
    NewMarkupFragment(String),
}

impl Patch {
    fn text(record: &MappingRecord, new_plain_text: String) -> Self {
        Patch {
            path: record.path.clone(),
            old_plain_text: record.plain_text.clone(),
            payload: PatchPayload::NewPlainText(new_plain_text),
        }
    }
}

/// Text edits waiting to be composed against one container record.
#[derive(Debug, Default)]
struct ContainerEdits<'r> {
    groups: Vec<(&'r MappingRecord, Vec<(String, String)>)>,
}

impl<'r> ContainerEdits<'r> {
    fn add(&mut self, container: &'r MappingRecord, old_plain: String, new_plain: String) {
        match self.groups.iter_mut().find(|(r, _)| r.id == container.id) {
            Some((_, edits)) => edits.push((old_plain, new_plain)),
            None => self.groups.push((container, vec![(old_plain, new_plain)])),
        }
    }

    /// Queues `old_plain -> new_plain` on the smallest record containing
    /// `old_plain`, claiming it at once. A container already holding edits
    /// stays eligible for further ones.
    fn add_containing(
        &mut self,
        matcher: &BlockMatcher,
        records: &'r [MappingRecord],
        ctx: &mut MatchContext,
        old_plain: String,
        new_plain: String,
    ) -> Option<&'r MappingRecord> {
        let container = matcher.find_containing_where(&old_plain, records, |record| {
            !ctx.is_used(&record.id) || self.groups.iter().any(|(open, _)| open.id == record.id)
        })?;
        ctx.claim(container);
        self.add(container, old_plain, new_plain);
        Some(container)
    }

    /// One patch per container, applying its edits cumulatively.
    fn into_patches(self) -> Vec<Patch> {
        self.groups
            .into_iter()
            .map(|(record, edits)| {
                let text = edits
                    .iter()
                    .fold(record.plain_text.clone(), |text, (old, new)| {
                        transfer(old, new, &text)
                    });
                log::debug!("{} edit(s) composed into container {}", edits.len(), record.path);
                Patch::text(record, text)
            })
            .collect()
    }
}

/// Replacement text for `record` given a normalized `old -> new` edit.
///
/// The new text is used as is when the record already spells the old text;
/// otherwise the edit is transferred onto the record's own layout. Code
/// compares exactly, everything else modulo whitespace runs.
fn replacement_text(old_plain: &str, new_plain: String, record: &MappingRecord) -> String {
    let same = if record.kind == RecordKind::Code {
        old_plain == record.plain_text
    } else {
        collapse_ws(old_plain) == collapse_ws(&record.plain_text)
    };
    if same {
        new_plain
    } else {
        transfer(old_plain, &new_plain, &record.plain_text)
    }
}

/// Builds the patches for `changes` against `records`.
pub fn build_patches(
    changes: &[BlockChange],
    records: &[MappingRecord],
    matcher: &BlockMatcher,
) -> Vec<Patch> {
    let mut ctx = MatchContext::new(records);
    let mut patches = Vec::new();
    let mut containers = ContainerEdits::default();

    for change in changes {
        let old = &change.old_block;
        let new = &change.new_block;
        if old.kind.is_non_content() {
            continue;
        }

        let old_plain = normalize_block(&old.content, old.kind);
        let Some(found) = matcher.find(&old_plain, records, &ctx) else {
            if old.kind == BlockKind::List {
                patches.extend(list::item_patches(change, records, matcher, &mut ctx));
            } else if is_markdown_table(&old.content) {
                patches.extend(table::row_patches(change, records, matcher, &mut ctx));
            } else if let Some(container) = containers.add_containing(
                matcher,
                records,
                &mut ctx,
                old_plain,
                normalize_block(&new.content, new.kind),
            ) {
                log::debug!("block {} contained in {}", change.index, container.path);
            } else {
                log::debug!("block {} (lines {}-{}) left unmatched", change.index, old.line_start, old.line_end);
            }
            continue;
        };

        let record = found.record;
        ctx.claim(record);
        log::debug!("block {} matched {} by {} tier", change.index, record.path, found.tier);

        if old.kind == BlockKind::List
            && record.kind == RecordKind::List
            && list_item_count(&old.content) != list_item_count(&new.content)
        {
            patches.push(Patch {
                path: record.path.clone(),
                old_plain_text: record.plain_text.clone(),
                payload: PatchPayload::NewMarkupFragment(to_inner_markup(&new.content, new.kind)),
            });
            continue;
        }

        let new_plain = normalize_block(&new.content, new.kind);
        let text = replacement_text(&old_plain, new_plain, record);
        patches.push(Patch::text(record, text));
    }

    patches.extend(containers.into_patches());
    patches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_blocks;
    use crate::mapping::record_mapping;
    use crate::matcher::MatchOptions;
    use crate::parsing::parse_blocks;
    use pretty_assertions::assert_eq;

    fn plan(original: &str, edited: &str, markup: &str) -> Vec<Patch> {
        let changes = diff_blocks(&parse_blocks(original), &parse_blocks(edited)).unwrap();
        let records = record_mapping(markup);
        build_patches(&changes, &records, &BlockMatcher::new(MatchOptions::default()))
    }

    fn text_patch(path: &str, old: &str, new: &str) -> Patch {
        Patch {
            path: path.to_string(),
            old_plain_text: old.to_string(),
            payload: PatchPayload::NewPlainText(new.to_string()),
        }
    }

    #[test]
    fn paragraph_edit_uses_new_text_directly() {
        let patches = plan(
            "## Title\n\nParagraph.\n",
            "## Title\n\nModified.\n",
            "<h2>Title</h2><p>Paragraph.</p>",
        );
        assert_eq!(patches, vec![text_patch("p[1]", "Paragraph.", "Modified.")]);
    }

    #[test]
    fn heading_edit_targets_heading() {
        let patches = plan(
            "## Old title\n\nBody.\n",
            "## New title\n\nBody.\n",
            "<h2>Old title</h2><p>Body.</p>",
        );
        assert_eq!(patches, vec![text_patch("h2[1]", "Old title", "New title")]);
    }

    #[test]
    fn non_content_blocks_are_skipped() {
        let patches = plan(
            "---\ntitle: a\n---\nimport X from 'y'\n\nText.\n",
            "---\ntitle: b\n---\nimport Z from 'y'\n\nText.\n",
            "<p>Text.</p>",
        );
        assert!(patches.is_empty());
    }

    #[test]
    fn whitespace_layout_differences_go_through_transfer() {
        let patches = plan(
            "* one\n* two\n* three\n",
            "* one\n* 2\n* three\n",
            "<ul><li><p>one</p></li><li><p>two</p></li><li><p>three</p></li></ul>",
        );
        assert_eq!(patches, vec![text_patch("ul[1]", "onetwothree", "one2three")]);
    }

    #[test]
    fn list_item_count_change_emits_fragment() {
        let patches = plan(
            "* one\n* two\n",
            "* one\n* two\n* three\n",
            "<ul><li><p>one</p></li><li><p>two</p></li></ul>",
        );
        assert_eq!(
            patches,
            vec![Patch {
                path: "ul[1]".to_string(),
                old_plain_text: "onetwo".to_string(),
                payload: PatchPayload::NewMarkupFragment(
                    "<li><p>one</p></li><li><p>two</p></li><li><p>three</p></li>".to_string()
                ),
            }]
        );
    }

    #[test]
    fn unmatched_blocks_yield_no_patch() {
        let patches = plan("Nothing like it.\n", "Nothing like this.\n", "<p>Completely different.</p>");
        assert!(patches.is_empty());
    }

    #[test]
    fn no_record_is_patched_twice() {
        let patches = plan(
            "Same.\n\nSame.\n",
            "First.\n\nSecond.\n",
            "<p>Same.</p><p>Same.</p>",
        );
        let paths: Vec<&str> = patches.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["p[1]", "p[2]"]);
    }

    #[test]
    fn containment_edits_compose_into_one_patch() {
        let markup = "<p>The first sentence is here. The second sentence is here.</p>";
        let patches = plan(
            "<span>The first sentence is here.</span>\n\n<span>The second sentence is here.</span>\n",
            "<span>The 1st sentence is here.</span>\n\n<span>The 2nd sentence is here.</span>\n",
            markup,
        );
        assert_eq!(
            patches,
            vec![text_patch(
                "p[1]",
                "The first sentence is here. The second sentence is here.",
                "The 1st sentence is here. The 2nd sentence is here."
            )]
        );
    }

    #[test]
    fn contained_record_is_not_matched_again() {
        let patches = plan(
            "Repeat this sentence\n\nRepeat this sentence please.\n",
            "Repeat that sentence\n\nRepeat this sentence now.\n",
            "<p>Repeat this sentence please.</p>",
        );
        assert_eq!(
            patches,
            vec![text_patch(
                "p[1]",
                "Repeat this sentence please.",
                "Repeat that sentence now."
            )]
        );
    }

    #[test]
    fn code_blocks_compare_exactly() {
        let markup = concat!(
            r#"<ac:structured-macro ac:name="code"><ac:plain-text-body><![CDATA["#,
            "fn main() {\n    run();\n}",
            "]]></ac:plain-text-body></ac:structured-macro>",
        );
        let patches = plan(
            "```rust\nfn main() {\n    run();\n}\n```\n",
            "```rust\nfn main() {\n    start();\n}\n```\n",
            markup,
        );
        assert_eq!(
            patches,
            vec![text_patch(
                "macro-code[1]",
                "fn main() {\n    run();\n}",
                "fn main() {\n    start();\n}"
            )]
        );
    }
}
