//! Item-by-item patching for list blocks that do not match as a whole.

use crate::diff::BlockChange;
use crate::mapping::MappingRecord;
use crate::matcher::{BlockMatcher, MatchContext};
use crate::normalize::{collapse_ws, list_marker_prefix, normalize_block};
use crate::parsing::blocks::{BlockKind, ListMarker};
use crate::transfer::transfer;

use super::{ContainerEdits, Patch};

/// Splits list content into items. An item starts at a marker line and
/// runs until the next marker or blank line.
pub fn split_list_items(content: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.split('\n') {
        let stripped = line.trim();
        if stripped.is_empty() {
            if !current.is_empty() {
                items.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        if ListMarker::parse_any(stripped).is_some() && !current.is_empty() {
            items.push(current.join("\n"));
            current.clear();
        }
        current.push(line);
    }
    if !current.is_empty() {
        items.push(current.join("\n"));
    }
    items
}

/// Number of marker lines, nested items included.
pub fn list_item_count(content: &str) -> usize {
    content
        .lines()
        .filter(|line| ListMarker::parse_any(line.trim()).is_some())
        .count()
}

/// Text for an item matched to `record`, keeping a marker prefix the
/// record's own text starts with.
fn item_replacement(old_plain: &str, new_plain: String, record_text: &str) -> String {
    let old_collapsed = collapse_ws(old_plain);
    if old_collapsed == collapse_ws(record_text) {
        return new_plain;
    }
    match list_marker_prefix(record_text) {
        Some(prefix) => {
            let body = &record_text[prefix.len()..];
            let new_body = if old_collapsed == collapse_ws(body) {
                new_plain
            } else {
                transfer(old_plain, &new_plain, body)
            };
            format!("{prefix}{new_body}")
        }
        None => transfer(old_plain, &new_plain, record_text),
    }
}

pub(super) fn item_patches(
    change: &BlockChange,
    records: &[MappingRecord],
    matcher: &BlockMatcher,
    ctx: &mut MatchContext,
) -> Vec<Patch> {
    let old_items = split_list_items(&change.old_block.content);
    let new_items = split_list_items(&change.new_block.content);
    if old_items.len() != new_items.len() {
        log::debug!(
            "list block {} changed item count ({} -> {}), no record to rebuild",
            change.index,
            old_items.len(),
            new_items.len()
        );
        return Vec::new();
    }

    let mut patches = Vec::new();
    let mut containers = ContainerEdits::default();
    for (old_item, new_item) in old_items.iter().zip(&new_items) {
        if old_item == new_item {
            continue;
        }
        let old_plain = normalize_block(old_item, BlockKind::List);
        let new_plain = normalize_block(new_item, BlockKind::List);

        if let Some(found) = matcher.find(&old_plain, records, ctx) {
            let record = found.record;
            ctx.claim(record);
            log::debug!("list item matched {} by {} tier", record.path, found.tier);
            let text = item_replacement(&old_plain, new_plain, &record.plain_text);
            patches.push(Patch::text(record, text));
        } else if containers
            .add_containing(matcher, records, ctx, old_plain, new_plain)
            .is_none()
        {
            log::debug!("list item in block {} left unmatched", change.index);
        }
    }

    patches.extend(containers.into_patches());
    patches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::record_mapping;
    use crate::matcher::MatchOptions;
    use crate::parsing::parse_blocks;
    use crate::patches::PatchPayload;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn splits_items_on_markers_and_blank_lines() {
        let items = split_list_items("* one\n  more\n* two\n\n1. three\n");
        assert_eq!(items, vec!["* one\n  more", "* two", "1. three"]);
    }

    #[test]
    fn counts_nested_items() {
        assert_eq!(list_item_count("* a\n    * b\n  text\n+ c\n"), 3);
    }

    #[rstest]
    #[case("old text", "new text", "old text", "new text")]
    #[case("old text", "new text", "- old text", "- new text")]
    #[case("old text", "new text", "2.  old  text", "2.  new text")]
    #[case("old text", "new text", "oldtext", "newtext")]
    #[case("old text", "new text", "-  oldtext", "-  newtext")]
    fn replacement_keeps_record_prefix(
        #[case] old: &str,
        #[case] new: &str,
        #[case] record: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(item_replacement(old, new.to_string(), record), expected);
    }

    fn change(original: &str, edited: &str) -> BlockChange {
        BlockChange {
            index: 0,
            old_block: parse_blocks(original).remove(0),
            new_block: parse_blocks(edited).remove(0),
        }
    }

    #[test]
    fn items_match_panel_paragraphs_individually() {
        let records = record_mapping(concat!(
            r#"<ac:structured-macro ac:name="info"><ac:rich-text-body>"#,
            "<p>- First step of the setup</p><p>- Second step of the setup</p>",
            "</ac:rich-text-body></ac:structured-macro>",
        ));
        let matcher = BlockMatcher::new(MatchOptions::default());
        let mut ctx = MatchContext::new(&records);

        let patches = item_patches(
            &change(
                "- First step of the setup\n- Second step of the setup\n",
                "- First step of the setup\n- Second stage of the setup\n",
            ),
            &records,
            &matcher,
            &mut ctx,
        );
        assert_eq!(
            patches,
            vec![Patch {
                path: "macro-info[1]/p[2]".to_string(),
                old_plain_text: "- Second step of the setup".to_string(),
                payload: PatchPayload::NewPlainText("- Second stage of the setup".to_string()),
            }]
        );
    }

    #[test]
    fn item_count_mismatch_yields_nothing() {
        let records = record_mapping("<p>a</p>");
        let matcher = BlockMatcher::new(MatchOptions::default());
        let mut ctx = MatchContext::new(&records);
        let patches = item_patches(&change("* a\n", "* a\n* b\n"), &records, &matcher, &mut ctx);
        assert!(patches.is_empty());
    }
}
