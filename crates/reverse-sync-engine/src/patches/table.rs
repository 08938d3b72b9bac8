//! Row-by-row patching for markdown tables that do not match as a whole.

use crate::diff::BlockChange;
use crate::mapping::MappingRecord;
use crate::matcher::{BlockMatcher, MatchContext};
use crate::normalize::{is_table_separator, normalize_table_row};

use super::{ContainerEdits, Patch};

fn is_row(line: &str) -> bool {
    line.starts_with('|') && line.ends_with('|')
}

/// At least two non-blank lines, two of them pipe-delimited rows.
pub fn is_markdown_table(content: &str) -> bool {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    lines.len() >= 2 && lines.iter().filter(|line| is_row(line)).count() >= 2
}

/// Data rows of a markdown table, separator rows dropped.
pub fn split_table_rows(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_table_separator(line) && is_row(line))
        .collect()
}

pub(super) fn row_patches(
    change: &BlockChange,
    records: &[MappingRecord],
    matcher: &BlockMatcher,
    ctx: &mut MatchContext,
) -> Vec<Patch> {
    let old_rows = split_table_rows(&change.old_block.content);
    let new_rows = split_table_rows(&change.new_block.content);
    if old_rows.len() != new_rows.len() {
        log::debug!("table block {} changed row count", change.index);
        return Vec::new();
    }

    let mut containers = ContainerEdits::default();
    for (old_row, new_row) in old_rows.iter().zip(&new_rows) {
        if old_row == new_row {
            continue;
        }
        let old_plain = normalize_table_row(old_row);
        let new_plain = normalize_table_row(new_row);
        if old_plain.is_empty() || old_plain == new_plain {
            continue;
        }
        if containers
            .add_containing(matcher, records, ctx, old_plain, new_plain)
            .is_none()
        {
            log::debug!("table row in block {} left unmatched", change.index);
        }
    }
    containers.into_patches()
}
