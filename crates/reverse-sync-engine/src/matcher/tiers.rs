//! Matching tiers, tried in order until one finds a record.
//!
//! Each tier is an independent [`MatchTier`] so new export quirks can be
//! covered by adding a tier instead of growing one function.

use crate::mapping::MappingRecord;
use crate::normalize::{collapse_ws, strip_emoji, strip_invisible, strip_list_marker, strip_whitespace};

use super::MatchOptions;

/// A normalized query with its derived comparison forms.
#[derive(Debug, Clone)]
pub struct Query {
    pub collapsed: String,
    pub no_space: String,
}

impl Query {
    pub fn new(text: &str) -> Self {
        let collapsed = collapse_ws(text);
        let no_space = strip_whitespace(&collapsed);
        Query {
            collapsed,
            no_space,
        }
    }
}

pub trait MatchTier {
    fn name(&self) -> &'static str;

    /// Picks a record from `candidates`, which holds only unused records in
    /// document order.
    fn find<'r>(
        &self,
        query: &Query,
        candidates: &[&'r MappingRecord],
        options: &MatchOptions,
    ) -> Option<&'r MappingRecord>;
}

/// The built-in tiers in priority order.
pub fn default_tiers() -> Vec<Box<dyn MatchTier>> {
    vec![
        Box::new(Exact),
        Box::new(LongPrefix),
        Box::new(IgnoreWhitespace),
        Box::new(StrippedTier::new("invisible", strip_invisible)),
        Box::new(StrippedTier::new("emoji", strip_emoji)),
        Box::new(StrippedTier::new("list-marker", strip_list_marker)),
    ]
}

/// Equal after whitespace collapsing.
pub struct Exact;

impl MatchTier for Exact {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn find<'r>(
        &self,
        query: &Query,
        candidates: &[&'r MappingRecord],
        _options: &MatchOptions,
    ) -> Option<&'r MappingRecord> {
        candidates
            .iter()
            .find(|r| collapse_ws(&r.plain_text) == query.collapsed)
            .copied()
    }
}

/// One text starts with the first `min_prefix_chars` characters of the
/// other. The candidate closest in length wins.
pub struct LongPrefix;

impl MatchTier for LongPrefix {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn find<'r>(
        &self,
        query: &Query,
        candidates: &[&'r MappingRecord],
        options: &MatchOptions,
    ) -> Option<&'r MappingRecord> {
        let min = options.min_prefix_chars;
        let query_len = query.collapsed.chars().count();
        let query_prefix = char_prefix(&query.collapsed, min);

        let mut best: Option<(usize, &'r MappingRecord)> = None;
        for record in candidates {
            let text = collapse_ws(&record.plain_text);
            let text_len = text.chars().count();
            let qualifies = (query_len >= min && text.starts_with(query_prefix))
                || (text_len >= min && query.collapsed.starts_with(char_prefix(&text, min)));
            if !qualifies {
                continue;
            }
            let distance = text_len.abs_diff(query_len);
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, record));
            }
        }
        best.map(|(_, record)| record)
    }
}

fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((at, _)) => &text[..at],
        None => text,
    }
}

/// Equal once all whitespace is removed.
pub struct IgnoreWhitespace;

impl MatchTier for IgnoreWhitespace {
    fn name(&self) -> &'static str {
        "no-whitespace"
    }

    fn find<'r>(
        &self,
        query: &Query,
        candidates: &[&'r MappingRecord],
        _options: &MatchOptions,
    ) -> Option<&'r MappingRecord> {
        if query.no_space.is_empty() {
            return None;
        }
        candidates
            .iter()
            .find(|r| strip_whitespace(&r.plain_text) == query.no_space)
            .copied()
    }
}

/// Equal ignoring whitespace and whatever `strip` removes.
///
/// First strips both sides (when stripping changes the query), then strips
/// only the record side (when stripping changes the record).
pub struct StrippedTier {
    name: &'static str,
    strip: fn(&str) -> String,
}

impl StrippedTier {
    pub fn new(name: &'static str, strip: fn(&str) -> String) -> Self {
        StrippedTier { name, strip }
    }
}

impl MatchTier for StrippedTier {
    fn name(&self) -> &'static str {
        self.name
    }

    fn find<'r>(
        &self,
        query: &Query,
        candidates: &[&'r MappingRecord],
        _options: &MatchOptions,
    ) -> Option<&'r MappingRecord> {
        if query.no_space.is_empty() {
            return None;
        }
        let strip = self.strip;
        let stripped_query = strip(&query.no_space);

        if !stripped_query.is_empty() && stripped_query != query.no_space {
            let found = candidates
                .iter()
                .find(|r| strip(&strip_whitespace(&r.plain_text)) == stripped_query)
                .copied();
            if found.is_some() {
                return found;
            }
        }

        candidates
            .iter()
            .find(|r| {
                let no_space = strip_whitespace(&r.plain_text);
                let stripped = strip(&no_space);
                stripped != no_space && stripped == query.no_space
            })
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::RecordKind;
    use pretty_assertions::assert_eq;

    fn record(id: &str, plain: &str) -> MappingRecord {
        MappingRecord {
            id: id.to_string(),
            kind: RecordKind::Paragraph,
            path: format!("p[{id}]"),
            markup_text: plain.to_string(),
            plain_text: plain.to_string(),
            ordinal: 1,
            children: Vec::new(),
        }
    }

    fn run(tier: &dyn MatchTier, query: &str, records: &[MappingRecord]) -> Option<String> {
        let candidates: Vec<&MappingRecord> = records.iter().collect();
        tier.find(&Query::new(query), &candidates, &MatchOptions::default())
            .map(|r| r.id.clone())
    }

    #[test]
    fn exact_collapses_whitespace() {
        let records = [record("1", "other"), record("2", "a  b\n c")];
        assert_eq!(run(&Exact, "a b c", &records), Some("2".to_string()));
        assert_eq!(run(&Exact, "abc", &records), None);
    }

    #[test]
    fn prefix_prefers_closest_length() {
        let head = "x".repeat(50);
        let records = [
            record("long", &format!("{head} with a very long tail that goes on")),
            record("close", &format!("{head} tail")),
        ];
        assert_eq!(
            run(&LongPrefix, &format!("{head} tai"), &records),
            Some("close".to_string())
        );
    }

    #[test]
    fn prefix_ties_keep_document_order() {
        let head = "y".repeat(50);
        let records = [record("first", &format!("{head}ab")), record("second", &format!("{head}cd"))];
        assert_eq!(run(&LongPrefix, &format!("{head}zz"), &records), Some("first".to_string()));
    }

    #[test]
    fn prefix_needs_enough_characters() {
        let records = [record("1", "short text that continues")];
        assert_eq!(run(&LongPrefix, "short text", &records), None);
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        let head = "가".repeat(50);
        let records = [record("1", &format!("{head}나다"))];
        assert_eq!(run(&LongPrefix, &format!("{head}라"), &records), Some("1".to_string()));
    }

    #[test]
    fn whitespace_is_ignored() {
        let records = [record("1", "NameValuea1")];
        assert_eq!(run(&IgnoreWhitespace, "Name Value a 1", &records), Some("1".to_string()));
    }

    #[test]
    fn invisible_characters_on_either_side() {
        let tier = StrippedTier::new("invisible", strip_invisible);
        let records = [record("1", "ab\u{200B}c")];
        assert_eq!(run(&tier, "abc", &records), Some("1".to_string()));
        let records = [record("2", "abc")];
        assert_eq!(run(&tier, "a\u{FEFF}bc", &records), Some("2".to_string()));
    }

    #[test]
    fn emoji_on_either_side() {
        let tier = StrippedTier::new("emoji", strip_emoji);
        let records = [record("1", "Done")];
        assert_eq!(run(&tier, "✅ Done", &records), Some("1".to_string()));
        let records = [record("2", "😀 Hello")];
        assert_eq!(run(&tier, "Hello", &records), Some("2".to_string()));
    }

    #[test]
    fn list_markers_on_either_side() {
        let tier = StrippedTier::new("list-marker", strip_list_marker);
        let records = [record("1", "- item text")];
        assert_eq!(run(&tier, "item text", &records), Some("1".to_string()));
        let records = [record("2", "item text")];
        assert_eq!(run(&tier, "1. item text", &records), Some("2".to_string()));
    }
}
