//! Block matcher: resolves a normalized text block to a mapping record.
//!
//! Tiers (see [`tiers`]) are tried in order; when none matches, callers can
//! fall back to [`BlockMatcher::find_containing`]. Consumed records live in
//! a [`MatchContext`] owned by the caller for the duration of one run.

pub mod tiers;

use std::collections::{HashMap, HashSet};

use crate::mapping::MappingRecord;
use crate::normalize::{strip_invisible, strip_whitespace};

pub use tiers::{MatchTier, Query, default_tiers};

/// Thresholds for the fuzzy tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Characters that must agree for a prefix match.
    pub min_prefix_chars: usize,
    /// Visible characters a query needs before containment is attempted.
    pub min_containment_chars: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            min_prefix_chars: 50,
            min_containment_chars: 10,
        }
    }
}

/// Records already claimed during one run.
#[derive(Debug, Default)]
pub struct MatchContext {
    used: HashSet<String>,
    parent_of: HashMap<String, String>,
}

impl MatchContext {
    pub fn new(records: &[MappingRecord]) -> Self {
        let parent_of = records
            .iter()
            .flat_map(|r| r.children.iter().map(|c| (c.clone(), r.id.clone())))
            .collect();
        MatchContext {
            used: HashSet::new(),
            parent_of,
        }
    }

    pub fn is_used(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Claims `record`, its children and its parent.
    pub fn claim(&mut self, record: &MappingRecord) {
        self.used.insert(record.id.clone());
        self.used.extend(record.children.iter().cloned());
        if let Some(parent) = self.parent_of.get(&record.id) {
            self.used.insert(parent.clone());
        }
    }

    /// Claims a single id.
    pub fn claim_id(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }
}

/// A successful tier match.
#[derive(Debug, Clone, Copy)]
pub struct Match<'r> {
    pub record: &'r MappingRecord,
    pub tier: &'static str,
}

pub struct BlockMatcher {
    tiers: Vec<Box<dyn MatchTier>>,
    options: MatchOptions,
}

impl BlockMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self::with_tiers(default_tiers(), options)
    }

    pub fn with_tiers(tiers: Vec<Box<dyn MatchTier>>, options: MatchOptions) -> Self {
        BlockMatcher { tiers, options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Runs the tiers in order over the unclaimed records.
    pub fn find<'r>(
        &self,
        text: &str,
        records: &'r [MappingRecord],
        ctx: &MatchContext,
    ) -> Option<Match<'r>> {
        let query = Query::new(text);
        if query.collapsed.is_empty() {
            return None;
        }
        let candidates = available(records, ctx);
        self.tiers.iter().find_map(|tier| {
            tier.find(&query, &candidates, &self.options)
                .map(|record| Match {
                    record,
                    tier: tier.name(),
                })
        })
    }

    /// Smallest unclaimed record whose visible text contains the query's.
    ///
    /// Queries shorter than `min_containment_chars` visible characters never
    /// match.
    pub fn find_containing<'r>(
        &self,
        text: &str,
        records: &'r [MappingRecord],
        ctx: &MatchContext,
    ) -> Option<&'r MappingRecord> {
        self.find_containing_where(text, records, |record| !ctx.is_used(&record.id))
    }

    /// Like [`find_containing`](Self::find_containing), over the records
    /// `eligible` accepts.
    pub fn find_containing_where<'r>(
        &self,
        text: &str,
        records: &'r [MappingRecord],
        eligible: impl Fn(&MappingRecord) -> bool,
    ) -> Option<&'r MappingRecord> {
        let needle = visible(text);
        if needle.chars().count() < self.options.min_containment_chars.max(1) {
            return None;
        }

        let mut best: Option<(usize, &'r MappingRecord)> = None;
        for record in records.iter().filter(|r| eligible(r)) {
            let haystack = visible(&record.plain_text);
            if !haystack.contains(&needle) {
                continue;
            }
            let len = haystack.chars().count();
            if best.is_none_or(|(shortest, _)| len < shortest) {
                best = Some((len, record));
            }
        }
        best.map(|(_, record)| record)
    }
}

fn available<'r>(records: &'r [MappingRecord], ctx: &MatchContext) -> Vec<&'r MappingRecord> {
    records.iter().filter(|r| !ctx.is_used(&r.id)).collect()
}

fn visible(text: &str) -> String {
    strip_invisible(&strip_whitespace(text))
}
