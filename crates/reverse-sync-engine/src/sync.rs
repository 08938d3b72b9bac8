//! Orchestration of one reverse-sync run over a single page.

use serde::Serialize;

use crate::converter::ForwardConverter;
use crate::diff::{BlockChange, diff_blocks};
use crate::error::SyncError;
use crate::mapping::{MappingRecord, record_mapping};
use crate::matcher::{BlockMatcher, MatchOptions};
use crate::parsing::parse_blocks;
use crate::patcher::apply_patches;
use crate::patches::{Patch, build_patches};
use crate::verify::{VerifyResult, verify};

/// Everything computed before verification.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub changes: Vec<BlockChange>,
    pub original_mapping: Vec<MappingRecord>,
    pub patches: Vec<Patch>,
    pub patched_markup: String,
    pub patched_mapping: Vec<MappingRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    NoChanges,
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub status: SyncStatus,
    pub plan: Plan,
    /// Converter output for the patched markup; `None` when nothing changed.
    pub roundtrip_text: Option<String>,
    pub verification: Option<VerifyResult>,
}

/// Parses, diffs, maps, matches and patches without verifying.
pub fn plan(
    original: &str,
    edited: &str,
    markup: &str,
    options: &MatchOptions,
) -> Result<Plan, SyncError> {
    let changes = diff_blocks(&parse_blocks(original), &parse_blocks(edited))?;
    let original_mapping = record_mapping(markup);
    let matcher = BlockMatcher::new(*options);
    let patches = build_patches(&changes, &original_mapping, &matcher);
    let patched_markup = apply_patches(markup, &patches);
    let patched_mapping = record_mapping(&patched_markup);
    log::debug!(
        "{} change(s), {} record(s), {} patch(es)",
        changes.len(),
        original_mapping.len(),
        patches.len()
    );

    Ok(Plan {
        changes,
        original_mapping,
        patches,
        patched_markup,
        patched_mapping,
    })
}

/// Runs [`plan`] and checks the patched markup converts back to `edited`.
///
/// The converter is not called when the two texts have no block changes.
pub fn run(
    original: &str,
    edited: &str,
    markup: &str,
    converter: &dyn ForwardConverter,
    options: &MatchOptions,
) -> Result<SyncOutcome, SyncError> {
    let plan = plan(original, edited, markup, options)?;
    if plan.changes.is_empty() {
        return Ok(SyncOutcome {
            status: SyncStatus::NoChanges,
            plan,
            roundtrip_text: None,
            verification: None,
        });
    }

    let roundtrip = converter.convert(&plan.patched_markup)?;
    let verification = verify(edited, &roundtrip);
    let status = if verification.passed {
        SyncStatus::Pass
    } else {
        SyncStatus::Fail
    };
    Ok(SyncOutcome {
        status,
        plan,
        roundtrip_text: Some(roundtrip),
        verification: Some(verification),
    })
}
