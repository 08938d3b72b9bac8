//! Diagnostic files written next to a page: `reverse-sync.*`.

use anyhow::{Context, Result};
use reverse_sync_engine::{MappingRecord, Patch, SyncOutcome, SyncStatus};
use serde::Serialize;
use std::path::{Path, PathBuf};

const PREFIX: &str = "reverse-sync.";

/// Identifies the run in every artifact.
#[derive(Debug, Clone, Serialize)]
pub struct RunInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    pub original: String,
    pub edited: String,
}

#[derive(Debug, Serialize)]
struct DiffFile<'a> {
    #[serde(flatten)]
    run: &'a RunInfo,
    changes: Vec<ChangeEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ChangeEntry<'a> {
    index: usize,
    block_id: String,
    old_content: &'a str,
    new_content: &'a str,
}

#[derive(Debug, Serialize)]
struct MappingFile<'a> {
    #[serde(flatten)]
    run: &'a RunInfo,
    source: &'a str,
    blocks: &'a [MappingRecord],
}

#[derive(Debug, Serialize)]
struct PatchesFile<'a> {
    #[serde(flatten)]
    run: &'a RunInfo,
    patches: &'a [Patch],
}

/// Summary printed to stdout and saved as `reverse-sync.result.yaml`.
#[derive(Debug, Clone, Serialize)]
pub struct ResultReport {
    #[serde(flatten)]
    pub run: RunInfo,
    pub status: SyncStatus,
    pub changes_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub exact_match: bool,
    pub diff_report: String,
}

impl ResultReport {
    pub fn new(run: RunInfo, outcome: &SyncOutcome) -> Self {
        ResultReport {
            run,
            status: outcome.status,
            changes_count: outcome.plan.changes.len(),
            verification: outcome.verification.as_ref().map(|v| Verification {
                exact_match: v.passed,
                diff_report: v.diff_report.clone(),
            }),
        }
    }
}

/// Removes `reverse-sync.*` files left by an earlier run, creating the
/// directory if needed.
pub fn clean(out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    for entry in std::fs::read_dir(out_dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(PREFIX) && entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Writes the artifacts of `outcome`; only the result file when nothing
/// changed. Returns the paths written.
pub fn write(out_dir: &Path, report: &ResultReport, outcome: &SyncOutcome) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let run = &report.run;
    let plan = &outcome.plan;

    if outcome.status != SyncStatus::NoChanges {
        let diff = DiffFile {
            run,
            changes: plan
                .changes
                .iter()
                .map(|c| ChangeEntry {
                    index: c.index,
                    block_id: format!("{}-{}", c.old_block.kind.as_str(), c.index),
                    old_content: &c.old_block.content,
                    new_content: &c.new_block.content,
                })
                .collect(),
        };
        written.push(write_yaml(out_dir, "diff.yaml", &diff)?);
        written.push(write_yaml(
            out_dir,
            "mapping.original.yaml",
            &MappingFile {
                run,
                source: "page.xhtml",
                blocks: &plan.original_mapping,
            },
        )?);
        written.push(write_yaml(
            out_dir,
            "patches.yaml",
            &PatchesFile {
                run,
                patches: &plan.patches,
            },
        )?);
        written.push(write_text(out_dir, "patched.xhtml", &plan.patched_markup)?);
        written.push(write_yaml(
            out_dir,
            "mapping.patched.yaml",
            &MappingFile {
                run,
                source: "reverse-sync.patched.xhtml",
                blocks: &plan.patched_mapping,
            },
        )?);
    }

    written.push(write_yaml(out_dir, "result.yaml", report)?);
    Ok(written)
}

fn write_yaml<T: Serialize>(out_dir: &Path, name: &str, value: &T) -> Result<PathBuf> {
    write_text(out_dir, name, &serde_yaml::to_string(value)?)
}

fn write_text(out_dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = out_dir.join(format!("{PREFIX}{name}"));
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
