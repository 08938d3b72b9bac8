use anyhow::{Context, Result};
use clap::Args;
use reverse_sync_config::Config;
use std::path::PathBuf;

use crate::source;

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Original text (file path or <git-ref>:<path>)
    #[arg(long)]
    pub original: String,

    /// Edited text (file path or <git-ref>:<path>)
    #[arg(long)]
    pub edited: String,

    /// Storage markup the original text was generated from
    #[arg(long)]
    pub markup: PathBuf,
}

/// Prints the patches as YAML without running the converter.
pub fn plan(args: PlanArgs, config: &Config) -> Result<()> {
    let original = source::resolve(&args.original)?;
    let edited = source::resolve(&args.edited)?;
    let markup = std::fs::read_to_string(&args.markup)
        .with_context(|| format!("Failed to read {}", args.markup.display()))?;

    let plan = reverse_sync_engine::plan(
        &original.content,
        &edited.content,
        &markup,
        &config.match_options(),
    )?;
    print!("{}", serde_yaml::to_string(&plan.patches)?);
    Ok(())
}
