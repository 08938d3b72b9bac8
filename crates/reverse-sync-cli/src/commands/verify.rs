use anyhow::{Context, Result};
use clap::Args;
use relative_path::RelativePath;
use reverse_sync_config::{Config, PageIndex, content_path};
use reverse_sync_engine::SyncStatus;
use std::path::PathBuf;

use crate::artifacts::{self, ResultReport, RunInfo};
use crate::converter::ProcessConverter;
use crate::source;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Edited text (file path or <git-ref>:<path>)
    #[arg(long)]
    pub edited: String,

    /// Original text; defaults to main:<edited path>
    #[arg(long)]
    pub original: Option<String>,

    /// Storage markup; defaults to <var_dir>/<page-id>/page.xhtml
    #[arg(long)]
    pub markup: Option<PathBuf>,

    /// Page id; looked up in <var_dir>/pages.yaml when omitted
    #[arg(long)]
    pub page_id: Option<String>,

    /// Artifact directory; defaults to <var_dir>/<page-id>
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// Runs the full roundtrip check for one page and writes its artifacts.
pub fn verify(args: VerifyArgs, config: &Config) -> Result<SyncStatus> {
    let edited = source::resolve(&args.edited)?;
    let edited_path = RelativePath::new(&edited.path);
    let original = match &args.original {
        Some(arg) => source::resolve(arg)?,
        None => {
            let path = content_path(edited_path, &config.content_root)
                .map_or_else(|| edited.path.clone(), |p| p.to_string());
            source::resolve(&format!("main:{path}"))?
        }
    };

    let page_id = match args.page_id {
        Some(id) => Some(id),
        None if args.markup.is_some() && args.out_dir.is_some() => None,
        None => {
            let index = PageIndex::load_from_path(config.page_index_path())?;
            Some(index.resolve(edited_path, &config.content_root)?.to_string())
        }
    };
    let page_dir = page_id.as_deref().map(|id| config.page_dir(id));

    let markup_path = args
        .markup
        .or_else(|| page_dir.as_ref().map(|dir| dir.join("page.xhtml")))
        .context("No markup path: pass --markup or --page-id")?;
    let out_dir = args
        .out_dir
        .or_else(|| page_dir.clone())
        .context("No output directory: pass --out-dir or --page-id")?;
    let markup = std::fs::read_to_string(&markup_path)
        .with_context(|| format!("Failed to read {}", markup_path.display()))?;

    artifacts::clean(&out_dir)?;
    let converter = ProcessConverter::new(
        &config.converter,
        page_id.as_deref().unwrap_or_default(),
        page_dir.as_deref().unwrap_or(&out_dir),
    );
    let outcome = reverse_sync_engine::run(
        &original.content,
        &edited.content,
        &markup,
        &converter,
        &config.match_options(),
    )?;

    let report = ResultReport::new(
        RunInfo {
            page_id,
            original: original.descriptor,
            edited: edited.descriptor,
        },
        &outcome,
    );
    for path in artifacts::write(&out_dir, &report, &outcome)? {
        log::info!("wrote {}", path.display());
    }
    print!("{}", serde_yaml::to_string(&report)?);
    Ok(outcome.status)
}
