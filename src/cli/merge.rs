//! Merge command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::SyncError;
use crate::merge::{self, document, MergeScope, SectionOutcome};

#[derive(Args)]
pub struct MergeArgs {
    /// Path to the packaged model catalog fragment
    #[arg(short, long, value_name = "FILE", default_value = "ollama-cloud.json")]
    pub source: PathBuf,

    /// OpenClaw config to update (defaults to ~/.openclaw/openclaw.json)
    #[arg(short, long, value_name = "FILE")]
    pub target: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Snapshot the target to a timestamped .bak file before overwriting
    #[arg(long)]
    pub backup: bool,

    /// Restrict the merge to the models.providers.ollama section
    #[arg(long)]
    pub only_models: bool,

    /// Restrict the merge to the agents.defaults.* sections
    #[arg(long)]
    pub only_agents: bool,
}

pub fn run(args: MergeArgs) -> Result<()> {
    let scope = resolve_scope(&args)?;
    let target_path = match &args.target {
        Some(path) => path.clone(),
        None => default_target_path()?,
    };

    // Both documents must parse before anything on disk changes.
    let source = document::load_document(&args.source)?;
    let target_existed = target_path.exists();
    let mut target = document::load_target(&target_path)?;

    let outcomes = merge::merge_document(&mut target, &source, scope);

    if args.dry_run {
        render_preview(&outcomes);
        println!();
        println!("Dry run complete; no files were written.");
        return Ok(());
    }

    if args.backup {
        if target_existed {
            let backup_path = document::write_backup(&target_path)?;
            println!("Backup written to {}", backup_path.display());
        } else {
            tracing::debug!("target does not exist yet, nothing to back up");
        }
    }

    document::write_atomic(&target_path, &target)?;
    render_summary(&outcomes, &target_path);
    Ok(())
}

fn resolve_scope(args: &MergeArgs) -> Result<MergeScope, SyncError> {
    match (args.only_models, args.only_agents) {
        (true, true) => Err(SyncError::Configuration(
            "--only-models and --only-agents are mutually exclusive".to_string(),
        )),
        (true, false) => Ok(MergeScope::ModelsOnly),
        (false, true) => Ok(MergeScope::AgentsOnly),
        (false, false) => Ok(MergeScope::All),
    }
}

fn default_target_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("could not determine home directory; pass --target"))?;
    Ok(home.join(".openclaw").join("openclaw.json"))
}

fn render_preview(outcomes: &[SectionOutcome]) {
    println!("Previewing merge");
    for outcome in outcomes {
        match outcome {
            SectionOutcome::Updated { section, old, new } => {
                println!("  {} {} would update", style("~").yellow(), section);
                println!("      old: {}", preview(old));
                println!("      new: {}", preview(new));
            }
            SectionOutcome::Created { section, new } => {
                println!(
                    "  {} {} did not previously exist",
                    style("+").green(),
                    section
                );
                println!("      new: {}", preview(new));
            }
            SectionOutcome::Unchanged { section } => {
                println!("  {} {} already up to date", style("=").dim(), section);
            }
            SectionOutcome::SkippedMissingSource { section } => {
                println!(
                    "  {} {} skipped (not present in source)",
                    style("!").yellow(),
                    section
                );
            }
        }
    }
}

fn render_summary(outcomes: &[SectionOutcome], target_path: &Path) {
    println!("Merged into {}", target_path.display());
    for outcome in outcomes {
        match outcome {
            SectionOutcome::Updated { section, .. } => {
                println!("  {} {} updated", style("✓").green(), section);
            }
            SectionOutcome::Created { section, .. } => {
                println!("  {} {} created", style("✓").green(), section);
            }
            SectionOutcome::Unchanged { section } => {
                println!("  {} {} already up to date", style("=").dim(), section);
            }
            SectionOutcome::SkippedMissingSource { section } => {
                println!(
                    "  {} {} skipped (not present in source)",
                    style("!").yellow(),
                    section
                );
            }
        }
    }
}

/// Compact single-line rendering, truncated so large model tables stay
/// readable in a terminal.
fn preview(value: &Value) -> String {
    const MAX_CHARS: usize = 96;
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX_CHARS {
        return rendered;
    }
    let truncated: String = rendered.chars().take(MAX_CHARS).collect();
    format!("{truncated}...")
}
