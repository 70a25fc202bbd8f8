//! Status command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::time::Duration;

use crate::daemon::http::{OllamaClient, DEFAULT_BASE_URL};
use crate::daemon::{required_models, sync_models};
use crate::error::SyncError;
use crate::merge::document;

#[derive(Args)]
pub struct StatusArgs {
    /// Path to the packaged model catalog fragment
    #[arg(short, long, value_name = "FILE", default_value = "ollama-cloud.json")]
    pub source: PathBuf,

    /// Base URL of the local model daemon
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Pull each missing model (one attempt per model, no retry)
    #[arg(long)]
    pub pull: bool,

    /// Timeout in seconds for the installed-models probe
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let source = document::load_document(&args.source)?;
    let required = required_models(&source);
    if required.is_empty() {
        println!("No models listed in {}", args.source.display());
        return Ok(());
    }

    let client = OllamaClient::new(&args.base_url, Duration::from_secs(args.timeout_secs))?;
    let report = sync_models(&client, &required, args.pull)?;

    println!("Daemon at {}", args.base_url);
    for name in &report.installed {
        println!("  {} {} installed", style("✓").green(), name);
    }
    for name in &report.missing {
        if report.pulled.contains(name) {
            println!("  {} {} pulled", style("✓").green(), name);
        } else if let Some((_, reason)) = report.failed.iter().find(|(failed, _)| failed == name) {
            println!("  {} {} pull failed: {}", style("✗").red(), name, reason);
        } else {
            println!("  {} {} missing (run with --pull to fetch)", style("✗").red(), name);
        }
    }

    if !report.failed.is_empty() {
        return Err(SyncError::Daemon(format!("{} model pull(s) failed", report.failed.len())).into());
    }
    Ok(())
}
