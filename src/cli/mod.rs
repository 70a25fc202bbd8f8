//! Command-line interface for openclaw-sync
//!
//! Provides `merge` and `status` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::SyncError;

mod merge;
mod status;

/// Sync an OpenClaw configuration with the packaged Ollama cloud catalog
#[derive(Parser)]
#[command(name = "openclaw-sync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the packaged model catalog into an OpenClaw config file
    Merge(merge::MergeArgs),

    /// Report which catalog models the local daemon is missing
    Status(status::StatusArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match cli.command {
        Commands::Merge(args) => merge::run(args),
        Commands::Status(args) => status::run(args),
    };

    // Domain errors carry their own exit codes so wrapper scripts can tell
    // a bad flag combination from a failed write.
    if let Err(err) = result {
        if let Some(domain) = err.downcast_ref::<SyncError>() {
            let code = domain.exit_code();
            eprintln!("error: {err:#}");
            std::process::exit(code);
        }
        return Err(err);
    }
    Ok(())
}
