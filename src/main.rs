//! openclaw-sync: merge the packaged Ollama cloud model catalog into an
//! OpenClaw configuration and keep the local daemon's models in sync.

use anyhow::Result;

fn main() -> Result<()> {
    openclaw_sync::cli::run()
}
