//! openclaw-sync: keep an OpenClaw configuration in step with the packaged
//! Ollama cloud model catalog.
//!
//! Two independent operator commands: `merge` rewrites selected sections of
//! the user's config from the packaged fragment, `status` compares the
//! catalog against a locally-running model daemon and can pull what's missing.

pub mod cli;
pub mod daemon;
pub mod error;
pub mod merge;
