//! Selective configuration merge
//!
//! Replaces whole subtrees of the target at the addressable paths with the
//! corresponding subtrees of the packaged source. Keys outside the effective
//! path set are never touched, and values inside it are never key-merged:
//! replacement is all-or-nothing per path.

pub mod document;
pub mod path;

use serde_json::Value;
use tracing::warn;

use self::path::{get_path, set_path};

/// The model provider section of the target config.
pub const MODELS_PROVIDER: &str = "models.providers.ollama";
/// The default agent model.
pub const AGENT_PRIMARY: &str = "agents.defaults.model.primary";
/// Fallback models tried when the primary is unavailable.
pub const AGENT_FALLBACKS: &str = "agents.defaults.model.fallbacks";
/// Per-model agent aliases.
pub const AGENT_ALIASES: &str = "agents.defaults.models";

const ALL_PATHS: [&str; 4] = [MODELS_PROVIDER, AGENT_PRIMARY, AGENT_FALLBACKS, AGENT_ALIASES];
const AGENT_PATHS: [&str; 3] = [AGENT_PRIMARY, AGENT_FALLBACKS, AGENT_ALIASES];
const MODEL_PATHS: [&str; 1] = [MODELS_PROVIDER];

/// Which addressable sections a merge run touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeScope {
    All,
    ModelsOnly,
    AgentsOnly,
}

impl MergeScope {
    pub fn paths(self) -> &'static [&'static str] {
        match self {
            MergeScope::All => &ALL_PATHS,
            MergeScope::ModelsOnly => &MODEL_PATHS,
            MergeScope::AgentsOnly => &AGENT_PATHS,
        }
    }
}

/// What happened to one addressable path during a merge.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionOutcome {
    /// The path did not exist in the target and was inserted
    Created { section: &'static str, new: Value },
    /// The existing subtree was replaced with the source's value
    Updated { section: &'static str, old: Value, new: Value },
    /// Target already carries the source's value
    Unchanged { section: &'static str },
    /// The source fragment does not carry this section
    SkippedMissingSource { section: &'static str },
}

impl SectionOutcome {
    pub fn section(&self) -> &'static str {
        match self {
            SectionOutcome::Created { section, .. }
            | SectionOutcome::Updated { section, .. }
            | SectionOutcome::Unchanged { section }
            | SectionOutcome::SkippedMissingSource { section } => section,
        }
    }
}

/// Replace each in-scope subtree of `target` with the source's subtree.
///
/// A section missing from the source is skipped with a warning, never an
/// error: the packaged fragment is authoritative but may legitimately drop
/// a section in a future revision.
pub fn merge_document(
    target: &mut Value,
    source: &Value,
    scope: MergeScope,
) -> Vec<SectionOutcome> {
    let mut outcomes = Vec::with_capacity(scope.paths().len());

    for &section in scope.paths() {
        let Some(new) = get_path(source, section) else {
            warn!("skipping {section}: not present in source");
            outcomes.push(SectionOutcome::SkippedMissingSource { section });
            continue;
        };

        match get_path(target, section).cloned() {
            Some(old) if old == *new => {
                outcomes.push(SectionOutcome::Unchanged { section });
            }
            Some(old) => {
                set_path(target, section, new.clone());
                outcomes.push(SectionOutcome::Updated { section, old, new: new.clone() });
            }
            None => {
                set_path(target, section, new.clone());
                outcomes.push(SectionOutcome::Created { section, new: new.clone() });
            }
        }
    }

    outcomes
}
