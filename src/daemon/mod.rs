//! Model daemon interface and the install/pull reporter
//!
//! The daemon is a local HTTP service; modeling it as a trait keeps the
//! reporter logic testable without a running daemon.

pub mod http;

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::SyncError;
use crate::merge::path::get_path;
use crate::merge::MODELS_PROVIDER;

/// The two capabilities the reporter needs from a model daemon.
pub trait ModelDaemon {
    /// Names of every model currently installed on the daemon.
    fn list_installed_models(&self) -> Result<BTreeSet<String>, SyncError>;

    /// Pull one model by name. Single attempt, no retry.
    fn pull_model(&self, name: &str) -> Result<(), SyncError>;
}

/// Model ids the packaged fragment expects the daemon to serve.
pub fn required_models(source: &Value) -> Vec<String> {
    let models_path = format!("{MODELS_PROVIDER}.models");
    let Some(models) = get_path(source, &models_path).and_then(Value::as_array) else {
        return Vec::new();
    };
    models
        .iter()
        .filter_map(|model| model.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Outcome of one status/pull pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub installed: Vec<String>,
    pub missing: Vec<String>,
    pub pulled: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Compare `required` against the daemon's installed set. When `pull` is
/// set, attempt one pull per missing model; a failed pull is recorded and
/// the remaining models are still attempted.
pub fn sync_models(
    daemon: &dyn ModelDaemon,
    required: &[String],
    pull: bool,
) -> Result<SyncReport, SyncError> {
    let present = daemon.list_installed_models()?;
    let mut report = SyncReport::default();

    for name in required {
        if present.contains(name) {
            report.installed.push(name.clone());
            continue;
        }
        report.missing.push(name.clone());
        if pull {
            match daemon.pull_model(name) {
                Ok(()) => report.pulled.push(name.clone()),
                Err(err) => report.failed.push((name.clone(), err.to_string())),
            }
        }
    }

    Ok(report)
}
