//! Blocking HTTP client for an Ollama-compatible daemon

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::ModelDaemon;
use crate::error::SyncError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// One client per invocation, two timeout regimes: the list probe is bounded
/// by `timeout`, while pulls run without a read deadline since large models
/// legitimately take minutes to download.
pub struct OllamaClient {
    base_url: String,
    probe: reqwest::blocking::Client,
    pull: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<InstalledModel>,
}

#[derive(Deserialize)]
struct InstalledModel {
    name: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let probe = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|err| SyncError::Daemon(err.to_string()))?;
        let pull = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None)
            .build()
            .map_err(|err| SyncError::Daemon(err.to_string()))?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), probe, pull })
    }
}

impl ModelDaemon for OllamaClient {
    fn list_installed_models(&self) -> Result<BTreeSet<String>, SyncError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .probe
            .get(&url)
            .send()
            .map_err(|err| SyncError::Daemon(format!("GET {url}: {err}")))?;
        if !response.status().is_success() {
            return Err(SyncError::Daemon(format!("GET {url}: HTTP {}", response.status())));
        }
        let tags: TagsResponse = response
            .json()
            .map_err(|err| SyncError::Daemon(format!("GET {url}: invalid response: {err}")))?;
        Ok(tags.models.into_iter().map(|model| model.name).collect())
    }

    fn pull_model(&self, name: &str) -> Result<(), SyncError> {
        let url = format!("{}/api/pull", self.base_url);
        let response = self
            .pull
            .post(&url)
            .json(&json!({"name": name, "stream": false}))
            .send()
            .map_err(|err| SyncError::Daemon(format!("pull {name}: {err}")))?;
        if !response.status().is_success() {
            return Err(SyncError::Daemon(format!("pull {name}: HTTP {}", response.status())));
        }
        Ok(())
    }
}
