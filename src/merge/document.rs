//! Document loading and write discipline
//!
//! Both documents must parse before anything on disk changes. Writes go
//! through a temp-file-then-rename so a crash mid-write never leaves a
//! half-written target, and backups are byte copies of the original file,
//! taken before the destructive write.

use crate::error::SyncError;
use chrono::Local;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Load a required JSON object document. A missing file is `NotFound`.
pub fn load_document(path: &Path) -> Result<Value, SyncError> {
    if !path.exists() {
        return Err(SyncError::NotFound(path.to_path_buf()));
    }
    read_object(path)
}

/// Load the target document. A missing target is not an error: the merge
/// degrades to a pure insertion into an empty object.
pub fn load_target(path: &Path) -> Result<Value, SyncError> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }
    read_object(path)
}

fn read_object(path: &Path) -> Result<Value, SyncError> {
    let content = fs::read_to_string(path).map_err(|err| SyncError::Parse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let doc: Value = serde_json::from_str(&content).map_err(|err| SyncError::Parse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    if !doc.is_object() {
        return Err(SyncError::Parse {
            path: path.to_path_buf(),
            reason: "top-level value is not a JSON object".to_string(),
        });
    }
    Ok(doc)
}

/// Serialize `doc` with 2-space indentation and replace `path` atomically:
/// the rendered document lands in a temp file in the same directory, then a
/// rename swaps it in. Parent directories are created as needed.
pub fn write_atomic(path: &Path, doc: &Value) -> Result<(), SyncError> {
    let mut rendered = serde_json::to_string_pretty(doc).map_err(|err| SyncError::Write {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    rendered.push('\n');

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|err| SyncError::Write {
        path: parent.clone(),
        reason: err.to_string(),
    })?;

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("config.json");
    let tmp = parent.join(format!(".{file_name}.tmp"));
    fs::write(&tmp, rendered).map_err(|err| SyncError::Write {
        path: tmp.clone(),
        reason: err.to_string(),
    })?;
    fs::rename(&tmp, path).map_err(|err| SyncError::Write {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Copy the pre-merge target to a timestamped sibling, e.g.
/// `openclaw.json.20260804T101530.bak`. Callers must take the backup before
/// overwriting the target; a failure here aborts the merge with the
/// original intact.
pub fn write_backup(path: &Path) -> Result<PathBuf, SyncError> {
    let file_name =
        path.file_name().and_then(|n| n.to_str()).ok_or_else(|| SyncError::Write {
            path: path.to_path_buf(),
            reason: "target has no file name".to_string(),
        })?;
    let stamp = Local::now().format("%Y%m%dT%H%M%S");
    let backup = path.with_file_name(format!("{file_name}.{stamp}.bak"));
    fs::copy(path, &backup).map_err(|err| SyncError::Write {
        path: backup.clone(),
        reason: err.to_string(),
    })?;
    Ok(backup)
}
