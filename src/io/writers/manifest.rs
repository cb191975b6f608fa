use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::types::IoPriority;

/// Record of a launched job, written next to its log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub command: Vec<String>,
    pub command_line: String,
    pub log: PathBuf,
    pub tmpdir: PathBuf,
    pub interpreter: PathBuf,
    /// Activated environment name, None for an explicit interpreter
    pub environment: Option<String>,
    pub nice: i32,
    pub io: IoPriority,
}

/// `run.log` -> `run.json`; a log that already ends in `.json` gets `.manifest.json` appended.
pub fn manifest_path(log: &Path) -> PathBuf {
    let candidate = log.with_extension("json");
    if candidate == log {
        let mut name = log.as_os_str().to_owned();
        name.push(".manifest.json");
        PathBuf::from(name)
    } else {
        candidate
    }
}

/// Write the manifest sidecar for `manifest.log`, returning its path.
pub fn write_manifest(manifest: &RunManifest) -> Result<PathBuf> {
    let path = manifest_path(&manifest.log);
    let json_string = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json_string)?;
    info!("Created run manifest: {:?}", path);
    Ok(path)
}
