//! Input validation, working-directory setup and log path derivation.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::defaults::{LOG_SUFFIX, OUTPUT_SUFFIX};
use crate::core::params::LaunchParams;
use crate::error::{Error, Result};

/// The input must be an existing regular file.
pub fn validate_input(input: &Path) -> Result<()> {
    if input.is_file() {
        Ok(())
    } else {
        Err(Error::InputNotFound {
            path: input.to_path_buf(),
        })
    }
}

/// Create `dir` and its parents; succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    debug!("Directory ready: {:?}", dir);
    Ok(())
}

/// Base name of `output` with a trailing `.ome.tif` removed.
pub fn log_stem(output: &Path) -> String {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    match name.strip_suffix(OUTPUT_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// `<log_dir>/<stem>.log` for the given output path.
pub fn default_log_path(log_dir: &Path, output: &Path) -> PathBuf {
    log_dir.join(format!("{}{}", log_stem(output), LOG_SUFFIX))
}

/// Explicit `--log` wins; otherwise derive from the output name.
pub fn resolve_log_path(params: &LaunchParams) -> PathBuf {
    match &params.log {
        Some(path) => path.clone(),
        None => default_log_path(&params.log_dir, &params.output),
    }
}

/// Create the log file's parent directory, if it has one.
pub fn ensure_log_parent(log: &Path) -> Result<()> {
    match log.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
