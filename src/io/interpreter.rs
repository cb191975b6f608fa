//! Interpreter resolution: an explicit `--python` path, or the interpreter of a
//! named conda environment.
//!
//! Activation is queried through `conda run` rather than sourced into this
//! process, so the launcher's own environment is never touched. The environment
//! is instead applied to the child's environment at spawn time (see
//! [`Interpreter::apply_env`]).
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::core::defaults::ACTIVATION_TOOL;
use crate::core::params::LaunchParams;
use crate::error::{Error, Result};

const EXE_MARKER: &str = "MAXPROJ_EXE=";
const PREFIX_MARKER: &str = "MAXPROJ_PREFIX=";
const PROBE: &str =
    "import sys; print('MAXPROJ_EXE=' + sys.executable); print('MAXPROJ_PREFIX=' + sys.prefix)";

/// A conda environment the interpreter was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedEnv {
    pub name: String,
    pub prefix: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub path: PathBuf,
    /// None when the interpreter was given explicitly
    pub env: Option<ActivatedEnv>,
}

impl Interpreter {
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env: None,
        }
    }

    /// Give the child the variables an activated shell would have.
    pub fn apply_env(&self, cmd: &mut Command) {
        let Some(activated) = &self.env else {
            return;
        };
        cmd.env("CONDA_PREFIX", &activated.prefix);
        cmd.env("CONDA_DEFAULT_ENV", &activated.name);

        let bin = activated.prefix.join("bin");
        let current = env::var_os("PATH").unwrap_or_default();
        let paths = std::iter::once(bin).chain(env::split_paths(&current));
        match env::join_paths(paths) {
            Ok(joined) => {
                cmd.env("PATH", joined);
            }
            Err(e) => warn!("Leaving PATH unchanged for the job: {}", e),
        }
    }
}

/// Resolve the interpreter for this run.
pub fn resolve(params: &LaunchParams) -> Result<Interpreter> {
    if let Some(python) = &params.python {
        debug!("Using explicit interpreter {:?}", python);
        return Ok(Interpreter::explicit(python));
    }

    let tool = locate_tool(
        ACTIVATION_TOOL,
        env::var_os("CONDA_EXE"),
        env::var_os("PATH"),
    )
    .ok_or(Error::ActivationToolMissing {
        tool: ACTIVATION_TOOL,
    })?;
    info!("Activating '{}' with {:?}", params.env_name, tool);
    activate(&tool, &params.env_name)
}

/// Find `name` as an executable file: `hint` first (if it exists), then each `PATH` entry.
pub fn locate_tool(name: &str, hint: Option<OsString>, path: Option<OsString>) -> Option<PathBuf> {
    if let Some(hint) = hint.filter(|h| !h.is_empty()) {
        let hint = PathBuf::from(hint);
        if is_executable(&hint) {
            return Some(hint);
        }
    }
    let path = path?;
    env::split_paths(&path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Ask `tool` for the interpreter and prefix of environment `env_name`.
pub fn activate(tool: &Path, env_name: &str) -> Result<Interpreter> {
    let output = Command::new(tool)
        .args(["run", "-n", env_name, "python", "-c", PROBE])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::activation(env_name, format!("{}: {}", tool.display(), e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::activation(
            env_name,
            if stderr.is_empty() {
                format!("{} exited with {}", tool.display(), output.status)
            } else {
                stderr
            },
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let (exe, prefix) = parse_probe(&stdout).ok_or_else(|| {
        Error::activation(env_name, "environment did not report an interpreter")
    })?;
    debug!("Environment '{}' resolved to {:?} (prefix {:?})", env_name, exe, prefix);

    Ok(Interpreter {
        path: exe,
        env: Some(ActivatedEnv {
            name: env_name.to_string(),
            prefix,
        }),
    })
}

fn parse_probe(stdout: &str) -> Option<(PathBuf, PathBuf)> {
    let mut exe = None;
    let mut prefix = None;
    for line in stdout.lines().map(str::trim) {
        if let Some(v) = line.strip_prefix(EXE_MARKER) {
            exe = Some(PathBuf::from(v));
        } else if let Some(v) = line.strip_prefix(PREFIX_MARKER) {
            prefix = Some(PathBuf::from(v));
        }
    }
    match (exe, prefix) {
        (Some(exe), Some(prefix)) if !exe.as_os_str().is_empty() => Some((exe, prefix)),
        _ => None,
    }
}
