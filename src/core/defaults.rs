//! Fixed launcher defaults, anchored at the invoking user's home directory.
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment activated when no `--python` is given.
pub const DEFAULT_ENV: &str = "nd2";
/// CPU niceness applied to the job.
pub const DEFAULT_NICE: i32 = 10;
/// Suffix stripped from the output name when deriving the log name.
pub const OUTPUT_SUFFIX: &str = ".ome.tif";
/// Suffix appended to derived log names.
pub const LOG_SUFFIX: &str = ".log";
/// Environment-activation tool looked up on `PATH`.
pub const ACTIVATION_TOOL: &str = "conda";
/// Environment variable that overrides the external script path.
pub const SCRIPT_ENV_VAR: &str = "MAXPROJ_SCRIPT";

const SCRIPT_NAME: &str = "max_project_nd2_stream.py";

/// Home-relative locations used when the caller does not override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub tmpdir: PathBuf,
    pub log_dir: PathBuf,
    pub script: PathBuf,
}

impl Defaults {
    pub fn for_home(home: &Path) -> Self {
        let project = home.join("max_proj");
        Self {
            tmpdir: home.join("tmp"),
            log_dir: project.join("logs"),
            script: project.join(SCRIPT_NAME),
        }
    }

    /// Resolve defaults from `$HOME`.
    pub fn from_env() -> Result<Self> {
        match env::var_os("HOME") {
            Some(home) if !home.is_empty() => Ok(Self::for_home(Path::new(&home))),
            _ => Err(Error::HomeNotSet),
        }
    }
}
