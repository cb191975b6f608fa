use std::path::PathBuf;

use crate::core::defaults::{DEFAULT_ENV, DEFAULT_NICE, Defaults};
use crate::types::IoPriority;

/// Run configuration, resolved once per invocation and never mutated after launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Environment to activate; ignored when `python` is set
    pub env_name: String,
    /// Explicit interpreter, used verbatim
    pub python: Option<PathBuf>,
    pub tmpdir: PathBuf,
    pub script: PathBuf,
    /// Cap on fields of view processed; None means all
    pub fovs: Option<u32>,
    /// Explicit log file; None derives one from `output` under `log_dir`
    pub log: Option<PathBuf>,
    pub log_dir: PathBuf,
    /// Niceness increment for the job, as for `nice -n`
    pub nice: i32,
    pub io: IoPriority,
}

impl LaunchParams {
    /// Parameters for `input -> output` with every optional setting at its default.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, defaults: &Defaults) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            env_name: DEFAULT_ENV.to_string(),
            python: None,
            tmpdir: defaults.tmpdir.clone(),
            script: defaults.script.clone(),
            fovs: None,
            log: None,
            log_dir: defaults.log_dir.clone(),
            nice: DEFAULT_NICE,
            io: IoPriority::default(),
        }
    }
}
