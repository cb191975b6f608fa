//! High-level library API: resolve a run into a [`LaunchPlan`] and start it
//! as a detached background job. The CLI is a thin layer over these two calls.
//!
//! Steps run strictly in order and any failure stops before the spawn:
//! validate input → create working/log directories → resolve log path →
//! resolve interpreter → assemble command → spawn → write manifest.
use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use crate::core::command::JobCommand;
use crate::core::params::LaunchParams;
use crate::core::paths::{ensure_dir, ensure_log_parent, resolve_log_path, validate_input};
use crate::error::Result;
use crate::io::interpreter::{self, Interpreter};
use crate::io::spawn::{Scheduling, spawn_detached};
use crate::io::writers::manifest::{RunManifest, write_manifest};

/// Everything resolved for one run, before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub params: LaunchParams,
    pub log: PathBuf,
    pub interpreter: Interpreter,
    pub command: JobCommand,
}

impl LaunchPlan {
    pub fn scheduling(&self) -> Scheduling {
        Scheduling {
            nice: self.params.nice,
            io: self.params.io,
        }
    }
}

/// A started job.
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub plan: LaunchPlan,
    pub pid: u32,
    /// Manifest sidecar, None if it could not be written
    pub manifest: Option<PathBuf>,
}

/// Validate and resolve `params` without starting anything.
///
/// Creates the working directory, the log directory and the log file's parent.
/// The log file itself is not touched.
pub fn plan(params: LaunchParams) -> Result<LaunchPlan> {
    validate_input(&params.input)?;
    ensure_dir(&params.tmpdir)?;
    ensure_dir(&params.log_dir)?;

    let log = resolve_log_path(&params);
    ensure_log_parent(&log)?;

    let interpreter = interpreter::resolve(&params)?;
    let command = JobCommand::build(&interpreter.path, &params);
    info!("Planned job: {}", command.display_line());

    Ok(LaunchPlan {
        params,
        log,
        interpreter,
        command,
    })
}

/// Start a planned job in the background. Does not wait for it.
pub fn execute(plan: LaunchPlan) -> Result<LaunchReport> {
    let pid = spawn_detached(
        &plan.command,
        &plan.interpreter,
        plan.scheduling(),
        &plan.log,
    )?;
    info!("Job started with pid {}", pid);

    let manifest = RunManifest {
        pid,
        started_at: Utc::now(),
        command: plan.command.to_strings(),
        command_line: plan.command.display_line(),
        log: plan.log.clone(),
        tmpdir: plan.params.tmpdir.clone(),
        interpreter: plan.interpreter.path.clone(),
        environment: plan.interpreter.env.as_ref().map(|e| e.name.clone()),
        nice: plan.params.nice,
        io: plan.params.io,
    };
    // The job is already running; a missing manifest is not worth failing over.
    let manifest = match write_manifest(&manifest) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Could not write run manifest: {}", e);
            None
        }
    };

    Ok(LaunchReport {
        plan,
        pid,
        manifest,
    })
}

/// [`plan`] then [`execute`].
pub fn launch(params: LaunchParams) -> Result<LaunchReport> {
    execute(plan(params)?)
}
