//! Detached, priority-adjusted spawn of the job.
//!
//! ## Overview
//!
//! The job is started with `std::process::Command` and never waited on:
//! - stdin is `/dev/null`; stdout and stderr share one freshly truncated log file;
//! - on **Unix** a `pre_exec` hook, run in the child after `fork()` and before
//!   `execve()`, starts a new session (`setsid`) so the job survives the
//!   launcher's terminal, then raises the CPU niceness by the requested increment;
//! - on **Linux** the same hook also sets the I/O scheduling class and level
//!   (`ioprio_set`). Other Unix systems skip it with a warning. Priority
//!   changes the kernel refuses are skipped and the job still starts;
//! - on **non-Unix** platforms the job is spawned plainly, with a warning.
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::core::command::JobCommand;
use crate::error::{Error, Result};
use crate::io::interpreter::Interpreter;
use crate::types::IoPriority;

/// Scheduling applied to the job before it execs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduling {
    /// Niceness increment, as for `nice -n`
    pub nice: i32,
    pub io: IoPriority,
}

/// Create (or truncate) the log file that receives the job's output.
pub fn open_log(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Start `job` in the background and return its process id.
///
/// The child handle is dropped immediately; the job outlives this process.
pub fn spawn_detached(
    job: &JobCommand,
    interpreter: &Interpreter,
    sched: Scheduling,
    log: &Path,
) -> Result<u32> {
    let stdout = open_log(log)?;
    let stderr = stdout.try_clone().map_err(|source| Error::LogFile {
        path: log.to_path_buf(),
        source,
    })?;

    let mut cmd = Command::new(job.program());
    cmd.args(job.args())
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    interpreter.apply_env(&mut cmd);
    attach_detach_hook(&mut cmd, sched);

    let child = cmd.spawn().map_err(|source| Error::Spawn {
        program: job.program().to_string_lossy().into_owned(),
        source,
    })?;
    let pid = child.id();
    debug!("Spawned pid {} writing to {:?}", pid, log);
    drop(child);
    Ok(pid)
}

#[cfg(unix)]
fn attach_detach_hook(cmd: &mut Command, sched: Scheduling) {
    #[cfg(not(target_os = "linux"))]
    tracing::warn!(
        io = %sched.io,
        "I/O scheduling priority is only supported on Linux; it will be ignored"
    );
    unix_impl::attach(cmd, sched);
}

#[cfg(not(unix))]
fn attach_detach_hook(_cmd: &mut Command, sched: Scheduling) {
    tracing::warn!(
        ?sched,
        "session detachment and scheduling priority need a Unix OS; the job is started plainly"
    );
}

#[cfg(unix)]
mod unix_impl {
    use super::Scheduling;

    use std::io;
    use std::os::unix::process::CommandExt;
    use std::process::Command;

    pub fn attach(cmd: &mut Command, sched: Scheduling) {
        let nice = sched.nice;
        #[cfg(target_os = "linux")]
        let ioprio = sched.io.to_ioprio();

        unsafe {
            cmd.pre_exec(move || {
                if libc::setsid() == -1 {
                    return Err(io::Error::last_os_error());
                }
                // Priority is best effort, as with nice(1): an unprivileged
                // request for a higher priority leaves the job at the inherited one.
                libc::nice(nice);
                #[cfg(target_os = "linux")]
                {
                    const IOPRIO_WHO_PROCESS: libc::c_int = 1;
                    libc::syscall(
                        libc::SYS_ioprio_set,
                        IOPRIO_WHO_PROCESS,
                        0 as libc::c_int,
                        ioprio as libc::c_int,
                    );
                }
                Ok(())
            });
        }
    }
}
