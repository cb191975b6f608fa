use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::warn;

use maxproj_launch::core::defaults::{DEFAULT_ENV, DEFAULT_NICE, SCRIPT_ENV_VAR};
use maxproj_launch::{Defaults, IoPriority, LaunchParams, Result};

#[derive(Parser, Debug)]
#[command(
    name = "maxproj-launch",
    version,
    about = "Start the ND2 max-projection script as a detached, low-priority background job",
    override_usage = "maxproj-launch [OPTIONS] <INPUT> <OUTPUT>"
)]
pub struct CliArgs {
    /// Conda environment to activate when --python is not given
    #[arg(long = "env", value_name = "NAME", default_value = DEFAULT_ENV)]
    pub env_name: String,

    /// Explicit interpreter; skips environment activation
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Working directory passed to the job [default: ~/tmp]
    #[arg(long, value_name = "DIR")]
    pub tmpdir: Option<PathBuf>,

    /// Process at most N fields of view
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub fovs: Option<u32>,

    /// Log file for the job's output [default: ~/max_proj/logs/<output name>.log]
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// CPU niceness of the job
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_NICE,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-20..=19)
    )]
    pub nice: i32,

    /// Use the idle I/O scheduling class instead of best-effort
    #[arg(long, default_value_t = false)]
    pub idle_io: bool,

    /// External processing script [default: ~/max_proj/max_project_nd2_stream.py]
    #[arg(long, value_name = "PATH", env = SCRIPT_ENV_VAR)]
    pub script: Option<PathBuf>,

    /// Resolve and print everything, but do not start the job
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Input ND2 file and output OME-TIFF path
    #[arg(value_name = "INPUT OUTPUT", trailing_var_arg = true, hide = true)]
    pub positionals: Vec<PathBuf>,
}

impl CliArgs {
    /// Apply the parsed options on top of the defaults returned by `defaults`.
    ///
    /// Fewer than two positionals is a usage error, reported before `defaults`
    /// is consulted; extras are ignored.
    pub fn into_params<F>(self, defaults: F) -> Result<LaunchParams>
    where
        F: FnOnce() -> Result<Defaults>,
    {
        let mut positionals = self.positionals.into_iter();
        let (input, output) = match (positionals.next(), positionals.next()) {
            (Some(input), Some(output)) => (input, output),
            _ => {
                return Err(CliArgs::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        "both <INPUT> and <OUTPUT> are required",
                    )
                    .into());
            }
        };
        let extra: Vec<PathBuf> = positionals.collect();
        if !extra.is_empty() {
            warn!("Ignoring extra arguments: {:?}", extra);
        }

        let defaults = defaults()?;
        let mut params = LaunchParams::new(input, output, &defaults);
        params.env_name = self.env_name;
        params.python = self.python;
        if let Some(tmpdir) = self.tmpdir {
            params.tmpdir = tmpdir;
        }
        if let Some(script) = self.script {
            params.script = script;
        }
        params.fovs = self.fovs;
        params.log = self.log;
        params.nice = self.nice;
        params.io = IoPriority::preset(self.idle_io);
        Ok(params)
    }
}
