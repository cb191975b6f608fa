//! Child argument vector for the external max-projection script.
use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::core::params::LaunchParams;

/// Interpreter flag that disables output buffering, so the log fills as the job runs.
pub const UNBUFFERED_FLAG: &str = "-u";
pub const TMPDIR_FLAG: &str = "--tmpdir";
pub const FOVS_FLAG: &str = "--fovs";

/// `<interpreter> -u <script> <input> <output> --tmpdir <dir> [--fovs N]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCommand {
    argv: Vec<OsString>,
}

impl JobCommand {
    pub fn build(interpreter: &Path, params: &LaunchParams) -> Self {
        let mut argv: Vec<OsString> = vec![
            interpreter.as_os_str().to_owned(),
            UNBUFFERED_FLAG.into(),
            params.script.as_os_str().to_owned(),
            params.input.as_os_str().to_owned(),
            params.output.as_os_str().to_owned(),
            TMPDIR_FLAG.into(),
            params.tmpdir.as_os_str().to_owned(),
        ];
        if let Some(fovs) = params.fovs {
            argv.push(FOVS_FLAG.into());
            argv.push(fovs.to_string().into());
        }
        Self { argv }
    }

    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    pub fn args(&self) -> &[OsString] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }

    /// Arguments as (lossy) UTF-8 strings, for reports and manifests.
    pub fn to_strings(&self) -> Vec<String> {
        self.argv
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Single line suitable for pasting into a POSIX shell.
    pub fn display_line(&self) -> String {
        self.argv
            .iter()
            .map(|a| shell_quote(&a.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
