//! Crate-level error type and `Result` alias.
//! Separates malformed invocations (usage, exit code 2) from precondition
//! failures (missing input, no usable interpreter, spawn refused; exit code 1).
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Exit code for malformed invocations.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for validation and resolution failures.
pub const EXIT_PRECONDITION: u8 = 1;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("HOME is not set; cannot resolve default directories")]
    HomeNotSet,

    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool}` not found on PATH; pass --python /path/to/python to skip environment activation")]
    ActivationToolMissing { tool: &'static str },

    #[error("Activating environment '{env}' failed: {details}")]
    Activation { env: String, details: String },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl Error {
    pub fn activation<E: std::fmt::Display>(env: &str, e: E) -> Self {
        Error::Activation {
            env: env.to_string(),
            details: e.to_string(),
        }
    }

    /// Process exit code this error maps to.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(e) => e.exit_code().clamp(0, u8::MAX as i32) as u8,
            _ => EXIT_PRECONDITION,
        }
    }
}
