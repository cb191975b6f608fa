//! Shared testing utilities for maxproj-launch CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated `$HOME`, working directory and `PATH` for one CLI exercise.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
    bin_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        let bin_dir = root.path().join("bin");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        fs::create_dir_all(&bin_dir).expect("Failed to create test bin directory");
        Self { root, work_dir, bin_dir }
    }

    /// Emulated `$HOME`.
    pub fn home(&self) -> &Path {
        self.root.path()
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Default working directory under the emulated home.
    pub fn tmpdir(&self) -> PathBuf {
        self.home().join("tmp")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.home().join("max_proj/logs")
    }

    pub fn script(&self) -> PathBuf {
        self.home().join("max_proj/max_project_nd2_stream.py")
    }

    /// Write a placeholder ND2 file into the work directory.
    pub fn input(&self, name: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, b"ND2 placeholder").expect("Failed to write input file");
        path
    }

    /// Install an executable shell script named `name` on the private `PATH`.
    #[cfg(unix)]
    pub fn install_tool(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.bin_dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark tool executable");
        path
    }

    /// Command for the compiled binary: private `HOME` and `PATH`, no inherited overrides.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("maxproj-launch").expect("Failed to locate binary");
        cmd.current_dir(&self.work_dir)
            .env("HOME", self.home())
            .env("PATH", &self.bin_dir)
            .env_remove("CONDA_EXE")
            .env_remove("MAXPROJ_SCRIPT")
            .env_remove("RUST_LOG");
        cmd
    }
}
