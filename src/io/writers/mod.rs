//! Sidecar writers for launched jobs.
pub mod manifest;
