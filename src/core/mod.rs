//! Core launch building blocks: fixed defaults, run parameters, path
//! validation/derivation and child command assembly. These are pure and
//! consumed by the high-level `api` module.
pub mod command;
pub mod defaults;
pub mod params;
pub mod paths;
