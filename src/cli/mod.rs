//! Command Line Interface layer.
//!
//! `args` defines the clap surface and its mapping onto `LaunchParams`;
//! `runner` sets up logging, drives `maxproj_launch::api` and prints the
//! report. Embedders should call `maxproj_launch::api` directly.
pub mod args;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
