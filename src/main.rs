//! maxproj-launch CLI entrypoint.
//!
//! Parse args, run the launcher, and map failures to exit codes:
//! usage errors exit through clap (2), precondition failures exit 1.
//! For programmatic use, prefer the library API (`maxproj_launch::api`).

use std::process::ExitCode;

use clap::Parser;
use maxproj_launch::Error;

mod cli;

fn main() -> ExitCode {
    let args = cli::CliArgs::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Usage(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
