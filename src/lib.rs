#![doc = r#"
maxproj-launch — start the ND2 max-projection pipeline as a detached background job.

The launcher does no image processing itself. It validates the input, prepares the
working and log directories, resolves a Python interpreter (explicitly, or from a conda
environment), and starts the external projection script in its own session with lowered
CPU and I/O priority. Output goes to a log file; the launcher returns immediately.

Quick start: launch a job
-------------------------
```rust,no_run
use maxproj_launch::{api, Defaults, LaunchParams};

fn main() -> maxproj_launch::Result<()> {
    let defaults = Defaults::from_env()?;
    let mut params = LaunchParams::new("/data/round9.nd2", "/out/max_round9.ome.tif", &defaults);
    params.fovs = Some(500);

    let report = api::launch(params)?;
    println!("pid {} logging to {}", report.pid, report.plan.log.display());
    Ok(())
}
```

Inspect without starting
------------------------
```rust,no_run
use std::path::Path;
use maxproj_launch::{api, Defaults, IoPriority, LaunchParams};

fn main() -> maxproj_launch::Result<()> {
    let defaults = Defaults::for_home(Path::new("/home/lab"));
    let mut params = LaunchParams::new("scan.nd2", "scan.ome.tif", &defaults);
    params.python = Some("/opt/conda/envs/nd2/bin/python".into());
    params.io = IoPriority::IDLE;

    let plan = api::plan(params)?;
    println!("{}", plan.command.display_line());
    Ok(())
}
```

Error handling
--------------
All fallible functions return `maxproj_launch::Result<T>`. `Error::exit_code()` gives the
process exit code: 2 for usage errors, 1 for everything else.

Useful modules
--------------
- [`api`] — `plan`, `execute` and `launch`.
- [`core`] — defaults, run parameters, path derivation and command assembly.
- [`io`] — interpreter resolution, detached spawn and the run manifest writer.
- [`types`] — I/O scheduling presets.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::command::JobCommand;
pub use crate::core::defaults::Defaults;
pub use crate::core::params::LaunchParams;
pub use crate::error::{Error, Result};
pub use crate::types::{IoClass, IoPriority};

pub use crate::io::interpreter::{ActivatedEnv, Interpreter};
pub use crate::io::writers::manifest::RunManifest;

pub use crate::api::{LaunchPlan, LaunchReport, execute, launch, plan};
