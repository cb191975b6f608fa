//! Process-facing layer: interpreter resolution, the detached job spawn,
//! and `writers` for the run manifest sidecar.
pub mod interpreter;
pub use interpreter::{ActivatedEnv, Interpreter};

pub mod spawn;
pub use spawn::{Scheduling, spawn_detached};

pub mod writers;
