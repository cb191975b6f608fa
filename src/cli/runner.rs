use tracing::debug;
use tracing_subscriber::EnvFilter;

use maxproj_launch::api::{self, LaunchPlan};
use maxproj_launch::{Defaults, Result};

use super::args::CliArgs;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_plan(plan: &LaunchPlan) {
    println!("tmpdir      : {}", plan.params.tmpdir.display());
    println!("log         : {}", plan.log.display());
    println!("python      : {}", plan.interpreter.path.display());
    if let Some(env) = &plan.interpreter.env {
        println!("environment : {} ({})", env.name, env.prefix.display());
    }
    println!("nice        : {}", plan.params.nice);
    println!("io priority : {}", plan.params.io);
    println!("command     : {}", plan.command.display_line());
}

pub fn run(args: CliArgs) -> Result<()> {
    init_logging(args.verbose);

    let dry_run = args.dry_run;
    let params = args.into_params(|| {
        let defaults = Defaults::from_env()?;
        debug!("Defaults: {:?}", defaults);
        Ok(defaults)
    })?;

    let plan = api::plan(params)?;
    if dry_run {
        print_plan(&plan);
        println!("dry run     : job not started");
        return Ok(());
    }

    let report = api::execute(plan)?;
    print_plan(&report.plan);
    if let Some(manifest) = &report.manifest {
        println!("manifest    : {}", manifest.display());
    }
    println!("Started background job with PID {}", report.pid);
    println!("Follow progress with: tail -f {}", report.plan.log.display());
    println!("Stop it with: kill {}", report.pid);
    Ok(())
}
