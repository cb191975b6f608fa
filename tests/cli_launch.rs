mod common;

use common::TestContext;
use predicates::prelude::*;

#[test]
fn help_prints_usage_and_succeeds() {
    let ctx = TestContext::new();
    ctx.cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: maxproj-launch [OPTIONS] <INPUT> <OUTPUT>"))
        .stdout(predicate::str::contains("--idle-io"));
}

#[test]
fn missing_positionals_are_usage_errors() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    for args in [&[][..], &["input.nd2"][..], &["--fovs", "5", "input.nd2"][..]] {
        ctx.cli()
            .args(args)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage"));
    }
    assert!(!ctx.tmpdir().exists());
}

#[test]
fn usage_error_does_not_need_home() {
    let ctx = TestContext::new();
    ctx.cli()
        .env_remove("HOME")
        .args(["only.nd2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("HOME").not());
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let ctx = TestContext::new();
    ctx.cli()
        .args(["--turbo", "input.nd2", "output.ome.tif"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--turbo"));
}

#[test]
fn missing_input_fails_before_anything_starts() {
    let ctx = TestContext::new();
    ctx.cli()
        .args(["--python", "/bin/true", "absent.nd2", "output.ome.tif"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Input file not found"))
        .stderr(predicate::str::contains("Usage").not());
    assert!(!ctx.tmpdir().exists());
    assert!(!ctx.log_dir().exists());
}

#[test]
fn no_conda_and_no_python_is_a_precondition_failure() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    ctx.cli()
        .args(["input.nd2", "output.ome.tif"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("conda"))
        .stderr(predicate::str::contains("--python"));
    assert!(!ctx.log_dir().join("output.log").exists());
}

#[cfg(unix)]
#[test]
fn explicit_python_never_invokes_conda() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    let marker = ctx.home().join("conda-was-called");
    ctx.install_tool("conda", &format!(": > '{}'", marker.display()));

    ctx.cli()
        .args(["--dry-run", "--python", "/opt/custom/python", "input.nd2", "output.ome.tif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("python      : /opt/custom/python"))
        .stdout(predicate::str::contains("command     : /opt/custom/python -u"));
    assert!(!marker.exists());
}

#[cfg(unix)]
#[test]
fn conda_environment_supplies_the_interpreter() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    ctx.install_tool(
        "conda",
        "echo \"MAXPROJ_EXE=/envs/$3/bin/python\"\necho \"MAXPROJ_PREFIX=/envs/$3\"",
    );

    ctx.cli()
        .args(["--dry-run", "--env", "proj", "input.nd2", "output.ome.tif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("python      : /envs/proj/bin/python"))
        .stdout(predicate::str::contains("environment : proj (/envs/proj)"));
}

#[cfg(unix)]
#[test]
fn failing_activation_reports_tool_error() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    ctx.install_tool("conda", "echo 'EnvironmentLocationNotFound' >&2\nexit 1");

    ctx.cli()
        .args(["--env", "ghost", "input.nd2", "output.ome.tif"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ghost"))
        .stderr(predicate::str::contains("EnvironmentLocationNotFound"));
}

#[test]
fn io_presets_follow_idle_switch() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    let base = ["--dry-run", "--python", "/bin/true", "input.nd2", "output.ome.tif"];

    ctx.cli()
        .args(base)
        .assert()
        .success()
        .stdout(predicate::str::contains("io priority : class 2 (best-effort), level 7"))
        .stdout(predicate::str::contains("nice        : 10"));

    ctx.cli()
        .arg("--idle-io")
        .args(base)
        .assert()
        .success()
        .stdout(predicate::str::contains("io priority : class 3 (idle), level 0"));
}

#[test]
fn log_path_is_derived_from_output_name() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    let expected = ctx.log_dir().join("max_round9.log");

    ctx.cli()
        .args(["--dry-run", "--python", "/bin/true", "input.nd2", "/out/max_round9.ome.tif"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("log         : {}", expected.display())));
    assert!(ctx.tmpdir().is_dir());
    assert!(ctx.log_dir().is_dir());
    assert!(!expected.exists());
}

#[test]
fn fov_cap_is_passed_through_only_when_given() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");

    ctx.cli()
        .args(["--dry-run", "--python", "/bin/true", "--fovs", "500", "input.nd2", "o.ome.tif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--fovs 500"));

    ctx.cli()
        .args(["--dry-run", "--python", "/bin/true", "input.nd2", "o.ome.tif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--fovs").not());
}

#[test]
fn script_can_be_overridden_from_environment() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");

    ctx.cli()
        .env("MAXPROJ_SCRIPT", "/srv/pipeline/project.py")
        .args(["--dry-run", "--python", "/bin/true", "input.nd2", "o.ome.tif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/bin/true -u /srv/pipeline/project.py input.nd2"));
}

#[cfg(unix)]
#[test]
fn launches_detached_job_and_returns_immediately() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    let log = ctx.log_dir().join("output.log");

    let expected = format!(
        "command     : /bin/true -u {} input.nd2 output.ome.tif --tmpdir {}",
        ctx.script().display(),
        ctx.tmpdir().display()
    );

    ctx.cli()
        .args(["--python", "/bin/true", "input.nd2", "output.ome.tif"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected))
        .stdout(predicate::str::is_match(r"Started background job with PID \d+").unwrap());

    assert!(log.is_file());
    assert!(ctx.log_dir().join("output.json").is_file());
}

#[cfg(unix)]
#[test]
fn rerun_truncates_previous_log() {
    let ctx = TestContext::new();
    ctx.input("input.nd2");
    std::fs::create_dir_all(ctx.log_dir()).unwrap();
    let log = ctx.log_dir().join("output.log");
    std::fs::write(&log, "output of an earlier run\n").unwrap();

    ctx.cli()
        .args(["--python", "/bin/true", "input.nd2", "output.ome.tif"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(!content.contains("earlier run"));
}

/// Fields 6 (session id) and 19 (niceness) of a `/proc/<pid>/stat` line.
#[cfg(target_os = "linux")]
fn session_and_nice(stat: &str) -> (u32, i32) {
    let after_comm = &stat[stat.rfind(')').expect("stat line has a comm field") + 1..];
    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    (fields[3].parse().unwrap(), fields[16].parse().unwrap())
}

#[cfg(unix)]
#[test]
fn job_runs_detached_in_its_own_session_at_lower_priority() {
    use std::time::{Duration, Instant};

    let ctx = TestContext::new();
    ctx.input("input.nd2");
    let python = ctx.install_tool(
        "slow-python",
        "if [ -r /proc/$$/stat ]; then read -r line < /proc/$$/stat; echo \"stat=$line\"; fi\n/bin/sleep 3",
    );
    let log = ctx.log_dir().join("output.log");

    let started = Instant::now();
    let assert = ctx
        .cli()
        .arg("--python")
        .arg(&python)
        .args(["input.nd2", "output.ome.tif"])
        .assert()
        .success();
    let elapsed = started.elapsed();
    assert!(elapsed < Duration::from_secs(2), "launcher waited for the job: {elapsed:?}");

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let pid: u32 = stdout
        .lines()
        .find_map(|l| l.strip_prefix("Started background job with PID "))
        .expect("PID line in report")
        .trim()
        .parse()
        .unwrap();
    assert!(pid > 0);

    #[cfg(target_os = "linux")]
    {
        let mut content = String::new();
        for _ in 0..100 {
            content = std::fs::read_to_string(&log).unwrap_or_default();
            if content.contains("stat=") {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        let stat = content
            .lines()
            .find_map(|l| l.strip_prefix("stat="))
            .expect("job wrote its stat line");
        let (session, nice) = session_and_nice(stat);
        let own_stat = std::fs::read_to_string("/proc/self/stat").unwrap();
        let (_, own_nice) = session_and_nice(&own_stat);

        assert_eq!(session, pid, "job should lead its own session");
        assert_eq!(nice, (own_nice + 10).min(19));
    }
    #[cfg(not(target_os = "linux"))]
    let _ = log;
}
