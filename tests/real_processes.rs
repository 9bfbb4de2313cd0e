// tests/real_processes.rs
//
// End-to-end runs against real OS processes through the production backend.

#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout, ProgramConfigBuilder, TestResult};

use std::fs;
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::{Duration, Instant};

use nix::fcntl::{fcntl, FcntlArg, FdFlag};
use tempfile::TempDir;
use tokio::process::Command;

use procvisor::engine::{LifecycleState, Supervisor};
use procvisor::errors::SupervisorError;
use procvisor::exec::process::{exit_code, terminate};
use procvisor::policy::StopReason;

/// Shell snippet that appends one line to `path` each time it runs.
fn append_line(path: &std::path::Path) -> String {
    format!("echo ran >> '{}'", path.display())
}

fn count_lines(path: &std::path::Path) -> usize {
    fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

#[tokio::test]
async fn exit_code_is_reported() -> TestResult {
    init_tracing();

    let config = ProgramConfigBuilder::new(&["sh", "-c", "exit 3"])
        .restart("on-success")
        .build();

    let summary = with_timeout(Supervisor::new(config).run()).await?;

    assert_eq!(summary.launches, 1);
    assert_eq!(summary.last_exit_code, Some(3));
    assert_eq!(summary.stop_reason, StopReason::FailedWithOnSuccess);
    Ok(())
}

#[tokio::test]
async fn nonexistent_executable_is_a_spawn_failure() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let marker = dir.path().join("stopped");

    let config = ProgramConfigBuilder::new(&["/nonexistent/procvisor-test-binary"])
        .restart("always")
        .stop_command(&["sh", "-c", &append_line(&marker)])
        .build();

    let result = with_timeout(Supervisor::new(config).run()).await;

    match result {
        Err(SupervisorError::Spawn { command, source }) => {
            assert_eq!(command, "/nonexistent/procvisor-test-binary");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected spawn failure, got {other:?}"),
    }
    assert!(!marker.exists(), "stop command must not run after a spawn failure");
    Ok(())
}

#[tokio::test]
async fn stop_command_runs_once_with_never_policy() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let marker = dir.path().join("stopped");

    let config = ProgramConfigBuilder::new(&["true"])
        .stop_command(&["sh", "-c", &append_line(&marker)])
        .build();

    let summary = with_timeout(Supervisor::new(config).run()).await?;

    assert_eq!(summary.launches, 1);
    assert_eq!(summary.last_exit_code, Some(0));
    assert_eq!(summary.stop_reason, StopReason::PolicyNever);
    assert_eq!(count_lines(&marker), 1);
    Ok(())
}

#[tokio::test]
async fn failing_stop_command_does_not_change_the_decision() -> TestResult {
    init_tracing();

    let config = ProgramConfigBuilder::new(&["true"])
        .restart("on-error")
        .stop_command(&["/nonexistent/procvisor-cleanup"])
        .build();

    let summary = with_timeout(Supervisor::new(config).run()).await?;

    assert_eq!(summary.launches, 1);
    assert_eq!(summary.stop_reason, StopReason::SucceededWithOnError);
    assert_eq!(summary.stop_failures, 1);
    Ok(())
}

#[tokio::test]
async fn shell_mode_runs_the_script() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let marker = dir.path().join("runs");
    let script = format!(
        "{}; [ \"$(wc -l < '{}')\" -ge 3 ]",
        append_line(&marker),
        marker.display()
    );

    // Fails until the script has run three times.
    let config = ProgramConfigBuilder::line(&script)
        .shell(true)
        .restart("on-error")
        .build();

    let summary = with_timeout(Supervisor::new(config).run()).await?;

    assert_eq!(summary.launches, 3);
    assert_eq!(summary.last_exit_code, Some(0));
    assert_eq!(count_lines(&marker), 3);
    Ok(())
}

#[tokio::test]
async fn interval_applies_to_real_runs() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let marker = dir.path().join("runs");
    let script = format!(
        "{}; [ \"$(wc -l < '{}')\" -ge 2 ]",
        append_line(&marker),
        marker.display()
    );

    let config = ProgramConfigBuilder::new(&["sh", "-c", &script])
        .restart("on-error")
        .restart_interval(0.5)
        .build();

    let began = Instant::now();
    let summary = with_timeout(Supervisor::new(config).run()).await?;

    assert_eq!(summary.launches, 2);
    assert!(
        began.elapsed() >= Duration::from_millis(500),
        "second launch came too early ({:?})",
        began.elapsed()
    );
    Ok(())
}

#[tokio::test]
async fn shutdown_terminates_the_active_child() -> TestResult {
    init_tracing();

    let config = ProgramConfigBuilder::new(&["sleep", "30"])
        .restart("always")
        .termination_grace(5.0)
        .build();

    let handle = Supervisor::new(config).spawn();

    with_timeout(async {
        while handle.active_pid().is_none() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert_eq!(handle.state(), LifecycleState::Running);

    let state = handle.state_receiver();
    let began = Instant::now();
    let summary = with_timeout(handle.shutdown()).await?;

    assert!(began.elapsed() < Duration::from_secs(5));
    assert_eq!(summary.launches, 1);
    assert_eq!(summary.last_exit_code, Some(-15));
    assert_eq!(summary.stop_reason, StopReason::ShutdownRequested);
    assert_eq!(*state.borrow(), LifecycleState::Terminated);
    Ok(())
}

#[tokio::test]
async fn child_ignoring_sigterm_is_killed_after_grace() -> TestResult {
    init_tracing();

    let config = ProgramConfigBuilder::new(&["sh", "-c", "trap '' TERM; exec sleep 30"])
        .restart("always")
        .termination_grace(0.2)
        .build();

    let handle = Supervisor::new(config).spawn();
    with_timeout(async {
        while handle.active_pid().is_none() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    // Give the shell time to install its trap.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let summary = with_timeout(handle.shutdown()).await?;

    assert_eq!(summary.launches, 1);
    assert_eq!(summary.last_exit_code, Some(-9));
    assert_eq!(summary.stop_reason, StopReason::ShutdownRequested);
    Ok(())
}

#[tokio::test]
async fn terminating_an_exited_child_is_not_an_error() -> TestResult {
    init_tracing();

    let mut child = Command::new("true").spawn()?;
    let status = child.wait().await?;
    assert_eq!(exit_code(status), 0);

    // Already reaped: both calls must simply report the known status.
    let first = terminate(&mut child, Duration::from_millis(100)).await;
    let second = terminate(&mut child, Duration::from_millis(100)).await;
    assert_eq!(first.map(exit_code), Some(0));
    assert_eq!(second.map(exit_code), Some(0));
    Ok(())
}

/// Open a file whose descriptor survives exec, like one the supervisor
/// itself inherited without close-on-exec.
fn inheritable_descriptor(dir: &TempDir) -> std::io::Result<(fs::File, RawFd)> {
    let file = fs::File::create(dir.path().join("held"))?;
    let fd = file.as_raw_fd();
    fcntl(fd, FcntlArg::F_SETFD(FdFlag::empty()))?;
    Ok((file, fd))
}

#[tokio::test]
async fn inherit_fds_passes_descriptors_to_the_child() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let (_held, fd) = inheritable_descriptor(&dir)?;

    let script = format!("[ -e /dev/fd/{fd} ]");
    let config = ProgramConfigBuilder::new(&["sh", "-c", &script])
        .inherit_fds(true)
        .build();
    let summary = with_timeout(Supervisor::new(config).run()).await?;

    assert_eq!(summary.last_exit_code, Some(0), "fd {fd} missing in child");
    Ok(())
}

#[tokio::test]
async fn descriptors_are_closed_without_inherit_fds() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let (_held, fd) = inheritable_descriptor(&dir)?;

    let script = format!("[ ! -e /dev/fd/{fd} ]");
    let config = ProgramConfigBuilder::new(&["sh", "-c", &script]).build();
    let summary = with_timeout(Supervisor::new(config).run()).await?;

    assert_eq!(summary.last_exit_code, Some(0), "fd {fd} leaked into child");
    Ok(())
}

#[tokio::test]
async fn stop_command_does_not_inherit_descriptors() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let (_held, fd) = inheritable_descriptor(&dir)?;
    let marker = dir.path().join("closed");

    let cleanup = format!("[ -e /dev/fd/{fd} ] || echo closed > '{}'", marker.display());
    let config = ProgramConfigBuilder::new(&["true"])
        .inherit_fds(true)
        .stop_command(&["sh", "-c", &cleanup])
        .build();
    let summary = with_timeout(Supervisor::new(config).run()).await?;

    assert_eq!(summary.stop_failures, 0);
    assert!(marker.exists(), "fd {fd} reached the stop command");
    Ok(())
}
