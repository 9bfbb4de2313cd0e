// src/exec/stop.rs

//! Stop-Command Runner: best-effort cleanup after every run.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::engine::ShutdownListener;
use crate::exec::backend::{ExecutorBackend, LaunchRequest};
use crate::types::{CommandLine, CommandRole, LaunchOptions};

/// What happened to the stop command. Never influences restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Exited(i32),
    SpawnFailed,
    /// Still running `grace` after shutdown was requested; the child was killed.
    Abandoned,
}

impl StopOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, StopOutcome::Exited(0))
    }
}

/// Run `command` to completion, absorbing every failure.
///
/// Only the shell setting is shared with the start command; the stop command
/// never inherits descriptors beyond stdio. It is not interrupted by a
/// shutdown request, but once one is pending it gets at most `grace` to
/// finish.
pub async fn run_stop_command<E>(
    executor: &mut E,
    command: &CommandLine,
    shell: bool,
    mut shutdown: ShutdownListener,
    grace: Duration,
) -> StopOutcome
where
    E: ExecutorBackend + ?Sized,
{
    info!(command = %command, "running stop command");

    let request = LaunchRequest {
        role: CommandRole::Stop,
        command,
        options: LaunchOptions {
            shell,
            inherit_fds: false,
        },
        slot: None,
        shutdown: None,
        termination_grace: grace,
    };

    // Dropping the launch future drops the child, which is killed on drop.
    let launched = tokio::select! {
        result = executor.launch(request) => Some(result),
        _ = grace_after_shutdown(&mut shutdown, grace) => None,
    };

    match launched {
        Some(Ok(exit)) if exit.success() => {
            info!(exit_code = exit.code, "stop command exited");
            StopOutcome::Exited(exit.code)
        }
        Some(Ok(exit)) => {
            error!(exit_code = exit.code, "stop command exited");
            StopOutcome::Exited(exit.code)
        }
        Some(Err(err)) => {
            error!(error = %err, "failed to run stop command");
            StopOutcome::SpawnFailed
        }
        None => {
            warn!(
                grace_secs = grace.as_secs_f64(),
                "stop command still running after shutdown; killing"
            );
            StopOutcome::Abandoned
        }
    }
}

async fn grace_after_shutdown(listener: &mut ShutdownListener, grace: Duration) {
    listener.requested().await;
    sleep(grace).await;
}
