// src/exec/start.rs

//! Command Runner: launch the start command, block until it exits and time it.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, info};

use crate::config::SupervisorConfig;
use crate::engine::ShutdownListener;
use crate::errors::Result;
use crate::exec::backend::{ExecutorBackend, LaunchRequest};
use crate::exec::slot::ChildSlot;
use crate::types::CommandRole;

/// Result of one completed run of the start command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub exit_code: i32,
    /// Wall-clock time from launch to observed exit.
    pub elapsed: Duration,
    /// The child was terminated because shutdown was requested.
    pub terminated: bool,
}

impl RunReport {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run the start command once.
///
/// A spawn failure is logged and returned as `Err`; the caller must end the
/// supervisor loop without running the stop command.
pub async fn run_start_command<E>(
    executor: &mut E,
    config: &SupervisorConfig,
    slot: &ChildSlot,
    shutdown: ShutdownListener,
) -> Result<RunReport>
where
    E: ExecutorBackend + ?Sized,
{
    info!(command = %config.start_command, "running command");

    let started = Instant::now();
    let request = LaunchRequest {
        role: CommandRole::Start,
        command: &config.start_command,
        options: config.launch,
        slot: Some(slot),
        shutdown: Some(shutdown),
        termination_grace: config.termination_grace,
    };

    let exit = match executor.launch(request).await {
        Ok(exit) => exit,
        Err(err) => {
            error!(command = %config.start_command, error = %err, "failed to run command");
            return Err(err);
        }
    };
    let elapsed = started.elapsed();

    let report = RunReport {
        exit_code: exit.code,
        elapsed,
        terminated: exit.terminated,
    };

    if report.success() {
        info!(
            exit_code = report.exit_code,
            elapsed_secs = elapsed.as_secs_f64(),
            "command exited"
        );
    } else {
        error!(
            exit_code = report.exit_code,
            elapsed_secs = elapsed.as_secs_f64(),
            terminated = report.terminated,
            "command exited"
        );
    }

    Ok(report)
}
