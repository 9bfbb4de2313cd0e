// src/policy/decision.rs

use std::fmt;

use crate::policy::RestartPolicy;

/// Outcome of evaluating the restart policy after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    Restart,
    Stop(StopReason),
}

impl RestartDecision {
    pub fn is_restart(&self) -> bool {
        matches!(self, RestartDecision::Restart)
    }
}

/// Why the supervisor loop stopped relaunching the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Policy is `never`.
    PolicyNever,
    /// Command exited 0 under `on-error`.
    SucceededWithOnError,
    /// Command exited non-zero under `on-success`.
    FailedWithOnSuccess,
    /// An external shutdown request was observed.
    ShutdownRequested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StopReason::PolicyNever => "restart is never",
            StopReason::SucceededWithOnError => "command was successful and restart is on-error",
            StopReason::FailedWithOnSuccess => "command failed and restart is on-success",
            StopReason::ShutdownRequested => "shutdown was requested",
        };
        f.write_str(msg)
    }
}

/// Decide whether to relaunch after a run that exited with `exit_code`.
///
/// A pending shutdown always wins over the policy.
pub fn decide(exit_code: i32, policy: RestartPolicy, shutdown_requested: bool) -> RestartDecision {
    if shutdown_requested {
        return RestartDecision::Stop(StopReason::ShutdownRequested);
    }

    match policy {
        RestartPolicy::Never => RestartDecision::Stop(StopReason::PolicyNever),
        RestartPolicy::Always => RestartDecision::Restart,
        RestartPolicy::OnError if exit_code == 0 => {
            RestartDecision::Stop(StopReason::SucceededWithOnError)
        }
        RestartPolicy::OnError => RestartDecision::Restart,
        RestartPolicy::OnSuccess if exit_code != 0 => {
            RestartDecision::Stop(StopReason::FailedWithOnSuccess)
        }
        RestartPolicy::OnSuccess => RestartDecision::Restart,
    }
}
