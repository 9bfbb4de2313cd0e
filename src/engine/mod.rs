// src/engine/mod.rs

//! Supervisor engine.
//!
//! - [`shutdown`] is the cancellation primitive shared with signal handlers.
//! - [`interval`] enforces the minimum time between two launches.
//! - [`runtime`] owns the supervisor loop and its spawned handle.

use std::fmt;

use crate::policy::StopReason;

/// Lifecycle of a single supervisor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, loop not started.
    Idle,
    /// Waiting on the start command.
    Running,
    /// Stop command done; evaluating the restart policy.
    Deciding,
    /// Enforcing the restart interval before the next launch.
    Waiting,
    /// The start command could not be spawned.
    FatalExit,
    Terminated,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Running => "running",
            LifecycleState::Deciding => "deciding",
            LifecycleState::Waiting => "waiting",
            LifecycleState::FatalExit => "fatal-exit",
            LifecycleState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// What a supervisor loop did before it stopped normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of times the start command ran.
    pub launches: u32,
    pub last_exit_code: Option<i32>,
    /// Stop-command runs that failed to spawn, exited non-zero or were killed.
    pub stop_failures: u32,
    pub stop_reason: StopReason,
}

pub mod interval;
pub mod runtime;
pub mod shutdown;

pub use interval::{remaining_interval, wait_interruptible, WaitOutcome};
pub use runtime::{Supervisor, SupervisorHandle};
pub use shutdown::{Shutdown, ShutdownListener};
