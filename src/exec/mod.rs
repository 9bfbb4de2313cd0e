// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the
//!   `RealExecutorBackend` used in production.
//! - [`process`] builds `tokio::process::Command`s and terminates children.
//! - [`slot`] holds the pid of the running start command.
//! - [`start`] is the Command Runner (launch, wait, time, log).
//! - [`stop`] is the Stop-Command Runner.

pub mod backend;
pub mod process;
pub mod slot;
pub mod start;
pub mod stop;

pub use backend::{ExecutorBackend, LaunchRequest, ProcessExit, RealExecutorBackend};
pub use slot::ChildSlot;
pub use start::{run_start_command, RunReport};
pub use stop::{run_stop_command, StopOutcome};
