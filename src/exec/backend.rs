// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The supervisor loop talks to an `ExecutorBackend` instead of spawning
//! processes itself. Production code uses [`RealExecutorBackend`], which runs
//! real OS processes through `tokio::process`; tests provide a scripted
//! backend that reports exit codes and durations without spawning anything.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::engine::ShutdownListener;
use crate::errors::{Result, SupervisorError};
use crate::exec::process::{build_command, exit_code, terminate};
use crate::exec::slot::ChildSlot;
use crate::types::{CommandLine, CommandRole, LaunchOptions};

/// Everything a backend needs to run one command to completion.
#[derive(Debug)]
pub struct LaunchRequest<'a> {
    pub role: CommandRole,
    pub command: &'a CommandLine,
    pub options: LaunchOptions,
    /// Where to publish the child's pid while it runs (start command only).
    pub slot: Option<&'a ChildSlot>,
    /// When present, the child is terminated once shutdown is requested.
    pub shutdown: Option<ShutdownListener>,
    /// How long a terminated child gets before it is killed.
    pub termination_grace: Duration,
}

/// How a launched command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    pub code: i32,
    /// The supervisor terminated the child because of a shutdown request.
    pub terminated: bool,
}

impl ProcessExit {
    pub fn exited(code: i32) -> Self {
        Self {
            code,
            terminated: false,
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Trait abstracting how commands are executed.
pub trait ExecutorBackend: Send {
    /// Run the requested command until it exits.
    ///
    /// Must return `SupervisorError::Spawn` when the process cannot be created
    /// at all, and `Ok` with the exit code for every run that started.
    fn launch<'a>(
        &'a mut self,
        request: LaunchRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessExit>> + Send + 'a>>;
}

/// Real executor backend used in production.
#[derive(Debug, Clone, Default)]
pub struct RealExecutorBackend;

impl RealExecutorBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn launch<'a>(
        &'a mut self,
        request: LaunchRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessExit>> + Send + 'a>> {
        Box::pin(run_process(request))
    }
}

enum Waited {
    Exited(std::io::Result<std::process::ExitStatus>),
    ShutdownRequested,
}

async fn run_process(request: LaunchRequest<'_>) -> Result<ProcessExit> {
    let LaunchRequest {
        role,
        command,
        options,
        slot,
        mut shutdown,
        termination_grace,
    } = request;

    let mut child = build_command(command, &options)
        .spawn()
        .map_err(|source| SupervisorError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let pid = child.id();
    debug!(%role, ?pid, "child process spawned");
    if let (Some(slot), Some(pid)) = (slot, pid) {
        slot.set(pid);
    }

    // Either the child exits on its own, or shutdown is requested while it
    // is still running.
    let waited = tokio::select! {
        status = child.wait() => Waited::Exited(status),
        _ = wait_for_shutdown(&mut shutdown) => Waited::ShutdownRequested,
    };

    let exit = match waited {
        Waited::Exited(Ok(status)) => ProcessExit::exited(exit_code(status)),
        Waited::Exited(Err(e)) => {
            warn!(%role, error = %e, "failed to wait for child process");
            ProcessExit::exited(-1)
        }
        Waited::ShutdownRequested => {
            info!(%role, ?pid, "shutdown requested; terminating active child");
            let code = terminate(&mut child, termination_grace)
                .await
                .map(exit_code)
                .unwrap_or(-1);
            ProcessExit {
                code,
                terminated: true,
            }
        }
    };

    if let Some(slot) = slot {
        slot.clear();
    }

    Ok(exit)
}

async fn wait_for_shutdown(listener: &mut Option<ShutdownListener>) {
    match listener {
        Some(listener) => listener.requested().await,
        None => std::future::pending::<()>().await,
    }
}
