// src/engine/runtime.rs

use std::fmt;

use anyhow::anyhow;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, Instrument};

use crate::config::SupervisorConfig;
use crate::errors::Result;
use crate::exec::{run_start_command, run_stop_command, ChildSlot, ExecutorBackend, RealExecutorBackend};
use crate::policy::{decide, RestartDecision, StopReason};

use super::interval::{remaining_interval, wait_interruptible, WaitOutcome};
use super::shutdown::Shutdown;
use super::{LifecycleState, RunSummary};

/// Runs one command and relaunches it according to its restart policy.
///
/// The loop is strictly sequential: launch, wait for exit, run the stop
/// command, decide, optionally wait out the restart interval, repeat. The
/// only concurrent input is a shutdown request, which is observed at every
/// decision point and interrupts both the child wait and the interval wait.
///
/// A supervisor runs its loop once. Supervising again needs a new instance.
pub struct Supervisor<E: ExecutorBackend = RealExecutorBackend> {
    config: SupervisorConfig,
    executor: E,
    shutdown: Shutdown,
    slot: ChildSlot,
    state: watch::Sender<LifecycleState>,
}

impl<E: ExecutorBackend> fmt::Debug for Supervisor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.config)
            .field("shutdown_requested", &self.shutdown.is_requested())
            .field("active_pid", &self.slot.pid())
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Supervisor<RealExecutorBackend> {
    pub fn new(config: SupervisorConfig) -> Self {
        Self::with_executor(config, RealExecutorBackend::new())
    }
}

impl<E: ExecutorBackend> Supervisor<E> {
    pub fn with_executor(config: SupervisorConfig, executor: E) -> Self {
        let (state, _rx) = watch::channel(LifecycleState::Idle);
        Self {
            config,
            executor,
            shutdown: Shutdown::new(),
            slot: ChildSlot::new(),
            state,
        }
    }

    /// Trigger that stops this supervisor; safe to call from any task.
    pub fn shutdown_trigger(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn state_receiver(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Run the supervisor loop to completion.
    ///
    /// Returns `Err(SupervisorError::Spawn)` if the start command could not
    /// be created; every other ending is an `Ok` summary.
    pub async fn run(mut self) -> Result<RunSummary> {
        let span = info_span!("supervisor", program = %self.config.name);
        self.run_loop().instrument(span).await
    }

    /// Run the loop on its own tokio task.
    pub fn spawn(self) -> SupervisorHandle
    where
        E: 'static,
    {
        let name = self.config.name.clone();
        let shutdown = self.shutdown.clone();
        let slot = self.slot.clone();
        let state = self.state.subscribe();
        let join = tokio::spawn(self.run());

        SupervisorHandle {
            name,
            shutdown,
            slot,
            state,
            join,
        }
    }

    async fn run_loop(&mut self) -> Result<RunSummary> {
        info!(
            restart = %self.config.restart,
            restart_interval_secs = self.config.restart_interval.as_secs_f64(),
            "starting process supervisor"
        );

        let mut launches: u32 = 0;
        let mut last_exit_code = None;
        let mut stop_failures: u32 = 0;

        let stop_reason = loop {
            if self.shutdown.is_requested() {
                info!(reason = %StopReason::ShutdownRequested, "not restarting");
                break StopReason::ShutdownRequested;
            }

            self.set_state(LifecycleState::Running);
            let report = match run_start_command(
                &mut self.executor,
                &self.config,
                &self.slot,
                self.shutdown.listener(),
            )
            .await
            {
                Ok(report) => report,
                Err(err) => {
                    // Spawn failure: no stop command, no policy evaluation.
                    self.set_state(LifecycleState::FatalExit);
                    self.finish();
                    return Err(err);
                }
            };
            launches += 1;
            last_exit_code = Some(report.exit_code);

            if let Some(stop_command) = &self.config.stop_command {
                let outcome = run_stop_command(
                    &mut self.executor,
                    stop_command,
                    self.config.launch.shell,
                    self.shutdown.listener(),
                    self.config.termination_grace,
                )
                .await;
                if outcome.is_failure() {
                    stop_failures += 1;
                }
            }

            self.set_state(LifecycleState::Deciding);
            let decision = decide(
                report.exit_code,
                self.config.restart,
                self.shutdown.is_requested(),
            );
            if let RestartDecision::Stop(reason) = decision {
                info!(%reason, "not restarting: {reason}");
                break reason;
            }

            if let Some(wait) = remaining_interval(self.config.restart_interval, report.elapsed) {
                self.set_state(LifecycleState::Waiting);
                info!(wait_secs = wait.as_secs_f64(), "waiting before restarting command");

                let mut listener = self.shutdown.listener();
                if wait_interruptible(wait, &mut listener).await == WaitOutcome::Interrupted {
                    info!(reason = %StopReason::ShutdownRequested, "not restarting");
                    break StopReason::ShutdownRequested;
                }
            }

            debug!(launches, "restarting command");
        };

        self.finish();
        Ok(RunSummary {
            launches,
            last_exit_code,
            stop_failures,
            stop_reason,
        })
    }

    fn set_state(&self, next: LifecycleState) {
        let prev = self.state.send_replace(next);
        debug!(from = %prev, to = %next, "lifecycle transition");
    }

    fn finish(&self) {
        self.set_state(LifecycleState::Terminated);
        info!("process supervisor no longer running");
    }
}

/// Handle to a supervisor running on its own task.
#[derive(Debug)]
pub struct SupervisorHandle {
    name: String,
    shutdown: Shutdown,
    slot: ChildSlot,
    state: watch::Receiver<LifecycleState>,
    join: JoinHandle<Result<RunSummary>>,
}

impl SupervisorHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request shutdown. Returns `true` only for the first request.
    pub fn request_shutdown(&self) -> bool {
        self.shutdown.request()
    }

    pub fn shutdown_trigger(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Pid of the running start command, if one is in flight.
    pub fn active_pid(&self) -> Option<u32> {
        self.slot.pid()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn state_receiver(&self) -> watch::Receiver<LifecycleState> {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the supervisor loop to end.
    pub async fn wait(self) -> Result<RunSummary> {
        match self.join.await {
            Ok(result) => result,
            Err(e) => Err(anyhow!("supervisor task for '{}' failed: {e}", self.name).into()),
        }
    }

    /// Request shutdown and wait for the loop to end.
    pub async fn shutdown(self) -> Result<RunSummary> {
        self.request_shutdown();
        self.wait().await
    }
}
