use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{sleep, Instant};
use procvisor::errors::{Result, SupervisorError};
use procvisor::exec::{ExecutorBackend, LaunchRequest, ProcessExit};
use procvisor::types::{CommandRole, LaunchOptions};

/// Pid published in the child slot for scripted start-command runs.
pub const FAKE_PID: u32 = 4242;

/// Exit code reported when a scripted run is cut short by shutdown.
pub const TERMINATED_CODE: i32 = -15;

/// What a scripted launch does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedRun {
    /// "Run" for `after`, then exit with `code`.
    Exit { code: i32, after: Duration },
    /// Fail as if the executable did not exist.
    SpawnFailure,
}

impl ScriptedRun {
    pub fn exit(code: i32) -> Self {
        ScriptedRun::Exit {
            code,
            after: Duration::ZERO,
        }
    }

    pub fn exit_after(code: i32, after: Duration) -> Self {
        ScriptedRun::Exit { code, after }
    }
}

/// One recorded launch attempt.
#[derive(Debug, Clone)]
pub struct LaunchRecord {
    pub role: CommandRole,
    pub command: String,
    pub options: LaunchOptions,
    pub at: Instant,
    pub spawned: bool,
    pub terminated: bool,
}

/// A fake executor that:
/// - replays scripted outcomes per command role (default: exit 0 at once)
/// - honours shutdown requests like the real backend
/// - records every launch attempt with its tokio `Instant`.
pub struct ScriptedExecutor {
    start: VecDeque<ScriptedRun>,
    stop: VecDeque<ScriptedRun>,
    launches: Arc<Mutex<Vec<LaunchRecord>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self {
            start: VecDeque::new(),
            stop: VecDeque::new(),
            launches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_start<I: IntoIterator<Item = ScriptedRun>>(mut self, runs: I) -> Self {
        self.start.extend(runs);
        self
    }

    pub fn with_stop<I: IntoIterator<Item = ScriptedRun>>(mut self, runs: I) -> Self {
        self.stop.extend(runs);
        self
    }

    /// Shared view of the launch log; stays valid after the executor moves.
    pub fn launches(&self) -> Arc<Mutex<Vec<LaunchRecord>>> {
        Arc::clone(&self.launches)
    }
}

impl Default for ScriptedExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Launches recorded for `role`, in order.
pub fn launches_of(log: &Arc<Mutex<Vec<LaunchRecord>>>, role: CommandRole) -> Vec<LaunchRecord> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|r| r.role == role)
        .cloned()
        .collect()
}

impl ExecutorBackend for ScriptedExecutor {
    fn launch<'a>(
        &'a mut self,
        request: LaunchRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessExit>> + Send + 'a>> {
        let script = match request.role {
            CommandRole::Start => self.start.pop_front(),
            CommandRole::Stop => self.stop.pop_front(),
        }
        .unwrap_or(ScriptedRun::exit(0));
        let launches = Arc::clone(&self.launches);

        Box::pin(async move {
            let LaunchRequest {
                role,
                command,
                options,
                slot,
                mut shutdown,
                ..
            } = request;

            let mut record = LaunchRecord {
                role,
                command: command.to_string(),
                options,
                at: Instant::now(),
                spawned: false,
                terminated: false,
            };

            let (code, after) = match script {
                ScriptedRun::SpawnFailure => {
                    launches.lock().unwrap().push(record);
                    return Err(SupervisorError::Spawn {
                        command: command.to_string(),
                        source: io::Error::new(io::ErrorKind::NotFound, "scripted spawn failure"),
                    });
                }
                ScriptedRun::Exit { code, after } => (code, after),
            };
            record.spawned = true;

            if let Some(slot) = slot {
                slot.set(FAKE_PID);
            }

            let exit = match shutdown.as_mut() {
                Some(listener) => {
                    tokio::select! {
                        _ = sleep(after) => ProcessExit::exited(code),
                        _ = listener.requested() => ProcessExit { code: TERMINATED_CODE, terminated: true },
                    }
                }
                None => {
                    sleep(after).await;
                    ProcessExit::exited(code)
                }
            };

            if let Some(slot) = slot {
                slot.clear();
            }

            record.terminated = exit.terminated;
            launches.lock().unwrap().push(record);
            Ok(exit)
        })
    }
}
