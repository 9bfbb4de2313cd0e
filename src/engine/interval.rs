// src/engine/interval.rs

use std::time::Duration;

use tokio::time::sleep;

use crate::engine::ShutdownListener;

/// How the interval wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Interrupted,
}

/// Time still owed before the next launch, or `None` to relaunch immediately.
pub fn remaining_interval(interval: Duration, elapsed: Duration) -> Option<Duration> {
    interval.checked_sub(elapsed).filter(|rest| !rest.is_zero())
}

/// Sleep for `duration` unless shutdown is requested first.
pub async fn wait_interruptible(duration: Duration, listener: &mut ShutdownListener) -> WaitOutcome {
    tokio::select! {
        biased;
        _ = listener.requested() => WaitOutcome::Interrupted,
        _ = sleep(duration) => WaitOutcome::Elapsed,
    }
}
