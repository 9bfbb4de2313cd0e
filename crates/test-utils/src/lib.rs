pub mod builders;
pub mod fake_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use procvisor::logging::{build_filter, LOG_ENV};
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

/// Upper bound for any single awaited step in a test.
///
/// Under paused time the clock jumps straight to the next timer, so this
/// only fires when a test is genuinely stuck.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Capture supervisor logs per test, filtered the same way as the binary.
///
/// Output shows up only for failing tests or with `--nocapture`; raise the
/// level with `PROCVISOR_LOG=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env_value = std::env::var(LOG_ENV).ok();
        let _ = fmt()
            .with_env_filter(build_filter(None, env_value.as_deref()))
            .with_test_writer()
            .try_init();
    });
}

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test step timed out after {TEST_TIMEOUT:?}"))
}
