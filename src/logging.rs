// src/logging.rs

//! Log output for the supervisor itself.
//!
//! Supervised children write straight to the inherited stdout and stderr;
//! supervisor events go to stderr through one global `fmt` subscriber and
//! carry the `supervisor{program=...}` span of the program they concern.
//!
//! Filtering, first match wins:
//! 1. `--log-level` sets one level for everything.
//! 2. `PROCVISOR_LOG` takes full `EnvFilter` directives
//!    (`debug`, `procvisor::exec=trace,info`, ...).
//! 3. `info`.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable read when no `--log-level` flag is given.
pub const LOG_ENV: &str = "PROCVISOR_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Filter for the given flag and `PROCVISOR_LOG` value.
///
/// An unparsable environment value is ignored rather than fatal; the
/// supervisor still starts at `info`.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_directive());
    }

    env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
