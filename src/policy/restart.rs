// src/policy/restart.rs

use std::fmt;
use std::str::FromStr;

use crate::errors::SupervisorError;

/// When to relaunch the start command after it exits.
///
/// - `Never`: run once (default).
/// - `Always`: relaunch whatever the exit code.
/// - `OnError`: relaunch only after a non-zero exit.
/// - `OnSuccess`: relaunch only after a zero exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RestartPolicy {
    #[default]
    Never,
    Always,
    OnError,
    OnSuccess,
}

impl RestartPolicy {
    pub const ALL: [RestartPolicy; 4] = [
        RestartPolicy::Never,
        RestartPolicy::Always,
        RestartPolicy::OnError,
        RestartPolicy::OnSuccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Never => "never",
            RestartPolicy::Always => "always",
            RestartPolicy::OnError => "on-error",
            RestartPolicy::OnSuccess => "on-success",
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestartPolicy {
    type Err = SupervisorError;

    /// Exact match on the four policy names; anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(RestartPolicy::Never),
            "always" => Ok(RestartPolicy::Always),
            "on-error" => Ok(RestartPolicy::OnError),
            "on-success" => Ok(RestartPolicy::OnSuccess),
            other => Err(SupervisorError::InvalidPolicy(other.to_string())),
        }
    }
}
