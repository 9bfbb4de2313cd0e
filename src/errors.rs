// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Only configuration problems (including an unknown restart policy) and a
//! start command that cannot be spawned ever surface as errors. A command
//! that runs and exits non-zero, or a failing stop command, is ordinary
//! input to logging and the restart decision.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error(
        "invalid restart policy: {0:?} (expected \"never\", \"always\", \"on-error\" or \"on-success\")"
    )]
    InvalidPolicy(String),

    #[error("failed to run command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SupervisorError {
    /// True for the launch-step failure that ends a supervisor loop.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, SupervisorError::Spawn { .. })
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
