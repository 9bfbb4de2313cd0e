// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::policy::RestartPolicy;
use crate::types::{CommandLine, LaunchOptions};

/// How long a child gets to exit after SIGTERM before it is killed.
pub const DEFAULT_TERMINATION_GRACE: Duration = Duration::from_secs(10);

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [program.console]
/// start_command = ["ipmitool", "-I", "lanplus", "sol", "activate"]
/// stop_command = "ipmitool -I lanplus sol deactivate"
/// restart = "always"
/// restart_interval = 5
/// ```
///
/// Each `[program.<name>]` table is supervised independently.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub program: BTreeMap<String, RawProgramConfig>,
}

/// A command as written in the config: a single string or an argv array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCommand {
    Line(String),
    Argv(Vec<String>),
}

/// `[program.<name>]` section, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProgramConfig {
    /// The command to supervise.
    pub start_command: RawCommand,

    /// Cleanup command run after every exit of `start_command`.
    #[serde(default)]
    pub stop_command: Option<RawCommand>,

    /// One of `never`, `always`, `on-error`, `on-success`. Missing means `never`.
    #[serde(default)]
    pub restart: Option<String>,

    /// Minimum seconds between two launches. Missing means 0.
    #[serde(default)]
    pub restart_interval: Option<f64>,

    #[serde(default)]
    pub shell: bool,

    #[serde(default)]
    pub inherit_fds: bool,

    /// Seconds to wait after SIGTERM before killing the child on shutdown.
    #[serde(default)]
    pub termination_grace: Option<f64>,
}

impl RawProgramConfig {
    pub fn new(start_command: RawCommand) -> Self {
        Self {
            start_command,
            stop_command: None,
            restart: None,
            restart_interval: None,
            shell: false,
            inherit_fds: false,
            termination_grace: None,
        }
    }
}

/// Validated configuration for one supervisor instance.
///
/// Construction goes through [`SupervisorConfig::from_raw`], so the restart
/// policy is always one of the four known values.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorConfig {
    pub name: String,
    pub start_command: CommandLine,
    pub stop_command: Option<CommandLine>,
    pub restart: RestartPolicy,
    pub restart_interval: Duration,
    pub launch: LaunchOptions,
    pub termination_grace: Duration,
}

/// Validated configuration file: every program, keyed by name.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub programs: BTreeMap<String, SupervisorConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(programs: BTreeMap<String, SupervisorConfig>) -> Self {
        Self { programs }
    }
}
