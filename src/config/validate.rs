// src/config/validate.rs

use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::model::{
    ConfigFile, RawCommand, RawConfigFile, RawProgramConfig, SupervisorConfig,
    DEFAULT_TERMINATION_GRACE,
};
use crate::errors::{Result, SupervisorError};
use crate::policy::RestartPolicy;
use crate::types::{CommandLine, LaunchOptions};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SupervisorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        if raw.program.is_empty() {
            return Err(SupervisorError::ConfigError(
                "config must contain at least one [program.<name>] section".to_string(),
            ));
        }

        let mut programs = BTreeMap::new();
        for (name, program) in raw.program {
            let config = SupervisorConfig::from_raw(&name, program)?;
            programs.insert(name, config);
        }

        Ok(ConfigFile::new_unchecked(programs))
    }
}

impl SupervisorConfig {
    /// Validate a raw program section.
    pub fn from_raw(name: &str, raw: RawProgramConfig) -> Result<Self> {
        let restart = match raw.restart.as_deref() {
            Some(policy) => policy.parse::<RestartPolicy>()?,
            None => RestartPolicy::default(),
        };

        let start_command = to_command_line(&raw.start_command, raw.shell).ok_or_else(|| {
            SupervisorError::ConfigError(format!("program '{name}': start_command is empty"))
        })?;

        let stop_command = match &raw.stop_command {
            Some(cmd) => Some(to_command_line(cmd, raw.shell).ok_or_else(|| {
                SupervisorError::ConfigError(format!("program '{name}': stop_command is empty"))
            })?),
            None => None,
        };

        let restart_interval = match raw.restart_interval {
            Some(secs) => seconds(name, "restart_interval", secs)?,
            None => Duration::ZERO,
        };

        let termination_grace = match raw.termination_grace {
            Some(secs) => seconds(name, "termination_grace", secs)?,
            None => DEFAULT_TERMINATION_GRACE,
        };

        Ok(Self {
            name: name.to_string(),
            start_command,
            stop_command,
            restart,
            restart_interval,
            launch: LaunchOptions {
                shell: raw.shell,
                inherit_fds: raw.inherit_fds,
            },
            termination_grace,
        })
    }
}

fn to_command_line(raw: &RawCommand, shell: bool) -> Option<CommandLine> {
    match raw {
        RawCommand::Line(line) => CommandLine::from_line(line, shell),
        RawCommand::Argv(argv) => CommandLine::new(argv.clone()),
    }
}

fn seconds(name: &str, field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        SupervisorError::ConfigError(format!(
            "program '{name}': {field} must be a non-negative number of seconds (got {secs})"
        ))
    })
}
