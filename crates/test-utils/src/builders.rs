#![allow(dead_code)]

use procvisor::config::{RawCommand, RawProgramConfig, SupervisorConfig};

/// Builder for `SupervisorConfig` to simplify test setup.
///
/// Goes through the same validation as a config file.
pub struct ProgramConfigBuilder {
    name: String,
    raw: RawProgramConfig,
}

impl ProgramConfigBuilder {
    /// Start from an argv command.
    pub fn new(argv: &[&str]) -> Self {
        let argv = argv.iter().map(|s| s.to_string()).collect();
        Self {
            name: "test".to_string(),
            raw: RawProgramConfig::new(RawCommand::Argv(argv)),
        }
    }

    /// Start from a single command string.
    pub fn line(cmd: &str) -> Self {
        Self {
            name: "test".to_string(),
            raw: RawProgramConfig::new(RawCommand::Line(cmd.to_string())),
        }
    }

    pub fn stop_command(mut self, argv: &[&str]) -> Self {
        let argv = argv.iter().map(|s| s.to_string()).collect();
        self.raw.stop_command = Some(RawCommand::Argv(argv));
        self
    }

    pub fn restart(mut self, policy: &str) -> Self {
        self.raw.restart = Some(policy.to_string());
        self
    }

    pub fn restart_interval(mut self, secs: f64) -> Self {
        self.raw.restart_interval = Some(secs);
        self
    }

    pub fn shell(mut self, val: bool) -> Self {
        self.raw.shell = val;
        self
    }

    pub fn inherit_fds(mut self, val: bool) -> Self {
        self.raw.inherit_fds = val;
        self
    }

    pub fn termination_grace(mut self, secs: f64) -> Self {
        self.raw.termination_grace = Some(secs);
        self
    }

    pub fn try_build(self) -> procvisor::errors::Result<SupervisorConfig> {
        SupervisorConfig::from_raw(&self.name, self.raw)
    }

    pub fn build(self) -> SupervisorConfig {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}
