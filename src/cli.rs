// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::Path;

use clap::{Parser, ValueEnum};

use crate::config::{RawCommand, RawProgramConfig};

/// Command-line arguments for `procvisor`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procvisor",
    version,
    about = "Run a command and restart it according to a restart policy.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Procvisor.toml` in the current working directory. Ignored
    /// when a command is given after `--`.
    #[arg(long, value_name = "PATH", conflicts_with = "command")]
    pub config: Option<String>,

    /// Restart policy for the ad-hoc command (never, always, on-error, on-success).
    #[arg(long, value_name = "POLICY", requires = "command")]
    pub restart: Option<String>,

    /// Minimum seconds between two launches of the ad-hoc command.
    #[arg(long, value_name = "SECS", requires = "command")]
    pub restart_interval: Option<f64>,

    /// Command to run after every exit of the ad-hoc command.
    #[arg(long, value_name = "CMD", requires = "command")]
    pub stop_command: Option<String>,

    /// Run the commands through `/bin/sh -c`.
    #[arg(long, requires = "command")]
    pub shell: bool,

    /// Let the child inherit the supervisor's open file descriptors.
    #[arg(long, requires = "command")]
    pub inherit_fds: bool,

    /// Seconds a child gets to exit after SIGTERM on shutdown.
    #[arg(long, value_name = "SECS", requires = "command")]
    pub termination_grace: Option<f64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCVISOR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the programs, but don't launch anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Command to supervise, given after `--`.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl CliArgs {
    /// Program described entirely on the command line, if a command was given.
    pub fn adhoc_program(&self) -> Option<(String, RawProgramConfig)> {
        let program = self.command.first()?;
        let name = Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program.as_str())
            .to_string();

        let mut raw = RawProgramConfig::new(RawCommand::Argv(self.command.clone()));
        raw.stop_command = self.stop_command.clone().map(RawCommand::Line);
        raw.restart = self.restart.clone();
        raw.restart_interval = self.restart_interval;
        raw.shell = self.shell;
        raw.inherit_fds = self.inherit_fds;
        raw.termination_grace = self.termination_grace;

        Some((name, raw))
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
