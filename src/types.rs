// src/types.rs

use std::fmt;

/// A command as an ordered argument sequence.
///
/// In shell mode the first element is the script passed to `sh -c` and the
/// rest become its positional parameters; otherwise the first element is the
/// program and the rest are its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    /// Returns `None` for an empty argument list.
    pub fn new(argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() || argv[0].trim().is_empty() {
            return None;
        }
        Some(Self { argv })
    }

    /// Build a command from a single string.
    ///
    /// In shell mode the whole string is the script; otherwise it is split on
    /// ASCII whitespace.
    pub fn from_line(line: &str, shell: bool) -> Option<Self> {
        if shell {
            Self::new(vec![line.to_string()])
        } else {
            Self::new(line.split_ascii_whitespace().map(str::to_string).collect())
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Process-creation options shared by the start and stop commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaunchOptions {
    /// Run the command through the platform shell.
    pub shell: bool,
    /// Keep the supervisor's open descriptors (beyond stdio) open in the child.
    pub inherit_fds: bool,
}

/// Which of the two configured commands a launch is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandRole {
    Start,
    Stop,
}

impl fmt::Display for CommandRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandRole::Start => f.write_str("start"),
            CommandRole::Stop => f.write_str("stop"),
        }
    }
}
