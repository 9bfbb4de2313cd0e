// src/exec/process.rs

//! Building OS processes for a [`CommandLine`] and tearing them down.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::types::{CommandLine, LaunchOptions};

/// Build a `tokio::process::Command` for `command`.
///
/// The child inherits the supervisor's environment and stdio. It is killed
/// if its handle is dropped, so an aborted supervisor never leaks it.
/// Descriptors above stdio reach the child only with `inherit_fds`.
pub fn build_command(command: &CommandLine, options: &LaunchOptions) -> Command {
    let mut cmd = if options.shell {
        shell_command(command)
    } else {
        let mut c = Command::new(command.program());
        c.args(command.args());
        c
    };

    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    if options.inherit_fds {
        keep_descriptors_open(&mut cmd);
    } else {
        close_descriptors_on_exec(&mut cmd);
    }

    cmd
}

fn shell_command(command: &CommandLine) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").args(command.argv());
        c
    } else {
        // Extra elements become $0, $1, ... of the script.
        let mut c = Command::new("/bin/sh");
        c.arg("-c").args(command.argv());
        c
    }
}

/// Clear close-on-exec on every descriptor above stdio in the child.
#[cfg(unix)]
fn keep_descriptors_open(cmd: &mut Command) {
    use nix::fcntl::{fcntl, FcntlArg, FdFlag};

    let fds = open_descriptors();
    debug!(count = fds.len(), "child will inherit open descriptors");

    // SAFETY: the closure only calls fcntl(2), which is async-signal-safe,
    // and reads a Vec allocated before fork.
    unsafe {
        cmd.pre_exec(move || {
            for fd in &fds {
                let _ = fcntl(*fd, FcntlArg::F_SETFD(FdFlag::empty()));
            }
            Ok(())
        });
    }
}

/// Set close-on-exec on every descriptor above stdio in the child, so that
/// descriptors the supervisor itself inherited do not leak through.
#[cfg(unix)]
fn close_descriptors_on_exec(cmd: &mut Command) {
    use nix::fcntl::{fcntl, FcntlArg, FdFlag};

    let fds = open_descriptors();

    // SAFETY: as above, only fcntl(2) over a Vec allocated before fork.
    unsafe {
        cmd.pre_exec(move || {
            for fd in &fds {
                let _ = fcntl(*fd, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC));
            }
            Ok(())
        });
    }
}

#[cfg(not(unix))]
fn keep_descriptors_open(_cmd: &mut Command) {
    warn!("inherit_fds is only supported on unix; ignoring");
}

#[cfg(not(unix))]
fn close_descriptors_on_exec(_cmd: &mut Command) {}

#[cfg(unix)]
fn open_descriptors() -> Vec<std::os::unix::io::RawFd> {
    use nix::fcntl::{fcntl, FcntlArg};

    let listed: Vec<std::os::unix::io::RawFd> = match std::fs::read_dir("/dev/fd") {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str()?.parse().ok())
            .filter(|fd| *fd > 2)
            .collect(),
        Err(e) => {
            warn!(error = %e, "cannot list open descriptors; leaving their close-on-exec flags as they are");
            return Vec::new();
        }
    };

    // Drop the descriptor the listing itself used; it is closed by now and
    // its number may be reused by the spawn machinery.
    listed
        .into_iter()
        .filter(|fd| fcntl(*fd, FcntlArg::F_GETFD).is_ok())
        .collect()
}

/// Exit code for a finished child.
///
/// A child killed by a signal reports the negated signal number; -1 if the
/// platform gives neither.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

/// Ask `child` to terminate, wait up to `grace`, then kill it.
///
/// A child that already exited is not an error. Returns the exit status
/// if one could be collected.
pub async fn terminate(child: &mut Child, grace: Duration) -> Option<ExitStatus> {
    match child.id() {
        Some(pid) => send_terminate(child, pid),
        None => debug!("child already reaped; nothing to terminate"),
    }

    match timeout(grace, child.wait()).await {
        Ok(Ok(status)) => Some(status),
        Ok(Err(e)) => {
            warn!(error = %e, "failed to wait for terminated child");
            None
        }
        Err(_) => {
            warn!(
                grace_secs = grace.as_secs_f64(),
                "child did not exit within the grace period; killing"
            );
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill child");
            }
            child.try_wait().ok().flatten()
        }
    }
}

#[cfg(unix)]
fn send_terminate(_child: &mut Child, pid: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) => debug!(pid, "sent SIGTERM to child"),
        Err(Errno::ESRCH) => debug!(pid, "child already exited before SIGTERM"),
        Err(e) => warn!(pid, error = %e, "failed to send SIGTERM to child"),
    }
}

#[cfg(not(unix))]
fn send_terminate(child: &mut Child, pid: u32) {
    if let Err(e) = child.start_kill() {
        debug!(pid, error = %e, "child already exited before termination");
    }
}
