// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod os_signals;
pub mod policy;
pub mod types;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, SupervisorConfig};
use crate::engine::{Shutdown, Supervisor};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - program resolution (ad-hoc command or config file)
/// - one supervisor task per program
/// - OS signal handling → shutdown of every supervisor
pub async fn run(args: CliArgs) -> Result<()> {
    let programs = resolve_programs(&args)?;

    if args.dry_run {
        print_dry_run(&programs);
        return Ok(());
    }

    let handles: Vec<_> = programs
        .into_values()
        .map(|config| Supervisor::new(config).spawn())
        .collect();

    // SIGINT / SIGTERM → shutdown request for every supervisor.
    {
        let triggers: Vec<Shutdown> = handles.iter().map(|h| h.shutdown_trigger()).collect();
        tokio::spawn(async move {
            if let Err(e) = os_signals::wait_for_shutdown_signal().await {
                warn!(error = %e, "failed to listen for shutdown signals");
                return;
            }
            for trigger in &triggers {
                trigger.request();
            }
        });
    }

    let mut first_error = None;
    for handle in handles {
        let name = handle.name().to_string();
        match handle.wait().await {
            Ok(summary) => info!(
                program = %name,
                launches = summary.launches,
                last_exit_code = ?summary.last_exit_code,
                stop_failures = summary.stop_failures,
                reason = %summary.stop_reason,
                "supervisor finished"
            ),
            Err(err) => {
                error!(program = %name, error = %err, "supervisor failed");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Programs to supervise: the ad-hoc command if one was given, otherwise every
/// program in the config file.
pub fn resolve_programs(args: &CliArgs) -> errors::Result<BTreeMap<String, SupervisorConfig>> {
    if let Some((name, raw)) = args.adhoc_program() {
        let config = SupervisorConfig::from_raw(&name, raw)?;
        return Ok(BTreeMap::from([(name, config)]));
    }

    let path = args
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    debug!(path = %path.display(), "loading config");

    Ok(load_and_validate(&path)?.programs)
}

/// Simple dry-run output: print each program and its settings.
fn print_dry_run(programs: &BTreeMap<String, SupervisorConfig>) {
    println!("procvisor dry-run");
    println!();

    println!("programs ({}):", programs.len());
    for (name, program) in programs {
        println!("  - {name}");
        println!("      start_command: {}", program.start_command);
        if let Some(ref stop) = program.stop_command {
            println!("      stop_command: {stop}");
        }
        println!("      restart: {}", program.restart);
        println!(
            "      restart_interval: {}s",
            program.restart_interval.as_secs_f64()
        );
        if program.launch.shell {
            println!("      shell: true");
        }
        if program.launch.inherit_fds {
            println!("      inherit_fds: true");
        }
        println!(
            "      termination_grace: {}s",
            program.termination_grace.as_secs_f64()
        );
    }

    debug!("dry-run complete (no execution)");
}
