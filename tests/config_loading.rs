// tests/config_loading.rs

mod common;
use crate::common::{ProgramConfigBuilder, TestResult};

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tempfile::NamedTempFile;

use procvisor::cli::CliArgs;
use procvisor::config::{load_and_validate, DEFAULT_TERMINATION_GRACE};
use procvisor::errors::SupervisorError;
use procvisor::policy::RestartPolicy;
use procvisor::resolve_programs;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_program_section_is_parsed() -> TestResult {
    let file = write_config(
        r#"
[program.console]
start_command = ["ipmitool", "-I", "lanplus", "sol", "activate"]
stop_command = "ipmitool -I lanplus sol deactivate"
restart = "always"
restart_interval = 5
inherit_fds = true
termination_grace = 2.5
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.programs.len(), 1);

    let console = cfg.programs.get("console").expect("program console must exist");
    assert_eq!(console.name, "console");
    assert_eq!(console.start_command.program(), "ipmitool");
    assert_eq!(console.start_command.args().len(), 4);
    assert_eq!(
        console.stop_command.as_ref().map(|c| c.argv().len()),
        Some(5),
        "a stop command string is split on whitespace outside shell mode"
    );
    assert_eq!(console.restart, RestartPolicy::Always);
    assert_eq!(console.restart_interval, Duration::from_secs(5));
    assert!(!console.launch.shell);
    assert!(console.launch.inherit_fds);
    assert_eq!(console.termination_grace, Duration::from_millis(2500));
    Ok(())
}

#[test]
fn defaults_apply_when_fields_are_missing() -> TestResult {
    let file = write_config(
        r#"
[program.a]
start_command = "sleep 1"

[program.b]
start_command = "echo $HOME && sleep 1"
shell = true
restart = "on-error"
restart_interval = 0.25
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.programs.len(), 2);

    let a = &cfg.programs["a"];
    assert_eq!(a.restart, RestartPolicy::Never);
    assert_eq!(a.restart_interval, Duration::ZERO);
    assert!(a.stop_command.is_none());
    assert_eq!(a.termination_grace, DEFAULT_TERMINATION_GRACE);
    assert_eq!(a.start_command.argv(), ["sleep", "1"]);

    let b = &cfg.programs["b"];
    assert!(b.launch.shell);
    assert_eq!(b.restart, RestartPolicy::OnError);
    assert_eq!(b.restart_interval, Duration::from_millis(250));
    assert_eq!(b.start_command.argv(), ["echo $HOME && sleep 1"]);
    Ok(())
}

#[test]
fn unknown_policy_fails_at_construction() {
    let file = write_config(
        r#"
[program.a]
start_command = "true"
restart = "sometimes"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SupervisorError::InvalidPolicy(value)) => assert_eq!(value, "sometimes"),
        Err(e) => panic!("Expected InvalidPolicy, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn negative_interval_is_a_config_error() {
    let err = ProgramConfigBuilder::new(&["true"])
        .restart_interval(-1.0)
        .try_build()
        .unwrap_err();

    match err {
        SupervisorError::ConfigError(msg) => assert!(msg.contains("restart_interval")),
        e => panic!("Expected ConfigError, got: {e:?}"),
    }
}

#[test]
fn empty_commands_are_rejected() {
    let err = ProgramConfigBuilder::line("   ").try_build().unwrap_err();
    assert!(matches!(err, SupervisorError::ConfigError(ref msg) if msg.contains("start_command")));

    let err = ProgramConfigBuilder::new(&["true"])
        .stop_command(&[])
        .try_build()
        .unwrap_err();
    assert!(matches!(err, SupervisorError::ConfigError(ref msg) if msg.contains("stop_command")));
}

#[test]
fn config_without_programs_is_rejected() {
    let file = write_config("# nothing here\n");

    match load_and_validate(file.path()) {
        Err(SupervisorError::ConfigError(msg)) => assert!(msg.contains("[program.<name>]")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn malformed_toml_is_reported() {
    let file = write_config("[program.a\nstart_command = 1\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SupervisorError::TomlError(_))
    ));
}

#[test]
fn adhoc_command_line_builds_single_program() -> TestResult {
    let args = CliArgs::try_parse_from([
        "procvisor",
        "--restart",
        "on-error",
        "--restart-interval",
        "1.5",
        "--stop-command",
        "cleanup --now",
        "--",
        "/usr/bin/worker",
        "--port",
        "8080",
    ])?;

    let programs = resolve_programs(&args)?;
    assert_eq!(programs.len(), 1);

    let worker = &programs["worker"];
    assert_eq!(worker.start_command.argv(), ["/usr/bin/worker", "--port", "8080"]);
    assert_eq!(worker.restart, RestartPolicy::OnError);
    assert_eq!(worker.restart_interval, Duration::from_millis(1500));
    assert_eq!(
        worker.stop_command.as_ref().map(|c| c.argv().to_vec()),
        Some(vec!["cleanup".to_string(), "--now".to_string()])
    );
    Ok(())
}

#[test]
fn adhoc_invalid_policy_is_rejected() -> TestResult {
    let args = CliArgs::try_parse_from(["procvisor", "--restart", "maybe", "--", "true"])?;
    assert!(matches!(
        resolve_programs(&args),
        Err(SupervisorError::InvalidPolicy(_))
    ));
    Ok(())
}

#[test]
fn policy_flags_require_a_command() {
    assert!(CliArgs::try_parse_from(["procvisor", "--restart", "always"]).is_err());
}

#[test]
fn config_flag_is_used_without_a_command() -> TestResult {
    let file = write_config(
        r#"
[program.web]
start_command = ["python3", "-m", "http.server"]
restart = "on-success"
"#,
    );
    let path = file.path().to_str().unwrap().to_string();

    let args = CliArgs::try_parse_from(["procvisor", "--config", path.as_str(), "--dry-run"])?;
    assert!(args.dry_run);

    let programs = resolve_programs(&args)?;
    assert_eq!(programs["web"].restart, RestartPolicy::OnSuccess);
    Ok(())
}
