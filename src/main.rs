// src/main.rs

use std::process::ExitCode;

use procvisor::{cli, logging, run};

/// Exit status 0 once every supervisor stopped normally, 1 on a config
/// error, an invalid policy or a start command that could not be spawned.
#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("procvisor: {err:?}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "procvisor exiting");
            eprintln!("procvisor error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
