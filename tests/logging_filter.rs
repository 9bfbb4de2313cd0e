// tests/logging_filter.rs

use tracing_subscriber::filter::LevelFilter;

use procvisor::cli::LogLevel;
use procvisor::logging::build_filter;

#[test]
fn defaults_to_info() {
    assert_eq!(build_filter(None, None).max_level_hint(), Some(LevelFilter::INFO));
    assert_eq!(
        build_filter(None, Some("  ")).max_level_hint(),
        Some(LevelFilter::INFO)
    );
}

#[test]
fn cli_flag_wins_over_environment() {
    let filter = build_filter(Some(LogLevel::Error), Some("trace"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
}

#[test]
fn environment_accepts_directives() {
    let filter = build_filter(None, Some("procvisor=debug,warn"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
}
