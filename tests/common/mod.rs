#![allow(dead_code)]

pub use procvisor_test_utils::builders::ProgramConfigBuilder;
pub use procvisor_test_utils::fake_executor::{launches_of, ScriptedExecutor, ScriptedRun};
pub use procvisor_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
