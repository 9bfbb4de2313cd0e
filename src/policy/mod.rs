// src/policy/mod.rs

//! Restart policy and the pure decision taken after every run.
//!
//! - [`restart`] defines [`RestartPolicy`] and its string form.
//! - [`decision`] maps (exit code, policy, shutdown flag) to a
//!   [`RestartDecision`]. It performs no IO and is safe to call from tests
//!   without a runtime.

pub mod decision;
pub mod restart;

pub use decision::{decide, RestartDecision, StopReason};
pub use restart::RestartPolicy;
