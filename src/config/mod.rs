// src/config/mod.rs

//! Configuration for supervised programs.
//!
//! - [`model`] holds the raw TOML shape and the validated [`SupervisorConfig`].
//! - [`loader`] reads a file from disk.
//! - [`validate`] turns raw values into typed configuration, rejecting
//!   unknown restart policies and malformed commands before anything runs.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, RawCommand, RawConfigFile, RawProgramConfig, SupervisorConfig,
    DEFAULT_TERMINATION_GRACE,
};
