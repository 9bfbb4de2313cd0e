// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read and deserialize a config file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Read a config file and validate every program in it.
///
/// This is the entry point used by the binary; an unknown restart policy
/// surfaces here as `SupervisorError::InvalidPolicy`, before any supervisor
/// is constructed.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `Procvisor.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Procvisor.toml")
}
