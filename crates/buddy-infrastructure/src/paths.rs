//! Path management for Buddy Builder files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/buddy-builder/     # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/buddy-builder/  # Data directory
//! └── ai-buddies.json            # Stored buddy collection
//! ```
//!
//! Platform equivalents are resolved through `dirs`.

use std::path::PathBuf;

use buddy_core::error::{BuddyError, Result};

const APP_DIR_NAME: &str = "buddy-builder";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolves config and data locations.
///
/// With a base directory override, `config/` and `data/` under that base
/// are used instead of the platform directories.
#[derive(Debug, Clone, Default)]
pub struct BuddyPaths {
    base_dir: Option<PathBuf>,
}

impl BuddyPaths {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| BuddyError::config("Cannot find config directory")),
        }
    }

    /// Returns the data directory holding stored buddies.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| BuddyError::config("Cannot find data directory")),
        }
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }
}
