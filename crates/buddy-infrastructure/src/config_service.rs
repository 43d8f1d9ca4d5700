//! Configuration service implementation.
//!
//! Loads `AppConfig` from `config.toml` and caches it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use buddy_core::config::AppConfig;
use buddy_core::error::{BuddyError, Result};

use crate::paths::BuddyPaths;

/// Configuration service that loads and caches the application config.
///
/// A missing or blank file yields the defaults. A malformed file is an error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service for the default config file location.
    pub fn from_paths(paths: &BuddyPaths) -> Result<Self> {
        Ok(Self::new(paths.config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| BuddyError::internal("Config cache lock poisoned"))?;
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let loaded = Self::load_from(&self.path)?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|_| BuddyError::internal("Config cache lock poisoned"))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// Reads `AppConfig` from `path` without caching.
    pub fn load_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::debug!(
                "[ConfigService] {} not found, using defaults",
                path.display()
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            BuddyError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(config)
    }
}
