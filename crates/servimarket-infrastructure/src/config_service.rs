//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from `config.toml` and caches it. A missing file yields
//! the defaults; a malformed file is reported so the caller can decide
//! whether to fall back.

use crate::paths::MarketPaths;
use servimarket_core::config::AppConfig;
use servimarket_core::error::{MarketError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: MarketPaths,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            paths: MarketPaths::new(base_path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn paths(&self) -> &MarketPaths {
        &self.paths
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| MarketError::internal(format!("config cache poisoned: {}", e)))?;
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let loaded = Self::load_config(&self.paths.config_file()?)?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| MarketError::internal(format!("config cache poisoned: {}", e)))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Writes `config` to `config.toml` and refreshes the cache.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let path = self.paths.config_file()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(config)?)?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| MarketError::internal(format!("config cache poisoned: {}", e)))?;
        *write_lock = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// Resolves the key-value storage file for the current configuration.
    pub fn storage_file(&self) -> Result<PathBuf> {
        let config = self.get_config()?;
        Ok(self.paths.storage_file(config.storage_dir.as_deref())?)
    }

    fn load_config(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::debug!("[Config] {} not found, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
