//! Unified path management for servimarket files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/servimarket/       # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/servimarket/  # Data directory
//! └── storage.json             # Key-value storage (session record)
//! ```
//!
//! A base path override places both files directly under that directory,
//! which is how tests and `--base-dir` keep everything in one place.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "servimarket";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for servimarket_core::MarketError {
    fn from(err: PathError) -> Self {
        servimarket_core::MarketError::config(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarketPaths {
    base: Option<PathBuf>,
}

impl MarketPaths {
    /// Creates a resolver. `None` uses the platform config/data directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the servimarket configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/servimarket/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the servimarket data directory.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the key-value storage file, honouring a configured directory.
    pub fn storage_file(&self, storage_dir: Option<&Path>) -> Result<PathBuf, PathError> {
        let dir = match storage_dir {
            Some(dir) => dir.to_path_buf(),
            None => self.data_dir()?,
        };
        Ok(dir.join("storage.json"))
    }
}
