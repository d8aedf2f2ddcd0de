//! Path management for WealthFlow
//!
//! Provides XDG-compliant path resolution for configuration and data files.
//!
//! ## Path Resolution Order
//!
//! 1. `WEALTHFLOW_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/wealthflow` or `~/.config/wealthflow`
//! 3. Windows: `%APPDATA%\wealthflow`

use std::path::PathBuf;

use crate::error::WealthError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "WEALTHFLOW_DATA_DIR";

/// Manages all paths used by WealthFlow
#[derive(Debug, Clone)]
pub struct WealthPaths {
    base_dir: PathBuf,
}

impl WealthPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application-data directory can be found.
    pub fn new() -> Result<Self, WealthError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create WealthPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the per-entity JSON files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    pub fn bills_file(&self) -> PathBuf {
        self.data_dir().join("bills.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), WealthError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| WealthError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| WealthError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if WealthFlow has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, WealthError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("wealthflow"));
        }
    }
    let home = std::env::var("HOME")
        .map_err(|_| WealthError::Config("Could not determine HOME directory".into()))?;
    Ok(PathBuf::from(home).join(".config").join("wealthflow"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, WealthError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| WealthError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("wealthflow"))
}
