//! User configuration and preferences

use crate::error::{Result, StatusViewError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct UserConfig {
    /// Storage root used on the last successful run, reused as the
    /// default when none is given on the command line.
    pub last_storage_root: Option<PathBuf>,
}

impl UserConfig {
    /// Get the config file path (~/.config/statusview/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("statusview").join("config.json"))
    }

    /// Load config from file, or create default if doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            StatusViewError::Config("Could not determine config directory".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            StatusViewError::Config(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            StatusViewError::Config(format!("Failed to parse config file: {}", e))
        })
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            StatusViewError::Config("Could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StatusViewError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            StatusViewError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, contents).map_err(|e| {
            StatusViewError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}
