use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::get_config_dir;
use crate::constants::PREFERENCES_FILE_NAME;

/// User preferences that persist between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Set from the profile screen's Face ID / Touch ID toggle
    pub biometric_enabled: Option<bool>,
}

impl Preferences {
    /// Get the path to the preferences file
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join(PREFERENCES_FILE_NAME))
    }

    /// Load preferences from disk, defaulting when the file is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Save preferences to disk
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Saved toggle, or the configured default when the user never chose
    pub fn biometric_enabled_or(&self, default: bool) -> bool {
        self.biometric_enabled.unwrap_or(default)
    }

    pub fn set_biometric_enabled(&mut self, enabled: bool) {
        self.biometric_enabled = Some(enabled);
    }
}
