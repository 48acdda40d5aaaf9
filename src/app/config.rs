use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR_NAME, ENV_PREFIX, LOCAL_CONFIG_PATH,
    SESSION_CHECK_INTERVAL_SECS, SESSION_TIMEOUT_SECS,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Biometric unlock settings
    #[serde(default)]
    pub biometric: BiometricConfig,

    /// Inactivity timeout settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Biometric unlock settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiometricConfig {
    /// Used when no preference has been saved yet
    pub enabled_by_default: bool,
}

/// Inactivity timeout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time before the session is flagged expired
    pub timeout_secs: u64,
    /// How often the idle timer is checked
    pub check_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: SESSION_TIMEOUT_SECS,
            check_interval_secs: SESSION_CHECK_INTERVAL_SECS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(LOCAL_CONFIG_PATH);
    load_config_from(&[global_config, local_config])
}

/// Layer defaults, each existing file in order, then `SKINGATE_` env vars
pub fn load_config_from(files: &[PathBuf]) -> Result<Config> {
    layered(files.iter().filter(|file| file.exists()))
        .extract()
        .context("Failed to load configuration")
}

/// Load a single explicit config file on top of the defaults; env vars still win
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    layered(std::iter::once(path))
        .extract()
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn layered<P: AsRef<Path>>(files: impl IntoIterator<Item = P>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        figment = figment.merge(Toml::file(file.as_ref()));
    }

    // SKINGATE_SESSION__TIMEOUT_SECS=600 -> session.timeout_secs
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", CONFIG_DIR_NAME) {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME);
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
    }

    Ok(config_file)
}
