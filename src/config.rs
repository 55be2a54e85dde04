//! Configuration file support
//!
//! Read from `<config_dir>/memodash/config.toml` unless a path is given:
//! ```toml
//! data_dir = "/home/me/decks"     # optional, defaults to <data_local_dir>/memodash
//!
//! [quiz]
//! swipe_threshold = 80.0
//! transition_delay_ms = 200
//! ```
//! Every key is optional; a missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quiz::{DEFAULT_SWIPE_THRESHOLD, DEFAULT_TRANSITION_DELAY};

const APP_DIR: &str = "memodash";
const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Minimum drag distance that counts as a swipe
    pub swipe_threshold: f32,
    /// Delay before a dismissed card is replaced by the next one
    pub transition_delay_ms: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            transition_delay_ms: DEFAULT_TRANSITION_DELAY.as_millis() as u64,
        }
    }
}

impl QuizConfig {
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub quiz: QuizConfig,
}

impl Config {
    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or(ConfigError::DataDirNotFound)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the default location
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_config_path()?)
    }

    fn validate(&self) -> Result<()> {
        let threshold = self.quiz.swipe_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "quiz.swipe_threshold must be a non-negative number, got {}",
                threshold
            )));
        }
        Ok(())
    }

    /// The configured data directory, or the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_data_dir(),
        }
    }
}
