// Configuration management
//
// Handles frontend configuration: key bindings, high score persistence and
// diagnostics, stored as TOML.

use crate::highscore::{ScoreStoreSettings, STORAGE_KEY, WRITE_DELAY};
use crate::input::InputConfig;
use crate::logger::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default configuration file path
pub const CONFIG_FILE: &str = "a7800_frontend.toml";

/// Errors loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid TOML for this configuration
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A key binding names an unknown key
    #[error("Invalid key binding: {0}")]
    Binding(String),
}

/// Frontend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Verbose diagnostics (per-write SRAM tracing, F8 SRAM dump)
    #[serde(default)]
    pub debug: bool,

    /// Key bindings
    #[serde(default)]
    pub input: InputConfig,

    /// High score cartridge settings
    #[serde(default)]
    pub high_score: HighScoreConfig,

    /// Also write log messages to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// High score cartridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreConfig {
    /// File holding persisted values
    pub storage_path: PathBuf,

    /// Key the SRAM image is stored under
    pub storage_key: String,

    /// Debounce delay in milliseconds
    pub write_delay_ms: u64,

    /// High score cartridge program image; high scores are disabled without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rom_path: Option<PathBuf>,
}

impl Default for HighScoreConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("saves/highscore.json"),
            storage_key: STORAGE_KEY.to_string(),
            write_delay_ms: WRITE_DELAY.as_millis() as u64,
            rom_path: None,
        }
    }
}

impl HighScoreConfig {
    /// Score store settings derived from this configuration
    pub fn settings(&self) -> ScoreStoreSettings {
        ScoreStoreSettings {
            storage_key: self.storage_key.clone(),
            write_delay: Duration::from_millis(self.write_delay_ms),
        }
    }

    /// Read the high score cartridge program image
    ///
    /// # Returns
    /// The image, or an empty vector when no ROM is configured
    pub fn load_rom(&self) -> Result<Vec<u8>, ConfigError> {
        match &self.rom_path {
            Some(path) => Ok(fs::read(path)?),
            None => Ok(Vec::new()),
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        FrontendConfig {
            debug: false,
            input: InputConfig::default(),
            high_score: HighScoreConfig::default(),
            log_file: None,
        }
    }
}

impl FrontendConfig {
    /// Log level implied by the debug flag
    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    /// Load configuration from the default file or create it
    ///
    /// If the configuration file doesn't exist or can't be parsed, creates a
    /// default configuration and tries to save it.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use a7800_frontend::config::FrontendConfig;
    ///
    /// let config = FrontendConfig::load_or_default();
    /// ```
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(CONFIG_FILE)
    }

    /// Load configuration from `path` or create it
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from(&path).unwrap_or_else(|e| {
            eprintln!("Could not load config ({}), using defaults", e);
            let config = Self::default();
            if let Err(e) = config.save_to(&path) {
                eprintln!("Warning: Could not save default config: {}", e);
            }
            config
        })
    }

    /// Load configuration from a TOML file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration and validate its key bindings
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: FrontendConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check that every key binding names a known key
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.input
            .player1
            .to_bindings()
            .map_err(ConfigError::Binding)?;
        self.input
            .player2
            .to_bindings()
            .map_err(ConfigError::Binding)?;
        self.input
            .console
            .to_console_keys()
            .map_err(ConfigError::Binding)?;
        Ok(())
    }
}
