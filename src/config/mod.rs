//! Configuration management for cliprompt
//!
//! This module handles loading, parsing, and managing configuration from:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Completion engine configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// History configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Prompt configuration
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Completion engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionConfig {
    /// Upper bound for a single provider call, in milliseconds
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,

    /// Age after which cached suggestions read as absent (None keeps them forever)
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,

    /// Simulated latency of the sample catalog, in milliseconds
    #[serde(default = "default_catalog_latency_ms")]
    pub catalog_latency_ms: u64,
}

/// Command history configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file (None for stderr)
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Prompt rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptConfig {
    /// Program name shown in the prompt
    #[serde(default = "default_program_name")]
    pub program_name: String,

    /// Enable colored prompt
    #[serde(default = "default_color_output")]
    pub color_output: bool,
}

// Default value functions
fn default_provider_timeout_ms() -> u64 {
    5_000
}

fn default_catalog_latency_ms() -> u64 {
    150
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    Config::default_dir().join("history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

fn default_program_name() -> String {
    "cloud".to_string()
}

fn default_color_output() -> bool {
    true
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: default_provider_timeout_ms(),
            cache_ttl_secs: None,
            catalog_latency_ms: default_catalog_latency_ms(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            timestamps: default_log_timestamps(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            program_name: default_program_name(),
            color_output: default_color_output(),
        }
    }
}

impl Config {
    /// Directory holding the config file and history
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cliprompt")
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        Self::default_dir().join("config.toml")
    }

    /// Load configuration from a file
    ///
    /// When `path` is None the default location is used, and a missing default
    /// file yields the default configuration. An explicitly given path must exist.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render configuration as TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.completion.provider_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.provider_timeout_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.completion.cache_ttl_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "completion.cache_ttl_secs".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.history.max_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.max_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.prompt.program_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "prompt.program_name".to_string(),
                value: self.prompt.program_name.clone(),
            }
            .into());
        }

        Ok(())
    }
}

impl CompletionConfig {
    /// Provider call budget as Duration
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Cache entry lifetime, if eviction is enabled
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Simulated catalog latency as Duration
    pub fn catalog_latency(&self) -> Duration {
        Duration::from_millis(self.catalog_latency_ms)
    }
}

impl LogLevel {
    /// Directive string accepted by `EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
