//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `LOSIGHT_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline the dashboard applies to every request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Backstop timeout of the HTTP client itself
    #[serde(default = "default_transport_timeout")]
    pub transport_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5002/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_transport_timeout() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            transport_timeout_secs: default_transport_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn transport_timeout(&self) -> Duration {
        Duration::from_secs(self.transport_timeout_secs)
    }
}

/// Output rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Outlier scatter width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Outlier scatter height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Where SVG and CSV outputs are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_width() -> u32 {
    960
}

fn default_height() -> u32 {
    400
}

fn default_output_dir() -> String {
    "./losight-output".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output_dir: default_output_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> (Self, LoadNotes) {
        let mut config = Config::default();
        let warnings = config.apply_env_overrides();
        (
            config,
            LoadNotes {
                source: None,
                warnings,
            },
        )
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<(Self, LoadNotes), ConfigError> {
        let mut config = Self::load(path)?;
        let warnings = config.apply_env_overrides();
        Ok((
            config,
            LoadNotes {
                source: Some(path.to_path_buf()),
                warnings,
            },
        ))
    }

    /// Load from default locations or environment
    pub fn load_default() -> (Self, LoadNotes) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("losight").join("config.toml")),
            Some(PathBuf::from("/etc/losight/config.toml")),
            Some(PathBuf::from("./losight.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths, |key| std::env::var(key).ok())
    }

    /// First readable file among `paths`, else defaults; overrides apply either way
    fn load_first(
        paths: &[PathBuf],
        var: impl Fn(&str) -> Option<String>,
    ) -> (Self, LoadNotes) {
        let mut warnings = Vec::new();

        for path in paths.iter().filter(|path| path.exists()) {
            match Self::load(path) {
                Ok(mut config) => {
                    warnings.extend(config.apply_overrides(&var));
                    let source = Some(path.clone());
                    return (config, LoadNotes { source, warnings });
                }
                Err(e) => warnings.push(format!("Failed to load config from {:?}: {}", path, e)),
            }
        }

        let mut config = Config::default();
        warnings.extend(config.apply_overrides(&var));
        (
            config,
            LoadNotes {
                source: None,
                warnings,
            },
        )
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) -> Vec<String> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Returns a warning for every override that was ignored
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // API overrides
        if let Some(url) = var("LOSIGHT_API_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = var("LOSIGHT_REQUEST_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => warnings.push(format!("Ignoring LOSIGHT_REQUEST_TIMEOUT_SECS={:?}", secs)),
            }
        }

        // Render overrides
        if let Some(dir) = var("LOSIGHT_OUTPUT_DIR") {
            self.render.output_dir = dir;
        }

        // Logging overrides
        if let Some(level) = var("LOSIGHT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("LOSIGHT_LOG_FORMAT") {
            self.logging.format = format;
        }

        warnings
    }
}

/// What loading found, held until the subscriber is installed
#[derive(Debug, Default)]
pub struct LoadNotes {
    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl LoadNotes {
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::warn!("{}", warning);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# LOSight Configuration
#
# Environment variables override these settings:
# - LOSIGHT_API_URL
# - LOSIGHT_REQUEST_TIMEOUT_SECS
# - LOSIGHT_OUTPUT_DIR
# - LOSIGHT_LOG_LEVEL
# - LOSIGHT_LOG_FORMAT

[api]
# Base URL of the LOS analytics API
base_url = "http://localhost:5002/api"

# Per-request deadline (seconds)
request_timeout_secs = 30

# HTTP client timeout (seconds)
transport_timeout_secs = 60

[render]
# Outlier scatter size in pixels
width = 960
height = 400

# Directory for SVG and CSV outputs
output_dir = "./losight-output"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/losight/losight.log"
"#
    .to_string()
}
