use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PATH_PREFIX: &str = "/api/v1";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CodeBrainConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

/// Where the remote service lives.
///
/// The effective base is `base_url` joined with `path_prefix`; see
/// [`ApiConfig::endpoint_base`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `None` means the default prefix; an empty string means no prefix at all.
    #[serde(default)]
    pub path_prefix: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,

    #[serde(default)]
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_datetime_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path_prefix: None,
            timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: String::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            datetime_format: default_datetime_format(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl ApiConfig {
    pub fn prefix(&self) -> &str {
        self.path_prefix.as_deref().unwrap_or(DEFAULT_PATH_PREFIX)
    }

    /// Base URL and prefix joined, with exactly one slash between them and no
    /// trailing slash.
    ///
    /// `http://host/` + `/api/v1/` becomes `http://host/api/v1`.
    pub fn endpoint_base(&self) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let prefix = self.prefix().trim().trim_matches('/');

        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, prefix)
        }
    }
}

impl CodeBrainConfig {
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("CODEBRAIN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut codebrain_config: CodeBrainConfig = config.try_deserialize()?;

        if let Ok(url) = std::env::var("CODEBRAIN_API_URL") {
            codebrain_config.api.base_url = url;
        }

        if let Ok(prefix) = std::env::var("CODEBRAIN_API_PREFIX") {
            codebrain_config.api.path_prefix = Some(prefix);
        }

        if let Ok(level) = std::env::var("CODEBRAIN_LOG_LEVEL") {
            codebrain_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            codebrain_config.logging.level = level;
        }

        codebrain_config.validate()?;

        Ok(codebrain_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.base_url".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.base_url".to_string(),
                message: "Must start with http:// or https://".to_string(),
            });
        }

        if self.api.timeout_secs == Some(0) {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.timeout_secs".to_string(),
                message: "Must be greater than 0 when set".to_string(),
            });
        }

        if self.tui.tick_rate_ms == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "tui.tick_rate_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, base_url: Option<String>, prefix: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        if let Some(prefix) = prefix {
            self.api.path_prefix = Some(prefix);
        }
        self
    }

    pub fn to_toml(&self) -> Result<String, ConfigLoadError> {
        toml::to_string_pretty(self).map_err(|e| ConfigLoadError::Serialize(e.to_string()))
    }

    /// Write the default configuration to `path`, refusing to overwrite an existing file.
    pub fn write_default(path: &Path) -> Result<(), ConfigLoadError> {
        if path.exists() {
            return Err(ConfigLoadError::InvalidValue {
                key: path.display().to_string(),
                message: "File already exists".to_string(),
            });
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, CodeBrainConfig::default().to_toml()?)?;
        Ok(())
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("codebrain.toml"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".codebrain").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    for path in get_dotenv_paths() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn get_dotenv_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
        paths.push(cwd.join(".env.local"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".codebrain").join(".env"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join(".env"));
    }

    paths
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("codebrain"))
}

pub fn default_config_file() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.toml"))
}
