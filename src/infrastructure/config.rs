//! Configuration infrastructure
//!
//! Settings are grouped by concern:
//! 1. `api`: backend location and request limits
//! 2. `ui`: presentation constants (currency, placeholder image, feedback timing)
//! 3. `logging`: output targets and filters
//!
//! The JSON file under the user config directory is the base layer and
//! `PRODUCT_REC__SECTION__KEY` environment variables override it.

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PRODUCT_REC";
/// Separator between prefix, section and key in override variables
pub const ENV_SEPARATOR: &str = "__";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration file error at {path}: {message}")]
    File { path: PathBuf, message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    fn file(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::File {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    pub user_agent: String,

    /// Number of recommendations requested per refresh
    pub recommendation_limit: u32,

    /// Number of history rows requested by the history view
    pub history_limit: u32,
}

/// Presentation constants handed to the view-model projector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub currency_symbol: String,

    /// Image shown when a product has none or its image fails to load
    pub placeholder_image_url: String,

    /// How long the "added to cart" feedback stays before reverting, in milliseconds
    pub cart_feedback_ms: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Number of log files to keep (older files are deleted at startup)
    pub max_files: u32,

    pub auto_cleanup_logs: bool,

    /// Per-target level directives (e.g., "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            recommendation_limit: defaults::RECOMMENDATION_LIMIT,
            history_limit: defaults::HISTORY_LIMIT,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            currency_symbol: defaults::CURRENCY_SYMBOL.to_string(),
            placeholder_image_url: defaults::PLACEHOLDER_IMAGE_URL.to_string(),
            cart_feedback_ms: defaults::CART_FEEDBACK_MS,
        }
    }
}

impl UiConfig {
    pub const fn cart_feedback(&self) -> Duration {
        Duration::from_millis(self.cart_feedback_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: true,
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: true,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("hyper_util".to_string(), "warn".to_string());
                filters.insert("tokio".to_string(), "info".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Reject settings the client cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::validation(format!("api.base_url is not a valid URL: {}", e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::validation(format!(
                "api.base_url must use http or https, got {}",
                base.scheme()
            )));
        }
        if base.cannot_be_a_base() {
            return Err(ConfigError::validation("api.base_url cannot be used as a base URL"));
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::validation("api.timeout_seconds must be greater than 0"));
        }
        if self.api.recommendation_limit == 0 {
            return Err(ConfigError::validation("api.recommendation_limit must be greater than 0"));
        }
        if self.api.history_limit == 0 {
            return Err(ConfigError::validation("api.history_limit must be greater than 0"));
        }

        if self.ui.cart_feedback_ms == 0 {
            return Err(ConfigError::validation("ui.cart_feedback_ms must be greater than 0"));
        }

        let level = self.logging.level.to_lowercase();
        if !defaults::LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level must be one of {:?}, got {}",
                defaults::LOG_LEVELS,
                self.logging.level
            )));
        }
        if !self.logging.console_output && !self.logging.file_output {
            return Err(ConfigError::validation("at least one logging output must be enabled"));
        }

        Ok(())
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(defaults::APP_DIR_NAME))
            .ok_or_else(|| ConfigError::validation("Failed to get user config directory"))
    }

    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self::with_path(Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME)))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load file + environment layers, writing defaults on first run.
    ///
    /// A file that is not valid JSON is backed up next to itself with a
    /// `.corrupted` suffix and replaced by defaults.
    pub async fn load_config(&self) -> Result<AppConfig, ConfigError> {
        if fs::try_exists(&self.config_path).await.unwrap_or(false) {
            self.recover_if_corrupted().await?;
        } else {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            self.save_config(&AppConfig::default()).await?;
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(self.config_path.as_path()).format(config::FileFormat::Json))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    async fn recover_if_corrupted(&self) -> Result<(), ConfigError> {
        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| ConfigError::file(&self.config_path, e))?;

        if let Err(parse_error) = serde_json::from_str::<serde_json::Value>(&content) {
            warn!("Configuration file is not valid JSON: {}", parse_error);

            let backup_path = self.config_path.with_extension("json.corrupted");
            match fs::copy(&self.config_path, &backup_path).await {
                Ok(_) => info!("Backed up corrupted config to: {:?}", backup_path),
                Err(e) => warn!("Failed to create backup of corrupted config: {}", e),
            }

            self.save_config(&AppConfig::default()).await?;
            warn!("Reset to default configuration");
        }
        Ok(())
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::file(parent, e))?;
        }

        let content =
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::file(&self.config_path, e))?;
        fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::file(&self.config_path, e))?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }
}

/// Default configuration values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "product-rec-agent";
    pub const CONFIG_FILE_NAME: &str = "config.json";

    pub const API_BASE_URL: &str = "http://localhost:5000/api";
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const USER_AGENT: &str = concat!("product-rec-agent/", env!("CARGO_PKG_VERSION"));
    pub const RECOMMENDATION_LIMIT: u32 = 8;
    pub const HISTORY_LIMIT: u32 = 50;

    pub const CURRENCY_SYMBOL: &str = "$";
    pub const PLACEHOLDER_IMAGE_URL: &str =
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500";
    pub const CART_FEEDBACK_MS: u64 = 2000;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_MAX_FILES: u32 = 7;
    pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
}
