use crate::constants::env_vars;
use crate::data_fetcher::models::PlatformRoute;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

pub mod paths;
pub mod user_prompts;
pub mod validation;

use paths::{get_config_path, get_default_cache_dir, get_log_dir_path};
use user_prompts::prompt_for_api_key;
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Riot developer API key, sent with every request.
    pub api_key: String,
    /// Platform the default account plays on. Determines the regional routing host.
    #[serde(default)]
    pub region: PlatformRoute,
    /// How many matches a run tries to load.
    #[serde(default = "default_history_count")]
    pub match_history_count: usize,
    /// Directory for cached match documents. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Upper bound on match downloads in flight at once.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Replaces `https://{region}.api.riotgames.com`. Mainly useful against a proxy or mock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_history_count() -> usize {
    crate::constants::matches::DEFAULT_HISTORY_COUNT
}

fn default_max_concurrent_fetches() -> usize {
    crate::constants::matches::DEFAULT_MAX_CONCURRENT_FETCHES
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            region: PlatformRoute::default(),
            match_history_count: default_history_count(),
            cache_dir: None,
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            api_base_url: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists, prompts user for an API key and creates one.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `MATCH_HISTORY_API_KEY` - Override API key
    /// - `MATCH_HISTORY_REGION` - Override platform (e.g. `euw1`)
    /// - `MATCH_HISTORY_LOG_FILE` - Override log file path
    /// - `MATCH_HISTORY_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    /// - `MATCH_HISTORY_CACHE_DIR` - Override cache directory
    ///
    /// # Notes
    /// - Config file is stored in platform-specific config directory
    /// - Handles first-time setup with user prompts
    /// - Environment variables take precedence over config file
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else if let Ok(api_key) = std::env::var(env_vars::API_KEY) {
            Config {
                api_key,
                ..Config::default()
            }
        } else {
            let config = Config {
                api_key: prompt_for_api_key().await?,
                ..Config::default()
            };
            config.validate()?;
            config.save().await?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies `MATCH_HISTORY_*` environment variables on top of the current values.
    /// Unparsable numeric or region values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(env_vars::API_KEY) {
            self.api_key = api_key;
        }

        if let Ok(region) = std::env::var(env_vars::REGION) {
            match region.parse::<PlatformRoute>() {
                Ok(region) => self.region = region,
                Err(e) => warn!("Ignoring {}: {}", env_vars::REGION, e),
            }
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Ok(timeout) = std::env::var(env_vars::HTTP_TIMEOUT) {
            match timeout.parse::<u64>() {
                Ok(timeout) => self.http_timeout_seconds = timeout,
                Err(_) => warn!("Ignoring {}: '{}' is not a number", env_vars::HTTP_TIMEOUT, timeout),
            }
        }

        if let Ok(cache_dir) = std::env::var(env_vars::CACHE_DIR) {
            self.cache_dir = Some(cache_dir);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Directory the match cache lives in, resolving the default when unset
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(get_default_cache_dir)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// The API key is masked down to its last four characters.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Key:");
            println!("{}", mask_api_key(&config.api_key));
            println!("────────────────────────────────────");
            println!("Region:");
            println!("{} ({})", config.region, config.region.to_regional());
            println!("────────────────────────────────────");
            println!("Matches Per Run:");
            println!("{}", config.match_history_count);
            println!("────────────────────────────────────");
            println!("Cache Directory:");
            println!("{}", config.cache_dir().display());
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Concurrent Fetches:");
            println!("{}", config.max_concurrent_fetches);
            if let Some(base) = &config.api_base_url {
                println!("────────────────────────────────────");
                println!("API Base URL:");
                println!("{base}");
            }
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/match_history.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist. The API key is trimmed
    /// and a trailing slash is dropped from the base URL.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(&Config {
            api_key: self.api_key.trim().to_string(),
            api_base_url: self
                .api_base_url
                .as_ref()
                .map(|base| base.trim_end_matches('/').to_string()),
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path, without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
