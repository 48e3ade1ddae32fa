use crate::config::Config;
use crate::constants::matches::MAX_HISTORY_COUNT;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API key cannot be empty or contain whitespace
/// - Match history count, HTTP timeout and fetch concurrency must be positive
/// - Match history count cannot exceed `MAX_HISTORY_COUNT`
/// - Cache directory and log file path, if set, cannot be empty
/// - Log file path parent directory must exist or be creatable
/// - API base URL, if set, must be an http(s) URL
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    validate_api_key(&config.api_key)?;

    if config.match_history_count == 0 {
        return Err(AppError::config_error(
            "Match history count must be at least 1",
        ));
    }
    if config.match_history_count > MAX_HISTORY_COUNT {
        return Err(AppError::config_error(format!(
            "Match history count cannot exceed {MAX_HISTORY_COUNT}"
        )));
    }
    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }
    if config.max_concurrent_fetches == 0 {
        return Err(AppError::config_error(
            "Concurrent fetch limit must be at least 1",
        ));
    }

    if let Some(cache_dir) = &config.cache_dir
        && cache_dir.trim().is_empty()
    {
        return Err(AppError::config_error("Cache directory cannot be empty"));
    }

    if let Some(base) = &config.api_base_url
        && !base.starts_with("http://")
        && !base.starts_with("https://")
    {
        return Err(AppError::config_error(
            "API base URL must start with http:// or https://",
        ));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// Checks that a key can be sent as a header value
pub fn validate_api_key(api_key: &str) -> Result<(), AppError> {
    if api_key.is_empty() {
        return Err(AppError::config_error("API key cannot be empty"));
    }
    if api_key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AppError::config_error(
            "API key cannot contain whitespace or control characters",
        ));
    }
    Ok(())
}
