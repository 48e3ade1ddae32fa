use std::path::{Path, PathBuf};

use crate::constants::cache::DIR_NAME;

const APP_DIR: &str = "match_history";

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join("logs")
        .to_string_lossy()
        .to_string()
}

/// Default location of the match cache, under the platform data directory
/// (e.g., ~/.local/share on Linux).
pub fn get_default_cache_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join(DIR_NAME)
}
