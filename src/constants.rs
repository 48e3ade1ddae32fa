//! Application-wide constants and configuration values
//!
//! This module centralizes all magic numbers and configuration constants
//! to improve maintainability and make the codebase more configurable.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 100;

/// Match history retrieval tuning
pub mod matches {
    /// Number of match IDs requested per listing call
    pub const PAGE_SIZE: usize = 25;

    /// Hard ceiling the listing endpoint accepts for a single call
    pub const MAX_IDS_PER_CALL: usize = 100;

    /// Default number of matches to load when the config does not say otherwise
    pub const DEFAULT_HISTORY_COUNT: usize = 30;

    /// Largest match count a single run accepts
    pub const MAX_HISTORY_COUNT: usize = 10_000;

    /// Default number of per-match fetches allowed in flight at once
    pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

    /// Marker the listing call returns in place of IDs when the upstream
    /// rejected the request
    pub const UPSTREAM_ERROR_SENTINEL: &str = "400-series";
}

/// Local match cache settings
pub mod cache {
    /// Files at or below this size are treated as absent (partial writes)
    pub const MIN_CACHE_FILE_BYTES: u64 = 5;

    /// Extension used for cached match documents
    pub const FILE_EXTENSION: &str = "json";

    /// Directory name for cached matches under the data directory
    pub const DIR_NAME: &str = "cached_matches";
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API key override
    pub const API_KEY: &str = "MATCH_HISTORY_API_KEY";

    /// Environment variable for platform region override (e.g. `euw1`)
    pub const REGION: &str = "MATCH_HISTORY_REGION";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "MATCH_HISTORY_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "MATCH_HISTORY_HTTP_TIMEOUT";

    /// Environment variable for cache directory override
    pub const CACHE_DIR: &str = "MATCH_HISTORY_CACHE_DIR";
}

/// Retry configuration for the HTTP layer
pub mod retry {
    /// Maximum number of transport-level retry attempts for a single request
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;

    /// Jitter range applied to backoff (+/- fraction of the delay)
    pub const JITTER_FRACTION: f64 = 0.2;

    /// Longest server-requested `Retry-After` wait honored (seconds)
    pub const MAX_RETRY_AFTER_SECS: u64 = 60;
}

/// Riot ID validation limits
pub mod riot_id {
    pub const MIN_GAME_NAME_LENGTH: usize = 3;
    pub const MAX_GAME_NAME_LENGTH: usize = 16;
    pub const MIN_TAG_LINE_LENGTH: usize = 3;
    pub const MAX_TAG_LINE_LENGTH: usize = 5;

    /// Characters that never appear in a valid game name or tag line
    pub const INVALID_CHARACTERS: &[char] = &['#', '*', '/', '\\', '?', '!', '%'];
}
