use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Data parsing and validation errors
    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("API returned empty or missing data: {message} (URL: {url})")]
    ApiNoData { message: String, url: String },

    // Upstream signalled a client-side problem inside an otherwise valid listing
    #[error("Upstream reported a client error: {message}")]
    UpstreamSentinel { message: String },

    // Account and match lookups
    #[error("Account not found: {riot_id}")]
    AccountNotFound { riot_id: String },

    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: String },

    #[error("Invalid Riot ID '{riot_id}': {reason}")]
    InvalidRiotId { riot_id: String, reason: String },

    // Local match cache
    #[error("Cached match is corrupt: {path} - {message}")]
    CacheCorrupt { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a no data error
    pub fn api_no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiNoData {
            message: message.into(),
            url: url.into(),
        }
    }

    pub fn upstream_sentinel(message: impl Into<String>) -> Self {
        Self::UpstreamSentinel {
            message: message.into(),
        }
    }

    pub fn account_not_found(riot_id: impl Into<String>) -> Self {
        Self::AccountNotFound {
            riot_id: riot_id.into(),
        }
    }

    pub fn match_not_found(match_id: impl Into<String>) -> Self {
        Self::MatchNotFound {
            match_id: match_id.into(),
        }
    }

    pub fn invalid_riot_id(riot_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRiotId {
            riot_id: riot_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a cache corruption error for a cache file that failed to deserialize
    pub fn cache_corrupt(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheCorrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if error is retryable at the transport level (network issues, server errors, rate limits)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiServiceUnavailable { .. }
                | AppError::ApiRateLimit { .. }
        )
    }

    /// Check if a listing carried the upstream error sentinel.
    ///
    /// This is the only listing failure that stops a retrieval run; HTTP errors
    /// on the listing call only skip the affected page.
    pub fn is_upstream_sentinel(&self) -> bool {
        matches!(self, AppError::UpstreamSentinel { .. })
    }

    /// Check if error indicates data not found (business logic, not technical error)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ApiNotFound { .. }
                | AppError::AccountNotFound { .. }
                | AppError::MatchNotFound { .. }
                | AppError::ApiNoData { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_api_client_error_helper() {
        let error = AppError::api_client_error(403, "Forbidden", "https://api.example.com");
        assert!(matches!(error, AppError::ApiClientError { .. }));
        assert_eq!(
            error.to_string(),
            "API client error (403): Forbidden (URL: https://api.example.com)"
        );
    }

    #[test]
    fn test_cache_corrupt_helper() {
        let error = AppError::cache_corrupt("/tmp/cache/EUW1_1.json", "expected value");
        assert!(matches!(error, AppError::CacheCorrupt { .. }));
        assert_eq!(
            error.to_string(),
            "Cached match is corrupt: /tmp/cache/EUW1_1.json - expected value"
        );
    }

    #[test]
    fn test_invalid_riot_id_helper() {
        let error = AppError::invalid_riot_id("ab#1", "Too Short");
        assert_eq!(error.to_string(), "Invalid Riot ID 'ab#1': Too Short");
    }

    #[test]
    fn test_is_retryable() {
        assert!(AppError::network_timeout("url").is_retryable());
        assert!(AppError::network_connection("url", "message").is_retryable());
        assert!(AppError::api_server_error(500, "message", "url").is_retryable());
        assert!(AppError::api_rate_limit("message", "url").is_retryable());
        assert!(AppError::api_service_unavailable(503, "message", "url").is_retryable());

        assert!(!AppError::api_not_found("url").is_retryable());
        assert!(!AppError::api_client_error(400, "message", "url").is_retryable());
        assert!(!AppError::upstream_sentinel("400-series").is_retryable());
        assert!(!AppError::config_error("message").is_retryable());
        assert!(!AppError::cache_corrupt("path", "message").is_retryable());
    }

    #[test]
    fn test_is_upstream_sentinel() {
        assert!(AppError::upstream_sentinel("400-series").is_upstream_sentinel());

        assert!(!AppError::api_client_error(401, "Unauthorized", "url").is_upstream_sentinel());
        assert!(!AppError::api_client_error(403, "Forbidden", "url").is_upstream_sentinel());
        assert!(!AppError::api_not_found("url").is_upstream_sentinel());
        assert!(!AppError::network_timeout("url").is_upstream_sentinel());
    }

    #[test]
    fn test_is_not_found() {
        assert!(AppError::api_not_found("url").is_not_found());
        assert!(AppError::account_not_found("Name#TAG").is_not_found());
        assert!(AppError::match_not_found("NA1_1").is_not_found());

        assert!(!AppError::api_server_error(500, "message", "url").is_not_found());
        assert!(!AppError::config_error("message").is_not_found());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::ApiParse(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let toml_error = toml::from_str::<toml::Table>("invalid = [toml").unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }
}
