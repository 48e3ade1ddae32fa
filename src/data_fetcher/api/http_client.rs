//! HTTP client creation and configuration utilities

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

use crate::error::AppError;

/// Header carrying the developer API key on every request
pub const API_KEY_HEADER: &str = "x-riot-token";

/// Creates an HTTP client with connection pooling, a request timeout and the
/// API key attached as a default header.
///
/// # Returns
/// * `Result<Client, AppError>` - A configured reqwest HTTP client or error
pub fn create_http_client(api_key: &str, timeout_seconds: u64) -> Result<Client, AppError> {
    let mut headers = HeaderMap::new();
    let mut key = HeaderValue::from_str(api_key)
        .map_err(|_| AppError::config_error("API key contains characters not allowed in a header"))?;
    key.set_sensitive(true);
    headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .default_headers(headers)
        .build()
        .map_err(AppError::ApiFetch)
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client("test-key", crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS)
        .expect("Failed to create test HTTP client")
}
