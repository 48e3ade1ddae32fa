//! Generic HTTP fetching with transport-level retry and error mapping

use rand::Rng;
use reqwest::Client;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::constants::retry;
use crate::error::AppError;

/// Adds +/- `JITTER_FRACTION` of random spread to a delay
fn jittered(delay: Duration) -> Duration {
    let spread = rand::rng().random_range(-retry::JITTER_FRACTION..=retry::JITTER_FRACTION);
    delay.mul_f64(1.0 + spread)
}

/// Maps a non-success HTTP status to the matching error variant
pub(crate) fn error_for_status(status: reqwest::StatusCode, url: &str) -> AppError {
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");

    match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

/// Reads a `Retry-After` header given in seconds, capped at `MAX_RETRY_AFTER_SECS`
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs.min(retry::MAX_RETRY_AFTER_SECS)))
}

/// Maps a failed request (no response received) to the matching error variant
fn error_for_request(e: reqwest::Error, url: &str) -> AppError {
    if e.is_timeout() {
        AppError::network_timeout(url)
    } else if e.is_connect() {
        AppError::network_connection(url, e.to_string())
    } else {
        AppError::ApiFetch(e)
    }
}

/// Fetches and parses a JSON document.
///
/// This function:
/// - Retries errors that `AppError::is_retryable` accepts (rate limits, server
///   errors, timeouts, connection failures) with exponential backoff plus jitter
/// - Respects `Retry-After` headers, up to `retry::MAX_RETRY_AFTER_SECS`
/// - Maps HTTP status codes and body problems to specific `AppError` variants
///
/// # Arguments
/// * `client` - HTTP client for making requests
/// * `url` - URL to fetch data from
///
/// # Returns
/// * `Result<T, AppError>` - Parsed response data or error
#[instrument(skip(client))]
pub(crate) async fn fetch<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, AppError> {
    debug!("Fetching data from URL: {url}");

    let mut attempt = 0u32;
    let mut backoff = Duration::from_millis(retry::BASE_DELAY_MS);
    let response = loop {
        let (err, server_wait) = match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => break resp,
            Ok(resp) => (
                error_for_status(resp.status(), url),
                retry_after(resp.headers()),
            ),
            Err(e) => (error_for_request(e, url), None),
        };

        if err.is_retryable() && attempt < retry::MAX_ATTEMPTS {
            let wait = server_wait.unwrap_or_else(|| jittered(backoff));
            warn!(
                "{}. Retrying in {:?} (attempt {}/{})",
                err,
                wait,
                attempt + 1,
                retry::MAX_ATTEMPTS
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
            backoff = backoff.saturating_mul(2);
            continue;
        }

        if err.is_not_found() {
            debug!("HTTP 404 (URL: {})", url);
        } else {
            error!("{}", err);
        }
        return Err(err);
    };

    debug!("Response status: {}", response.status());

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());

    match serde_json::from_str::<T>(&response_text) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            debug!(
                "Response text (first 200 chars): {}",
                &response_text.chars().take(200).collect::<String>()
            );

            // Check if it's malformed JSON vs unexpected structure
            if response_text.trim().is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !response_text.trim_start().starts_with('{')
                && !response_text.trim_start().starts_with('[')
            {
                Err(AppError::api_malformed_json(
                    "Response is not valid JSON",
                    url,
                ))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}
