pub mod urls;
pub mod http_client;
mod fetch_utils;
mod riot_client;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::{API_KEY_HEADER, create_http_client};
// Re-export the API surface used by the pipeline
pub use riot_client::{MatchApi, RiotApiClient};
