//! League of Legends match history retrieval
//!
//! Lists an account's recent matches page by page, downloads each match
//! concurrently and keeps every payload in a local JSON cache so later runs
//! only fetch what is new. Failed downloads get one retry per page, and a
//! single extra page is requested when a run falls short of its target.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use match_history::config::Config;
//! use match_history::data_fetcher::{Account, MatchCache, MatchFetcher, PlatformRoute, RiotApiClient};
//! use match_history::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let client = RiotApiClient::new(&config)?;
//!
//!     let mut account = Account::parse("Faker#KR1", PlatformRoute::Kr)?;
//!     let dto = client
//!         .find_account(account.continent(), &account.game_name, &account.tag_line)
//!         .await?;
//!     account.apply_lookup(dto);
//!
//!     let cache = MatchCache::new(config.cache_dir());
//!     let fetcher = MatchFetcher::new(Arc::new(client), cache, &account)?;
//!     let handle = fetcher.begin(30, |processed| println!("{processed} matches processed"));
//!     let summary = handle.await.expect("fetch task panicked");
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::cache::{CacheStats, MatchCache};
pub use data_fetcher::matches::{FetchSummary, MatchFetcher, ProgressReporter};
pub use data_fetcher::models::{Account, MatchId, MatchRecord, PlatformRoute, RegionalRoute};
pub use error::AppError;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
