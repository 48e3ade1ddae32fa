pub mod api;
pub mod cache;
pub mod matches;
pub mod models;

pub use api::{MatchApi, RiotApiClient};
pub use cache::MatchCache;
pub use matches::{FetchSummary, MatchFetcher, ProgressReporter};
pub use models::{Account, MatchId, MatchRecord, PlatformRoute, RegionalRoute};
