pub mod fetcher;
pub mod progress;
pub mod state;

pub use fetcher::{FetchSummary, MatchFetcher};
pub use progress::{ProgressCallback, ProgressReporter};
pub use state::{FetchState, MatchFetchStatus};
