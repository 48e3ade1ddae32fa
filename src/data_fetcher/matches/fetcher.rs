//! Paged, concurrent retrieval of an account's match history into the local cache.
//!
//! A run lists match IDs one page at a time, fetches every listed match
//! concurrently (serving from the cache where possible), then gives each
//! failed match exactly one more attempt before moving to the next page.

use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, instrument, warn};

use super::progress::ProgressReporter;
use super::state::{FetchState, MatchFetchStatus};
use crate::constants::matches::{
    DEFAULT_MAX_CONCURRENT_FETCHES, PAGE_SIZE, UPSTREAM_ERROR_SENTINEL,
};
use crate::data_fetcher::api::MatchApi;
use crate::data_fetcher::cache::MatchCache;
use crate::data_fetcher::models::{Account, MatchId, RegionalRoute};
use crate::error::AppError;

/// What a run accomplished
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub desired: usize,
    /// Listing calls issued, including the backfill page
    pub pages_requested: usize,
    pub backfill_requested: bool,
    /// True if a listing returned the upstream error sentinel and the run stopped early
    pub aborted: bool,
    pub loaded: usize,
    pub missed: usize,
    /// Distinct match IDs dispatched during the run
    pub ids_seen: usize,
    pub loaded_ids: Vec<MatchId>,
    pub missed_ids: Vec<MatchId>,
}

impl FetchSummary {
    pub fn processed(&self) -> usize {
        self.loaded + self.missed
    }
}

impl fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loaded, {} missed ({} pages",
            self.loaded, self.missed, self.pages_requested
        )?;
        if self.aborted {
            write!(f, ", stopped early")?;
        }
        write!(f, ")")
    }
}

enum PageOutcome {
    Completed,
    Skipped,
    Aborted,
}

/// Whether a fetch is the first attempt or the single retry
#[derive(Debug, Clone, Copy)]
enum Attempt {
    First,
    Retry,
}

/// Where a successfully loaded match came from
#[derive(Debug)]
enum MatchSource {
    Cache,
    Network,
}

/// Everything a per-match task needs, shared across the tasks of one run
struct RunContext<A> {
    api: Arc<A>,
    cache: MatchCache,
    routing: RegionalRoute,
    state: Mutex<FetchState>,
    progress: ProgressReporter,
    permits: Semaphore,
}

/// Drives match retrieval for a single account
pub struct MatchFetcher<A: MatchApi> {
    api: Arc<A>,
    cache: MatchCache,
    routing: RegionalRoute,
    puuid: String,
    max_concurrent_fetches: usize,
}

impl<A: MatchApi> fmt::Debug for MatchFetcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchFetcher")
            .field("cache", &self.cache)
            .field("routing", &self.routing)
            .field("puuid", &self.puuid)
            .field("max_concurrent_fetches", &self.max_concurrent_fetches)
            .finish_non_exhaustive()
    }
}

impl<A: MatchApi> MatchFetcher<A> {
    /// Creates a fetcher for an account whose PUUID has been resolved
    pub fn new(api: Arc<A>, cache: MatchCache, account: &Account) -> Result<Self, AppError> {
        let puuid = account.puuid.clone().ok_or_else(|| {
            AppError::config_error(format!(
                "Account {} has no PUUID; resolve it before fetching matches",
                account.riot_id()
            ))
        })?;

        Ok(Self {
            api,
            cache,
            routing: account.continent(),
            puuid,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        })
    }

    /// Caps how many matches are fetched at once. Zero is treated as one.
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    /// Starts a run in the background and returns a handle to await its summary.
    ///
    /// `on_progress` receives the number of matches processed so far, never
    /// concurrently and never decreasing.
    pub fn begin<F>(self, desired: usize, on_progress: F) -> JoinHandle<FetchSummary>
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        let progress = ProgressReporter::new(on_progress);
        tokio::spawn(async move { self.run_with_progress(desired, &progress).await })
    }

    /// Fetches roughly `desired` matches, returning once every page has been processed
    pub async fn run(&self, desired: usize) -> FetchSummary {
        self.run_with_progress(desired, &ProgressReporter::noop()).await
    }

    #[instrument(skip(self, progress), fields(puuid = %self.puuid))]
    pub async fn run_with_progress(
        &self,
        desired: usize,
        progress: &ProgressReporter,
    ) -> FetchSummary {
        let ctx = Arc::new(RunContext {
            api: Arc::clone(&self.api),
            cache: self.cache.clone(),
            routing: self.routing,
            state: Mutex::new(FetchState::new()),
            progress: progress.clone(),
            permits: Semaphore::new(self.max_concurrent_fetches),
        });

        if let Err(e) = self.cache.ensure_dir().await {
            warn!("Could not prepare cache directory: {}", e);
        }

        let steps = desired.div_ceil(PAGE_SIZE);
        info!(
            "Loading {} matches over {} pages via {}",
            desired, steps, self.routing
        );

        let mut summary = FetchSummary {
            desired,
            ..FetchSummary::default()
        };

        for step in 0..steps {
            summary.pages_requested += 1;
            let offset = step.saturating_mul(PAGE_SIZE);
            if let PageOutcome::Aborted = self.process_page(&ctx, offset).await {
                summary.aborted = true;
                break;
            }
        }

        if !summary.aborted && steps > 0 {
            let needs_backfill = {
                let state = ctx.state.lock().await;
                state.loaded() < desired || state.missed() > 0 || state.pending_retries() > 0
            };
            if needs_backfill {
                debug!("Requesting one extra page to make up the shortfall");
                summary.pages_requested += 1;
                summary.backfill_requested = true;
                let offset = steps.saturating_mul(PAGE_SIZE);
                if let PageOutcome::Aborted = self.process_page(&ctx, offset).await {
                    summary.aborted = true;
                }
            }
        }

        let state = ctx.state.lock().await;
        summary.loaded = state.loaded();
        summary.missed = state.missed();
        summary.ids_seen = state.seen();
        summary.loaded_ids = state.ids_with_status(MatchFetchStatus::Loaded);
        summary.missed_ids = state.ids_with_status(MatchFetchStatus::FailedFinal);

        if summary.missed > 0 {
            warn!(
                "Finished loading matches with {} misses: {:?}",
                summary.missed, summary.missed_ids
            );
        } else {
            info!("Finished loading matches: {}", summary);
        }
        summary
    }

    /// Lists one page, fetches its matches, then drains the retry queue
    async fn process_page(&self, ctx: &Arc<RunContext<A>>, offset: usize) -> PageOutcome {
        let listing = ctx
            .api
            .list_match_ids(self.routing, &self.puuid, PAGE_SIZE, offset)
            .await
            .and_then(|ids| {
                if ids.iter().any(|id| id.as_str() == UPSTREAM_ERROR_SENTINEL) {
                    Err(AppError::upstream_sentinel(format!(
                        "listing at offset {offset} returned '{UPSTREAM_ERROR_SENTINEL}'"
                    )))
                } else {
                    Ok(ids)
                }
            });

        let ids = match listing {
            Ok(ids) => ids,
            Err(e) if e.is_upstream_sentinel() => {
                warn!("Match listing rejected at offset {}, stopping: {}", offset, e);
                return PageOutcome::Aborted;
            }
            Err(e) => {
                error!("Failed to list matches at offset {}: {}", offset, e);
                return PageOutcome::Skipped;
            }
        };

        debug!("Page at offset {} listed {} matches", offset, ids.len());

        let mut tasks = JoinSet::new();
        for id in ids {
            if !ctx.state.lock().await.begin_fetch(&id) {
                debug!("Skipping {} already handled this run", id);
                continue;
            }
            tasks.spawn(fetch_one(Arc::clone(ctx), id, Attempt::First));
        }
        join_all(&mut tasks).await;

        let retries = ctx.state.lock().await.take_retry_snapshot();
        if !retries.is_empty() {
            info!("Retrying {} failed matches", retries.len());
        }
        for id in retries {
            if ctx.state.lock().await.begin_retry(&id) {
                tasks.spawn(fetch_one(Arc::clone(ctx), id, Attempt::Retry));
            }
        }
        join_all(&mut tasks).await;

        PageOutcome::Completed
    }
}

async fn join_all(tasks: &mut JoinSet<()>) {
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            error!("Match fetch task failed: {}", e);
        }
    }
}

/// One attempt at one match; records the outcome and reports progress
async fn fetch_one<A: MatchApi>(ctx: Arc<RunContext<A>>, id: MatchId, attempt: Attempt) {
    let result = match ctx.permits.acquire().await {
        Ok(_permit) => load_or_fetch(&ctx, &id).await,
        Err(e) => Err(AppError::config_error(format!("Fetch limiter closed: {e}"))),
    };

    let mut state = ctx.state.lock().await;
    let processed = match result {
        Ok(source) => {
            let processed = state.record_success(&id);
            debug!("Loaded {} from {:?} ({:?} attempt)", id, source, attempt);
            processed
        }
        Err(e) => {
            warn!("Failed to load {} ({:?} attempt): {}", id, attempt, e);
            state.record_failure(&id)
        }
    };
    // Reported under the state lock so values arrive in order
    ctx.progress.report(processed);
}

/// Serves a match from the cache, or downloads and caches it
async fn load_or_fetch<A: MatchApi>(
    ctx: &RunContext<A>,
    id: &MatchId,
) -> Result<MatchSource, AppError> {
    if ctx.cache.exists(id).await {
        match ctx.cache.load(id).await {
            Ok(_) => return Ok(MatchSource::Cache),
            Err(e) => warn!("Cached copy of {} is unusable, fetching again: {}", id, e),
        }
    }

    let record = ctx.api.fetch_match(ctx.routing, id).await?;
    ctx.cache.store(id, &record).await?;
    Ok(MatchSource::Network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::{MatchRecord, PlatformRoute};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use tempfile::{TempDir, tempdir};

    enum ListingFailure {
        Transport,
        Forbidden,
        Sentinel,
    }

    /// In-memory upstream: an account with `total` matches named `NA1_<n>`
    #[derive(Default)]
    struct ScriptedApi {
        total: usize,
        listing_failures: HashMap<usize, ListingFailure>,
        page_overrides: HashMap<usize, Vec<&'static str>>,
        failures_left: StdMutex<HashMap<String, usize>>,
        list_calls: StdMutex<Vec<usize>>,
        fetch_calls: StdMutex<Vec<String>>,
    }

    impl ScriptedApi {
        fn with_history(total: usize) -> Self {
            Self {
                total,
                ..Self::default()
            }
        }

        fn failing(self, id: &str, times: usize) -> Self {
            self.failures_left.lock().unwrap().insert(id.to_string(), times);
            self
        }

        fn list_offsets(&self) -> Vec<usize> {
            self.list_calls.lock().unwrap().clone()
        }

        fn fetch_count(&self) -> usize {
            self.fetch_calls.lock().unwrap().len()
        }

        fn fetches_of(&self, id: &str) -> usize {
            self.fetch_calls
                .lock()
                .unwrap()
                .iter()
                .filter(|called| called.as_str() == id)
                .count()
        }
    }

    impl MatchApi for ScriptedApi {
        async fn list_match_ids(
            &self,
            _routing: RegionalRoute,
            _puuid: &str,
            count: usize,
            offset: usize,
        ) -> Result<Vec<MatchId>, AppError> {
            self.list_calls.lock().unwrap().push(offset);
            match self.listing_failures.get(&offset) {
                Some(ListingFailure::Transport) => {
                    return Err(AppError::network_timeout("http://mock/ids"));
                }
                Some(ListingFailure::Forbidden) => {
                    return Err(AppError::api_client_error(403, "Forbidden", "http://mock/ids"));
                }
                Some(ListingFailure::Sentinel) => {
                    return Ok(vec![MatchId::new(UPSTREAM_ERROR_SENTINEL)]);
                }
                None => {}
            }
            if let Some(ids) = self.page_overrides.get(&offset) {
                return Ok(ids.iter().map(|id| MatchId::new(*id)).collect());
            }
            let end = (offset + count).min(self.total);
            Ok((offset..end).map(|n| MatchId::new(format!("NA1_{n}"))).collect())
        }

        async fn fetch_match(
            &self,
            _routing: RegionalRoute,
            match_id: &MatchId,
        ) -> Result<MatchRecord, AppError> {
            self.fetch_calls
                .lock()
                .unwrap()
                .push(match_id.as_str().to_string());
            let should_fail = {
                let mut failures = self.failures_left.lock().unwrap();
                match failures.get_mut(match_id.as_str()) {
                    Some(left) if *left > 0 => {
                        *left -= 1;
                        true
                    }
                    _ => false,
                }
            };
            if should_fail {
                return Err(AppError::network_timeout("http://mock/match"));
            }
            Ok(record(match_id.as_str()))
        }
    }

    fn record(id: &str) -> MatchRecord {
        serde_json::from_value(serde_json::json!({
            "metadata": {"matchId": id, "dataVersion": "2", "participants": ["me"]},
            "info": {"gameCreation": 1700000000000i64, "gameDuration": 1800, "gameMode": "CLASSIC",
                     "gameVersion": "14.4", "queueId": 420, "participants": []}
        }))
        .unwrap()
    }

    fn fetcher(api: &Arc<ScriptedApi>) -> (MatchFetcher<ScriptedApi>, MatchCache, TempDir) {
        let dir = tempdir().unwrap();
        let cache = MatchCache::new(dir.path().join("cached_matches"));
        let account = Account::from_puuid("me", PlatformRoute::Na1);
        let fetcher = MatchFetcher::new(Arc::clone(api), cache.clone(), &account).unwrap();
        (fetcher, cache, dir)
    }

    #[tokio::test]
    async fn test_thirty_matches_take_two_pages() {
        let api = Arc::new(ScriptedApi::with_history(100));
        let (fetcher, cache, _dir) = fetcher(&api);

        let summary = fetcher.run(30).await;

        assert_eq!(api.list_offsets(), vec![0, 25]);
        assert!(!summary.backfill_requested);
        assert_eq!(summary.loaded, 50);
        assert_eq!(summary.missed, 0);
        assert_eq!(cache.list_ids().await.unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_retry_recovers_single_failure() {
        let api = Arc::new(ScriptedApi::with_history(100).failing("NA1_5", 1));
        let (fetcher, cache, _dir) = fetcher(&api);

        let summary = fetcher.run(25).await;

        assert_eq!(api.fetches_of("NA1_5"), 2);
        assert_eq!(summary.loaded, 25);
        assert_eq!(summary.missed, 0);
        assert!(summary.loaded_ids.contains(&MatchId::new("NA1_5")));
        assert!(cache.exists(&MatchId::new("NA1_5")).await);
        assert_eq!(api.list_offsets(), vec![0]);
    }

    #[tokio::test]
    async fn test_double_failure_is_permanent_miss_and_triggers_backfill() {
        let api = Arc::new(ScriptedApi::with_history(100).failing("NA1_3", 2));
        let (fetcher, cache, _dir) = fetcher(&api);

        let summary = fetcher.run(25).await;

        assert_eq!(api.fetches_of("NA1_3"), 2);
        assert_eq!(api.list_offsets(), vec![0, 25]);
        assert!(summary.backfill_requested);
        assert_eq!(summary.missed, 1);
        assert_eq!(summary.missed_ids, vec![MatchId::new("NA1_3")]);
        assert_eq!(summary.loaded, 49);
        assert!(!cache.exists(&MatchId::new("NA1_3")).await);
    }

    #[tokio::test]
    async fn test_cached_matches_are_not_fetched() {
        let api = Arc::new(ScriptedApi::with_history(100));
        let (fetcher, cache, _dir) = fetcher(&api);
        for n in 0..10 {
            let id = format!("NA1_{n}");
            cache.store(&MatchId::new(&id), &record(&id)).await.unwrap();
        }

        let summary = fetcher.run(25).await;

        assert_eq!(api.fetch_count(), 15);
        assert_eq!(summary.loaded, 25);
        assert_eq!(summary.missed, 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_fetched_again() {
        let api = Arc::new(ScriptedApi::with_history(25));
        let (fetcher, cache, _dir) = fetcher(&api);
        cache.ensure_dir().await.unwrap();
        tokio::fs::write(cache.dir().join("NA1_0.json"), b"{\"metadata\": nope")
            .await
            .unwrap();

        let summary = fetcher.run(25).await;

        assert_eq!(api.fetches_of("NA1_0"), 1);
        assert_eq!(summary.loaded, 25);
        assert!(cache.load(&MatchId::new("NA1_0")).await.is_ok());
    }

    #[tokio::test]
    async fn test_sentinel_listing_stops_the_run() {
        let mut api = ScriptedApi::with_history(100);
        api.listing_failures.insert(0, ListingFailure::Sentinel);
        let api = Arc::new(api);
        let (fetcher, _cache, _dir) = fetcher(&api);

        let summary = fetcher.run(50).await;

        assert!(summary.aborted);
        assert_eq!(api.list_offsets(), vec![0]);
        assert_eq!(api.fetch_count(), 0);
        assert_eq!(summary.processed(), 0);
    }

    #[tokio::test]
    async fn test_forbidden_listing_skips_only_that_page() {
        let mut api = ScriptedApi::with_history(100);
        api.listing_failures.insert(0, ListingFailure::Forbidden);
        let api = Arc::new(api);
        let (fetcher, _cache, _dir) = fetcher(&api);

        let summary = fetcher.run(50).await;

        assert!(!summary.aborted);
        assert!(summary.backfill_requested);
        assert_eq!(api.list_offsets(), vec![0, 25, 50]);
        assert_eq!(summary.loaded, 50);
        assert!(!summary.loaded_ids.contains(&MatchId::new("NA1_0")));
    }

    #[tokio::test]
    async fn test_transport_failure_skips_only_that_page() {
        let mut api = ScriptedApi::with_history(100);
        api.listing_failures.insert(0, ListingFailure::Transport);
        let api = Arc::new(api);
        let (fetcher, _cache, _dir) = fetcher(&api);

        let summary = fetcher.run(50).await;

        assert!(!summary.aborted);
        assert_eq!(api.list_offsets(), vec![0, 25, 50]);
        assert!(summary.backfill_requested);
        assert_eq!(summary.loaded, 50);
        assert!(!summary.loaded_ids.contains(&MatchId::new("NA1_0")));
    }

    #[tokio::test]
    async fn test_short_history_requests_one_extra_page() {
        let api = Arc::new(ScriptedApi::with_history(10));
        let (fetcher, _cache, _dir) = fetcher(&api);

        let summary = fetcher.run(30).await;

        assert_eq!(api.list_offsets(), vec![0, 25, 50]);
        assert_eq!(summary.loaded, 10);
        assert_eq!(summary.pages_requested, 3);
    }

    #[tokio::test]
    async fn test_ids_repeated_across_pages_are_fetched_once() {
        let mut api = ScriptedApi::with_history(100);
        api.page_overrides.insert(0, vec!["NA1_a", "NA1_b"]);
        api.page_overrides.insert(25, vec!["NA1_b", "NA1_c"]);
        let api = Arc::new(api);
        let (fetcher, _cache, _dir) = fetcher(&api);

        let summary = fetcher.run(50).await;

        assert_eq!(api.fetches_of("NA1_b"), 1);
        assert_eq!(summary.ids_seen, 3 + 25);
    }

    #[tokio::test]
    async fn test_begin_reports_monotonic_progress() {
        let api = Arc::new(ScriptedApi::with_history(60).failing("NA1_7", 2).failing("NA1_8", 1));
        let (fetcher, _cache, _dir) = fetcher(&api);
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let handle = fetcher
            .with_max_concurrent_fetches(4)
            .begin(50, move |n| sink.lock().unwrap().push(n));
        let summary = handle.await.unwrap();

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last().copied(), Some(summary.ids_seen));
        assert_eq!(summary.processed(), summary.ids_seen);
        assert_eq!(summary.missed_ids, vec![MatchId::new("NA1_7")]);
    }

    #[tokio::test]
    async fn test_account_without_puuid_is_rejected() {
        let api = Arc::new(ScriptedApi::with_history(1));
        let account = Account::parse("Someone#EUW", PlatformRoute::Euw1).unwrap();
        let result = MatchFetcher::new(api, MatchCache::new("unused"), &account);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
