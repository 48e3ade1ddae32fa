//! Shared counters and per-match retry bookkeeping for one retrieval run

use std::collections::{BTreeSet, HashMap};
use tracing::{trace, warn};

use crate::data_fetcher::models::MatchId;

/// Where a single match is in its lifecycle.
///
/// `Fetching -> {Loaded | Failed}`, `Failed -> Retrying -> {Loaded | FailedFinal}`.
/// `Loaded` and `FailedFinal` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFetchStatus {
    Fetching,
    Loaded,
    Failed,
    Retrying,
    FailedFinal,
}

/// Counters and retry queue shared by every fetch task of a run.
///
/// All mutation goes through the methods below, which keep
/// `loaded + missed` equal to the number of matches that have reached an outcome.
#[derive(Debug, Default)]
pub struct FetchState {
    loaded: usize,
    missed: usize,
    retry_queue: BTreeSet<MatchId>,
    statuses: HashMap<MatchId, MatchFetchStatus>,
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Matches that failed and have not (yet) been recovered by a retry
    pub fn missed(&self) -> usize {
        self.missed
    }

    /// The value reported to progress listeners
    pub fn processed(&self) -> usize {
        self.loaded + self.missed
    }

    pub fn pending_retries(&self) -> usize {
        self.retry_queue.len()
    }

    pub fn status(&self, id: &MatchId) -> Option<MatchFetchStatus> {
        self.statuses.get(id).copied()
    }

    /// Number of distinct matches this run has dispatched
    pub fn seen(&self) -> usize {
        self.statuses.len()
    }

    /// IDs currently in the given state, sorted
    pub fn ids_with_status(&self, wanted: MatchFetchStatus) -> Vec<MatchId> {
        let mut ids: Vec<MatchId> = self
            .statuses
            .iter()
            .filter(|&(_, status)| *status == wanted)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Claims a match for its first attempt. Returns false if this run already saw it.
    pub fn begin_fetch(&mut self, id: &MatchId) -> bool {
        if self.statuses.contains_key(id) {
            return false;
        }
        self.statuses.insert(id.clone(), MatchFetchStatus::Fetching);
        true
    }

    /// Copies the pending retries out and empties the queue
    pub fn take_retry_snapshot(&mut self) -> Vec<MatchId> {
        std::mem::take(&mut self.retry_queue).into_iter().collect()
    }

    /// Moves a failed match into its single retry attempt
    pub fn begin_retry(&mut self, id: &MatchId) -> bool {
        self.retry_queue.remove(id);
        match self.statuses.get_mut(id) {
            Some(status @ MatchFetchStatus::Failed) => {
                *status = MatchFetchStatus::Retrying;
                true
            }
            other => {
                warn!("Refusing to retry {} from state {:?}", id, other);
                false
            }
        }
    }

    /// Records a successful load and returns the new processed count
    pub fn record_success(&mut self, id: &MatchId) -> usize {
        match self.statuses.get_mut(id) {
            Some(status @ MatchFetchStatus::Fetching) => {
                *status = MatchFetchStatus::Loaded;
                self.loaded += 1;
            }
            Some(status @ MatchFetchStatus::Retrying) => {
                *status = MatchFetchStatus::Loaded;
                self.missed -= 1;
                self.loaded += 1;
            }
            other => warn!("Ignoring success for {} in state {:?}", id, other),
        }
        trace!("loaded={} missed={}", self.loaded, self.missed);
        self.processed()
    }

    /// Records a failed attempt and returns the new processed count.
    ///
    /// A first failure is queued for one retry; a failed retry is final and
    /// stays counted in `missed`.
    pub fn record_failure(&mut self, id: &MatchId) -> usize {
        match self.statuses.get_mut(id) {
            Some(status @ MatchFetchStatus::Fetching) => {
                *status = MatchFetchStatus::Failed;
                self.missed += 1;
                self.retry_queue.insert(id.clone());
            }
            Some(status @ MatchFetchStatus::Retrying) => {
                *status = MatchFetchStatus::FailedFinal;
            }
            other => warn!("Ignoring failure for {} in state {:?}", id, other),
        }
        trace!("loaded={} missed={}", self.loaded, self.missed);
        self.processed()
    }
}
