use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Callback invoked with the number of matches processed so far
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Serializes progress notifications from concurrent fetch tasks.
///
/// The callback never runs concurrently with itself and never observes a
/// value lower than one it has already been given.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: ProgressCallback,
    last: Arc<Mutex<Option<usize>>>,
}

impl ProgressReporter {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            last: Arc::new(Mutex::new(None)),
        }
    }

    /// A reporter that discards every notification
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Delivers `processed` unless a larger value was already delivered
    pub fn report(&self, processed: usize) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.is_some_and(|previous| processed < previous) {
            return;
        }
        *last = Some(processed);
        (self.callback)(processed);
    }

    pub fn last_reported(&self) -> Option<usize> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("last", &self.last_reported())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_stale_values_are_dropped() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::new(move |n| sink.lock().unwrap().push(n));

        for n in [1, 2, 2, 1, 5, 3, 6] {
            reporter.report(n);
        }

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 2, 5, 6]);
        assert_eq!(reporter.last_reported(), Some(6));
    }

    #[test]
    fn test_noop_tracks_last_value() {
        let reporter = ProgressReporter::noop();
        assert_eq!(reporter.last_reported(), None);
        reporter.report(3);
        assert_eq!(reporter.last_reported(), Some(3));
    }

    #[test]
    fn test_callback_never_overlaps() {
        let in_callback = Arc::new(AtomicBool::new(false));
        let overlapped = Arc::new(AtomicBool::new(false));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let (flag, overlap, sink) = (in_callback.clone(), overlapped.clone(), seen.clone());
        let reporter = ProgressReporter::new(move |n| {
            if flag.swap(true, Ordering::SeqCst) {
                overlap.store(true, Ordering::SeqCst);
            }
            sink.lock().unwrap().push(n);
            std::thread::yield_now();
            flag.store(false, Ordering::SeqCst);
        });

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let reporter = reporter.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        reporter.report(t * 50 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(!overlapped.load(Ordering::SeqCst));
        let seen = seen.lock().unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(reporter.last_reported(), seen.last().copied());
    }
}
