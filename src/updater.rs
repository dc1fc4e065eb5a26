use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::AsyncAction;
use crate::errors::FeedError;

/// Delay before the baseline-establishing fetch.
pub const FIRST_CHECK_DELAY: Duration = Duration::from_secs(5);

/// Interval between update checks once the baseline exists.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// First successful fetch; nothing to compare yet.
    BaselineEstablished,
    /// Payload matches the baseline.
    Unchanged,
    /// Payload drifted from the baseline; polling should stop.
    ChangeDetected,
}

/// Feed-change detector. The fingerprint is the raw response body, so any
/// content change flips it. One detector lives per poller cycle; re-arming
/// the poller after a consumed update starts over with a fresh baseline.
#[derive(Debug, Default)]
pub struct UpdateDetector {
    baseline: Option<String>,
}

impl UpdateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one successfully fetched payload through the detector.
    pub fn observe(&mut self, payload: &str) -> PollOutcome {
        match &self.baseline {
            None => {
                self.baseline = Some(payload.to_string());
                PollOutcome::BaselineEstablished
            }
            Some(baseline) if baseline == payload => PollOutcome::Unchanged,
            Some(_) => PollOutcome::ChangeDetected,
        }
    }
}

/// Background polling loop. Runs until a feed change is signalled, then
/// returns; the caller re-arms it with a fresh task after consuming the
/// update. Fetch failures are logged and retried on the next interval,
/// never surfaced.
///
/// Generic over the fetch so tests can drive it with canned payloads and
/// tokio paused time.
pub async fn run_poller<F, Fut>(fetch: F, tx: mpsc::Sender<AsyncAction>)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<String, FeedError>>,
{
    let mut detector = UpdateDetector::new();

    tokio::time::sleep(FIRST_CHECK_DELAY).await;
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    loop {
        ticker.tick().await;
        match fetch().await {
            Ok(payload) => {
                if detector.observe(&payload) == PollOutcome::ChangeDetected {
                    let _ = tx.send(AsyncAction::UpdateAvailable).await;
                    return;
                }
            }
            Err(err) => {
                tracing::warn!("schedule update check failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_first_fetch_establishes_baseline() {
        let mut detector = UpdateDetector::new();
        assert_eq!(detector.observe("abc"), PollOutcome::BaselineEstablished);
    }

    #[test]
    fn test_identical_payloads_stay_quiet() {
        let mut detector = UpdateDetector::new();
        detector.observe("abc");
        assert_eq!(detector.observe("abc"), PollOutcome::Unchanged);
        assert_eq!(detector.observe("abc"), PollOutcome::Unchanged);
    }

    #[test]
    fn test_drift_detected_against_baseline() {
        let mut detector = UpdateDetector::new();
        detector.observe("abc");
        assert_eq!(detector.observe("abd"), PollOutcome::ChangeDetected);
        // Baseline is the first payload, not the last seen.
        assert_eq!(detector.observe("abc"), PollOutcome::Unchanged);
    }

    #[test]
    fn test_fresh_detector_starts_a_new_cycle() {
        let mut old = UpdateDetector::new();
        old.observe("abc");
        assert_eq!(old.observe("abd"), PollOutcome::ChangeDetected);

        // Re-arming spawns a new detector: the drifted payload becomes
        // the next baseline instead of re-triggering.
        let mut fresh = UpdateDetector::new();
        assert_eq!(fresh.observe("abd"), PollOutcome::BaselineEstablished);
        assert_eq!(fresh.observe("abd"), PollOutcome::Unchanged);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_signals_once_then_stops() {
        let (tx, mut rx) = mpsc::channel(8);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let fetch = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                // Baseline, unchanged, then drift.
                Ok(if n < 2 { "A".to_string() } else { "B".to_string() })
            }
        };

        run_poller(fetch, tx).await;

        assert!(matches!(rx.recv().await, Some(AsyncAction::UpdateAvailable)));
        assert!(rx.try_recv().is_err(), "poller must signal exactly once");
        assert_eq!(calls.load(Ordering::SeqCst), 3, "polling halts after the signal");
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_swallows_fetch_errors() {
        let (tx, mut rx) = mpsc::channel(8);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let fetch = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                match n {
                    0 => Err(FeedError::Status(502)),
                    1 => Ok("A".to_string()),
                    2 => Ok("A".to_string()),
                    _ => Ok("B".to_string()),
                }
            }
        };

        run_poller(fetch, tx).await;

        assert!(matches!(rx.recv().await, Some(AsyncAction::UpdateAvailable)));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
