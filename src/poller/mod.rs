use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::status_client::StatusSource;
use crate::tracker::{PassOutcome, StatusTracker, TrackerError};

#[cfg(test)]
mod tests;

/// How a polling run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerOutcome {
    /// Every record reached a terminal state
    Completed,
    Cancelled,
}

/// Drives `StatusTracker::poll_once` on a fixed interval until the batch is done.
///
/// Passes are serialized: the next tick is only awaited after the current
/// pass has returned, and ticks missed by a slow pass are skipped rather than
/// fired in a burst.
pub struct Poller {
    tracker: StatusTracker,
    source: Arc<dyn StatusSource>,
    interval: Duration,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(tracker: StatusTracker, source: Arc<dyn StatusSource>, interval: Duration) -> Self {
        Self {
            tracker,
            source,
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn tracker(&self) -> &StatusTracker {
        &self.tracker
    }

    /// Run until completion, cancellation, or a fatal tracker error.
    ///
    /// The first pass starts immediately.
    pub async fn run(&mut self) -> Result<PollerOutcome, TrackerError> {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!("Polling cancelled");
                    return Ok(PollerOutcome::Cancelled);
                }
                _ = ticker.tick() => {}
            }

            let pass = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!("Polling cancelled during a pass");
                    return Ok(PollerOutcome::Cancelled);
                }
                pass = self.tracker.poll_once(self.source.as_ref()) => pass?,
            };

            match pass {
                PassOutcome::Pending { remaining } => {
                    tracing::debug!(remaining, "Waiting for next poll pass");
                }
                PassOutcome::Completed | PassOutcome::AlreadyDone => {
                    self.cancel.cancel();
                    return Ok(PollerOutcome::Completed);
                }
            }
        }
    }
}
