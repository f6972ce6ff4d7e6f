use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration};

use crate::{
    poller::{Poller, PollerOutcome},
    reporter::{MemoryReporter, Report},
    status_client::{
        mock::{bodies, ScriptedSource},
        StatusClientError, StatusSource,
    },
    tracker::{StatusTracker, TrackerError},
    types::{StatusResponse, TxHash},
};

fn hash(n: u8) -> TxHash {
    TxHash(format!("0x{:064x}", n))
}

/// Helper function to set up a poller over a scripted source with a short interval
fn setup_poller(hashes: Vec<TxHash>, source: Arc<ScriptedSource>) -> (Poller, MemoryReporter) {
    let reporter = MemoryReporter::new();
    let tracker = StatusTracker::new(hashes, 43, Box::new(reporter.clone()));
    (Poller::new(tracker, source, Duration::from_millis(10)), reporter)
}

/// Tests that the poller runs passes until every record is terminal
#[tokio::test]
async fn test_poller_runs_to_completion() {
    println!("\n=== Starting test_poller_runs_to_completion ===");
    let source = Arc::new(ScriptedSource::new());
    source.push_body(&hash(1), bodies::in_progress(vec![]));
    source.push_body(&hash(1), bodies::in_progress(vec![]));
    source.push_body(&hash(1), bodies::completed(vec![]));
    source.push_failure(&hash(2), "timeout");
    source.push_body(&hash(2), bodies::no_logs());

    let (mut poller, reporter) = setup_poller(vec![hash(1), hash(2)], source.clone());
    let outcome = timeout(Duration::from_secs(5), poller.run())
        .await
        .expect("Poller should finish in time")
        .expect("Poller should not fail");

    println!("[TEST]   Lines: {:#?}", reporter.lines());
    assert_eq!(outcome, PollerOutcome::Completed);
    assert!(poller.tracker().is_done());
    assert_eq!(source.calls(&hash(1)), 3);
    assert_eq!(source.calls(&hash(2)), 2);
    assert_eq!(reporter.count(|r| matches!(r, Report::AllCompleted)), 1);
    assert!(poller.cancellation_token().is_cancelled(), "Completion should cancel the token");

    // Re-running a finished poller does not poll or report again
    let again = poller.run().await.expect("Second run should not fail");
    assert_eq!(again, PollerOutcome::Cancelled);
    assert_eq!(reporter.count(|r| matches!(r, Report::AllCompleted)), 1);
    assert_eq!(source.calls(&hash(1)), 3);
}

/// Tests that cancelling the token stops a run that would otherwise never end
#[tokio::test]
async fn test_poller_cancellation() {
    println!("\n=== Starting test_poller_cancellation ===");
    let source = Arc::new(ScriptedSource::new());
    source.push_body(&hash(1), bodies::in_progress(vec![]));

    let (poller, _reporter) = setup_poller(vec![hash(1)], source.clone());
    let cancel = poller.cancellation_token();
    let handle = tokio::spawn(async move {
        let mut poller = poller;
        poller.run().await
    });

    sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let outcome = timeout(Duration::from_secs(5), handle)
        .await
        .expect("Poller should stop after cancellation")
        .expect("Task should not panic")
        .expect("Poller should not fail");
    assert_eq!(outcome, PollerOutcome::Cancelled);
    assert!(source.calls(&hash(1)) >= 1, "At least one pass should have run");
}

/// Tests that the fatal forwarder condition ends the run with an error
#[tokio::test]
async fn test_poller_stops_on_fatal_error() {
    println!("\n=== Starting test_poller_stops_on_fatal_error ===");
    let source = Arc::new(ScriptedSource::new());
    source.push_body(&hash(1), bodies::in_progress(vec![]));
    source.push_body(
        &hash(2),
        bodies::completed(vec![bodies::deployer_payload(1, "0x01", "0x02", false)]),
    );

    let (mut poller, reporter) = setup_poller(vec![hash(1), hash(2)], source);
    match timeout(Duration::from_secs(5), poller.run()).await.expect("Poller should finish in time") {
        Err(TrackerError::ForwarderNotDeployed(h)) => assert_eq!(h, hash(2)),
        other => panic!("Expected forwarder error, got {:?}", other),
    }
    assert_eq!(reporter.count(|r| matches!(r, Report::AllCompleted)), 0);
}

/// Source that answers slower than the poll interval and records how many
/// fetches are running at once
#[derive(Default)]
struct SlowSource {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait]
impl StatusSource for SlowSource {
    async fn fetch_status(&self, _hash: &TxHash) -> Result<StatusResponse, StatusClientError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        sleep(Duration::from_millis(35)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let body = if call < 3 { bodies::in_progress(vec![]) } else { bodies::completed(vec![]) };
        Ok(serde_json::from_str(&body)?)
    }
}

/// Tests that passes never overlap when a pass outlasts the interval
#[tokio::test]
async fn test_slow_passes_do_not_overlap() {
    println!("\n=== Starting test_slow_passes_do_not_overlap ===");
    let source = Arc::new(SlowSource::default());
    let reporter = MemoryReporter::new();
    let tracker = StatusTracker::new(vec![hash(1)], 43, Box::new(reporter.clone()));
    let mut poller = Poller::new(tracker, source.clone(), Duration::from_millis(5));

    let outcome = timeout(Duration::from_secs(5), poller.run())
        .await
        .expect("Poller should finish in time")
        .expect("Poller should not fail");

    let calls = source.calls.load(Ordering::SeqCst);
    let max_in_flight = source.max_in_flight.load(Ordering::SeqCst);
    println!("[TEST]   Calls: {}, max in flight: {}", calls, max_in_flight);
    assert_eq!(outcome, PollerOutcome::Completed);
    assert_eq!(max_in_flight, 1, "Only one fetch should run at a time");
    assert_eq!(calls, 4, "One fetch per pass until completion");
    assert_eq!(reporter.count(|r| matches!(r, Report::AllCompleted)), 1);
}
