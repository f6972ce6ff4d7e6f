use crate::{
    reporter::MemoryReporter,
    status_client::mock::ScriptedSource,
    tracker::StatusTracker,
    types::TxHash,
};


pub(crate) const TEST_CHAIN_ID: u64 = 43;

/// Deterministic test hash
pub(crate) fn hash(n: u8) -> TxHash {
    TxHash(format!("0x{:064x}", n))
}

/// Helper function to set up a tracker with a shared reporter and an empty script
pub(crate) fn setup_tracker(hashes: Vec<TxHash>) -> (StatusTracker, ScriptedSource, MemoryReporter) {
    let reporter = MemoryReporter::new();
    let tracker = StatusTracker::new(hashes, TEST_CHAIN_ID, Box::new(reporter.clone()));
    (tracker, ScriptedSource::new(), reporter)
}
