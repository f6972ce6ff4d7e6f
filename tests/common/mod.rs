#![allow(dead_code)]

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::Duration;
use txwatch::{
    broadcast,
    reporter::MemoryReporter,
    types::TxHash,
    HttpStatusClient, Poller, StatusTracker, WatcherConfig,
};
use url::Url;

pub const TEST_CHAIN_ID: u64 = 43;
pub const STATUS_PATH: &str = "/getDetailsByTxHash";

pub fn hash(n: u8) -> TxHash {
    TxHash(format!("0x{:064x}", n))
}

/// Helper function to write a Forge-style broadcast record under `root`
pub fn write_broadcast(root: &Path, script: &str, chain_id: u64, hashes: &[TxHash]) -> PathBuf {
    let path = broadcast::broadcast_path(root, script, chain_id);
    fs::create_dir_all(path.parent().expect("broadcast path has a parent")).expect("Failed to create broadcast dir");
    let transactions: Vec<_> = hashes
        .iter()
        .map(|h| json!({ "hash": h.0, "transactionType": "CREATE", "contractName": "Counter" }))
        .collect();
    let record = json!({ "transactions": transactions, "receipts": [], "chain": chain_id });
    fs::write(&path, record.to_string()).expect("Failed to write broadcast record");
    path
}

/// Helper function to build a poller against a mock status server
pub fn setup_watch(server_url: &str, hashes: Vec<TxHash>) -> (Poller, MemoryReporter) {
    let config = WatcherConfig {
        api_url: format!("{}{}", server_url, STATUS_PATH),
        poll_interval_ms: 20,
        request_timeout_secs: 5,
        ..WatcherConfig::default()
    };
    config.validate().expect("Test config should validate");

    let endpoint: Url = config.endpoint().expect("valid endpoint");
    let client = HttpStatusClient::new(endpoint, config.request_timeout()).expect("Failed to build client");
    let reporter = MemoryReporter::new();
    let tracker = StatusTracker::new(hashes, config.chain_id, Box::new(reporter.clone()));
    let poller = Poller::new(tracker, Arc::new(client), Duration::from_millis(config.poll_interval_ms));
    (poller, reporter)
}
