//! Forge broadcast records.
//!
//! `forge script --broadcast` writes the transactions of each run to
//! `broadcast/<Script>.s.sol/<chainId>/run-latest.json`. Only the hashes are
//! needed here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::TxHash;

pub const BROADCAST_FILE_NAME: &str = "run-latest.json";
const SCRIPT_SUFFIX: &str = ".s.sol";

static TX_HASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{64}$").expect("transaction hash pattern is valid"));

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("File not found at path '{}'", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read '{}': {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse '{}': {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_json::Error),
    #[error("Transaction #{0} has no hash")]
    MissingHash(usize),
    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRecord {
    pub transactions: Vec<BroadcastTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastTransaction {
    #[serde(default)]
    pub hash: Option<String>,
}

impl BroadcastRecord {
    /// Transaction hashes in broadcast order
    pub fn hashes(&self) -> Result<Vec<TxHash>, BroadcastError> {
        self.transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                let hash = tx.hash.as_deref().ok_or(BroadcastError::MissingHash(index))?;
                if !TX_HASH_RE.is_match(hash) {
                    return Err(BroadcastError::InvalidHash(hash.to_string()));
                }
                Ok(TxHash(hash.to_string()))
            })
            .collect()
    }
}

/// Path of the latest broadcast run of `script_name` on `chain_id`
pub fn broadcast_path(broadcast_dir: &Path, script_name: &str, chain_id: u64) -> PathBuf {
    let script = script_name.strip_suffix(SCRIPT_SUFFIX).unwrap_or(script_name);
    broadcast_dir
        .join(format!("{}{}", script, SCRIPT_SUFFIX))
        .join(chain_id.to_string())
        .join(BROADCAST_FILE_NAME)
}

/// Read a broadcast record and return its transaction hashes
pub fn load_transaction_hashes(path: &Path) -> Result<Vec<TxHash>, BroadcastError> {
    if !path.exists() {
        return Err(BroadcastError::NotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path).map_err(|e| BroadcastError::Io(path.to_path_buf(), e))?;
    let record: BroadcastRecord =
        serde_json::from_str(&contents).map_err(|e| BroadcastError::Parse(path.to_path_buf(), e))?;
    let hashes = record.hashes()?;
    tracing::debug!(path = %path.display(), count = hashes.len(), "Loaded broadcast record");
    Ok(hashes)
}
