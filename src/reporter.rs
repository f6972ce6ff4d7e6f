//! Human-readable progress lines.
//!
//! Every line the watcher shows a user is a `Report`. Sinks decide where the
//! line goes; diagnostics go through `tracing` instead.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::types::{TransactionStatus, TxHash};

pub const DOCS_URL: &str = "https://docs.socket.tech/api#executionstatus-values";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Number of hashes read from the broadcast record
    Found { count: usize },
    MonitoringStarted,
    /// The status request itself failed
    FetchFailed { hash: TxHash, reason: String },
    /// The request succeeded but the body was unusable
    InvalidResponse { hash: TxHash },
    NoLogs { hash: TxHash },
    /// A sub-payload callback resolved on a destination chain
    PayloadResolved { execute_tx_hash: String, callback_status: String, chain: String },
    Completed { hash: TxHash, status: TransactionStatus, chain: String },
    OnChainAddress(String),
    ForwarderAddress(String),
    ForwarderNotDeployed { hash: TxHash },
    AllCompleted,
}

impl Report {
    /// Error lines go to stderr
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Report::FetchFailed { .. } | Report::InvalidResponse { .. } | Report::ForwarderNotDeployed { .. }
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Found { count } => write!(f, "Found {} transactions to process.", count),
            Report::MonitoringStarted => write!(f, "Starting to monitor transaction statuses..."),
            Report::FetchFailed { hash, reason } => {
                write!(f, "Error fetching status for hash {}: {}", hash, reason)
            }
            Report::InvalidResponse { hash } => write!(f, "Invalid or empty response for hash: {}", hash),
            Report::NoLogs { hash } => {
                write!(f, "Hash: {}, There are no logs for this transaction hash.", hash)
            }
            Report::PayloadResolved { execute_tx_hash, callback_status, chain } => {
                write!(f, "Hash: {}, Status: {}, ChainId: {}", execute_tx_hash, callback_status, chain)
            }
            Report::Completed { hash, status, chain } => {
                write!(f, "Hash: {}, Status: {}, ChainId: {}", hash, status, chain)
            }
            Report::OnChainAddress(address) => write!(f, "OnChainAddress: {}", address),
            Report::ForwarderAddress(address) => write!(f, "ForwarderAddress: {}", address),
            Report::ForwarderNotDeployed { .. } => write!(
                f,
                "ERROR: ForwarderAddress NOT deployed. Please reach out to the SOCKET team."
            ),
            Report::AllCompleted => write!(
                f,
                "All transactions are COMPLETED. Stopping script.\nLearn more about what the status means here: {}",
                DOCS_URL
            ),
        }
    }
}

/// A sink for report lines
pub trait Reporter: Send {
    fn report(&mut self, report: Report);
}

/// Prints reports to stdout, or stderr for error lines
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, report: Report) {
        if report.is_error() {
            eprintln!("{}", report);
        } else {
            println!("{}", report);
        }
    }
}

/// Keeps every report in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Rendered lines, one entry per report
    pub fn lines(&self) -> Vec<String> {
        self.reports().iter().map(|r| r.to_string()).collect()
    }

    pub fn count(&self, predicate: impl Fn(&Report) -> bool) -> usize {
        self.reports().iter().filter(|r| predicate(r)).count()
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, report: Report) {
        self.reports.lock().unwrap_or_else(|e| e.into_inner()).push(report);
    }
}
