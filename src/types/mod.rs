use std::collections::HashSet;
use std::fmt;

pub mod api;

pub use api::{
    CallbackDetails, ChainSlug, DeployerDetails, ExecuteDetails, ExecutionStatus, StatusResponse,
    TransactionDetails, WritePayload,
};

/// A transaction hash as recorded in a broadcast run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

/// Status of a tracked transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// No usable answer from the status API yet
    Pending,
    /// The API reports execution still running
    InProgress,
    /// The API reports execution finished
    Completed,
    /// The transaction was mined but produced no logs
    NoLogs,
}

impl TransactionStatus {
    /// Terminal statuses are never polled again once their line is printed
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::NoLogs)
    }
}

/// Tracking state for a single transaction hash
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub status: TransactionStatus,
    /// Set once the terminal line for this hash has been emitted
    pub printed: bool,
    /// Dedupe keys of payload lines already emitted for this hash
    pub printed_payloads: HashSet<String>,
}

impl TransactionRecord {
    pub fn new(hash: TxHash) -> Self {
        Self {
            hash,
            status: TransactionStatus::Pending,
            printed: false,
            printed_payloads: HashSet::new(),
        }
    }

    /// A settled record is terminal and already reported
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal() && self.printed
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::InProgress => write!(f, "IN_PROGRESS"),
            TransactionStatus::Completed => write!(f, "COMPLETED"),
            TransactionStatus::NoLogs => write!(f, "NO_LOGS"),
        }
    }
}
