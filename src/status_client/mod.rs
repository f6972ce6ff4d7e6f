use async_trait::async_trait;
use thiserror::Error;
use crate::types::{StatusResponse, TxHash};

pub mod http;
pub use http::HttpStatusClient;

#[cfg(any(test, feature = "test"))]
pub mod mock;


#[derive(Debug, Error)]
pub enum StatusClientError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP Error: {0}")]
    Http(reqwest::StatusCode),
    #[error("Failed to decode status response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid status endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// A source of transaction status answers.
///
/// The tracker asks once per unsettled hash per pass and treats every error
/// as transient.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current status of a transaction
    async fn fetch_status(&self, hash: &TxHash) -> Result<StatusResponse, StatusClientError>;
}
