use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::{StatusClientError, StatusSource};
use crate::types::{StatusResponse, TxHash};

/// Query parameter carrying the transaction hash
pub const TX_HASH_PARAM: &str = "txHash";

/// Status source backed by the HTTP status endpoint
#[derive(Clone)]
pub struct HttpStatusClient {
    client: Client,
    endpoint: Url,
}

impl HttpStatusClient {
    /// Create a client for `endpoint`, optionally bounding every request by `timeout`
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, StatusClientError> {
        if endpoint.cannot_be_a_base() {
            return Err(StatusClientError::InvalidEndpoint(endpoint.to_string()));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// The endpoint with `txHash` set, keeping any other query pairs
    pub fn request_url(&self, hash: &TxHash) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(TX_HASH_PARAM, &hash.0);
        url
    }
}

#[async_trait]
impl StatusSource for HttpStatusClient {
    async fn fetch_status(&self, hash: &TxHash) -> Result<StatusResponse, StatusClientError> {
        let url = self.request_url(hash);
        tracing::debug!(hash = %hash, url = %url, "Fetching transaction status");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(StatusClientError::Http(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
