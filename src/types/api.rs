//! Wire types returned by the transaction status endpoint.
//!
//! Every field past the top-level `status` is optional: the API omits or nulls
//! them while a transaction is still being processed.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Marker value of `StatusResponse::status` for a successful lookup
pub const SUCCESS: &str = "SUCCESS";

/// Callback status of a payload whose promise has been resolved
pub const PROMISE_RESOLVED: &str = "PROMISE_RESOLVED";

/// Top-level body; `response` is only interpreted once `status` is `SUCCESS`
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub response: Option<Value>,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }

    /// Per-transaction details of a successful lookup.
    ///
    /// `None` when the lookup failed, `response` is missing or null, or it is
    /// not an array of transaction objects.
    pub fn into_details(self) -> Option<Vec<TransactionDetails>> {
        if !self.is_success() {
            return None;
        }
        match self.response? {
            Value::Null => None,
            value => match serde_json::from_value(value) {
                Ok(details) => Some(details),
                Err(e) => {
                    tracing::debug!(error = %e, "Unexpected response shape");
                    None
                }
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub write_payloads: Vec<WritePayload>,
}

/// Execution status as reported for a single transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    InProgress,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritePayload {
    #[serde(default)]
    pub chain_slug: Option<ChainSlug>,
    #[serde(default)]
    pub call_back_details: Option<CallbackDetails>,
    #[serde(default)]
    pub execute_details: Option<ExecuteDetails>,
    #[serde(default)]
    pub deployer_details: Option<DeployerDetails>,
}

impl WritePayload {
    pub fn callback_status(&self) -> Option<&str> {
        self.call_back_details
            .as_ref()
            .and_then(|d| d.callback_status.as_deref())
    }

    pub fn execute_tx_hash(&self) -> Option<&str> {
        self.execute_details
            .as_ref()
            .and_then(|d| d.execute_tx_hash.as_deref())
            .filter(|h| !h.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackDetails {
    #[serde(default)]
    pub callback_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteDetails {
    #[serde(default)]
    pub execute_tx_hash: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployerDetails {
    #[serde(default)]
    pub on_chain_address: Option<String>,
    #[serde(default)]
    pub forwarder_address: Option<String>,
    #[serde(default)]
    pub is_forwarder_deployed: Option<bool>,
}

impl DeployerDetails {
    /// True when the API sent the object without any known field
    pub fn is_empty(&self) -> bool {
        self.on_chain_address.is_none()
            && self.forwarder_address.is_none()
            && self.is_forwarder_deployed.is_none()
    }

    pub fn forwarder_deployed(&self) -> bool {
        self.is_forwarder_deployed == Some(true)
    }
}

/// Destination chain identifier, kept as sent since it is only displayed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ChainSlug(pub Value);

impl fmt::Display for ChainSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
