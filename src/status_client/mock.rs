//! Scripted status source for tests.
//!
//! Each hash gets a queue of canned answers. The last queued answer repeats
//! once the queue is drained, so a record can sit in one state for any number
//! of passes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::{StatusClientError, StatusSource};
use crate::types::{StatusResponse, TxHash};

/// A canned answer: either a JSON body or a transport failure message
#[derive(Debug, Clone)]
pub enum ScriptedAnswer {
    Body(String),
    Failure(String),
}

#[derive(Default)]
struct Script {
    queue: VecDeque<ScriptedAnswer>,
    last: Option<ScriptedAnswer>,
    calls: usize,
}

#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<TxHash, Script>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body for `hash`
    pub fn push_body(&self, hash: &TxHash, body: impl Into<String>) {
        self.push(hash, ScriptedAnswer::Body(body.into()));
    }

    /// Queue a transport failure for `hash`
    pub fn push_failure(&self, hash: &TxHash, reason: impl Into<String>) {
        self.push(hash, ScriptedAnswer::Failure(reason.into()));
    }

    pub fn push(&self, hash: &TxHash, answer: ScriptedAnswer) {
        let mut scripts = self.scripts.lock().unwrap_or_else(|e| e.into_inner());
        scripts.entry(hash.clone()).or_default().queue.push_back(answer);
    }

    /// Number of fetches issued for `hash` so far
    pub fn calls(&self, hash: &TxHash) -> usize {
        let scripts = self.scripts.lock().unwrap_or_else(|e| e.into_inner());
        scripts.get(hash).map(|s| s.calls).unwrap_or(0)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_status(&self, hash: &TxHash) -> Result<StatusResponse, StatusClientError> {
        let answer = {
            let mut scripts = self.scripts.lock().unwrap_or_else(|e| e.into_inner());
            let script = scripts.entry(hash.clone()).or_default();
            script.calls += 1;
            if let Some(next) = script.queue.pop_front() {
                script.last = Some(next);
            }
            script.last.clone()
        };

        match answer {
            Some(ScriptedAnswer::Body(body)) => Ok(serde_json::from_str(&body)?),
            Some(ScriptedAnswer::Failure(reason)) => Err(StatusClientError::Transport(reason)),
            None => Err(StatusClientError::Transport(format!("nothing scripted for {}", hash))),
        }
    }
}

/// JSON builders for common status bodies
pub mod bodies {
    use serde_json::{json, Value};

    pub fn success(details: Vec<Value>) -> String {
        json!({ "status": "SUCCESS", "response": details }).to_string()
    }

    pub fn no_logs() -> String {
        success(Vec::new())
    }

    pub fn failed() -> String {
        json!({ "status": "FAILED" }).to_string()
    }

    pub fn in_progress(payloads: Vec<Value>) -> String {
        success(vec![json!({ "status": "IN_PROGRESS", "writePayloads": payloads })])
    }

    pub fn completed(payloads: Vec<Value>) -> String {
        success(vec![json!({ "status": "COMPLETED", "writePayloads": payloads })])
    }

    pub fn payload(chain_slug: u64, execute_tx_hash: &str, callback_status: &str) -> Value {
        json!({
            "chainSlug": chain_slug,
            "callBackDetails": { "callbackStatus": callback_status },
            "executeDetails": { "executeTxHash": execute_tx_hash },
        })
    }

    pub fn deployer_payload(chain_slug: u64, on_chain: &str, forwarder: &str, deployed: bool) -> Value {
        json!({
            "chainSlug": chain_slug,
            "callBackDetails": { "callbackStatus": "PROMISE_RESOLVED" },
            "executeDetails": { "executeTxHash": null },
            "deployerDetails": {
                "onChainAddress": on_chain,
                "forwarderAddress": forwarder,
                "isForwarderDeployed": deployed,
            },
        })
    }
}
