use thiserror::Error;

use crate::reporter::{Report, Reporter};
use crate::status_client::StatusSource;
use crate::types::{
    api::PROMISE_RESOLVED, ExecutionStatus, StatusResponse, TransactionRecord, TransactionStatus,
    TxHash, WritePayload,
};

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Forwarder not deployed for transaction {0}")]
    ForwarderNotDeployed(TxHash),
}

/// Result of a single pass over the records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Some records still need polling
    Pending { remaining: usize },
    /// This pass brought the last record to a terminal state
    Completed,
    /// The batch had already completed before this pass
    AlreadyDone,
}

/// Owns the per-hash records and the batch completion flag
pub struct StatusTracker {
    records: Vec<TransactionRecord>,
    done: bool,
    /// Shown as the chain when a completed transaction carries no deployer details
    fallback_chain_id: u64,
    reporter: Box<dyn Reporter>,
}

impl StatusTracker {
    pub fn new(hashes: Vec<TxHash>, fallback_chain_id: u64, reporter: Box<dyn Reporter>) -> Self {
        Self {
            records: hashes.into_iter().map(TransactionRecord::new).collect(),
            done: false,
            fallback_chain_id,
            reporter,
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn record(&self, hash: &TxHash) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| &r.hash == hash)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Records not yet in a terminal state
    pub fn remaining(&self) -> usize {
        self.records.iter().filter(|r| !r.status.is_terminal()).count()
    }

    /// Poll every unsettled record once, in order.
    ///
    /// Fetch failures and unusable bodies leave the record untouched for the
    /// next pass. Only a completed transaction whose forwarder is missing
    /// aborts the pass.
    pub async fn poll_once(&mut self, source: &dyn StatusSource) -> Result<PassOutcome, TrackerError> {
        if self.done {
            return Ok(PassOutcome::AlreadyDone);
        }

        for record in self.records.iter_mut() {
            if record.is_settled() {
                continue;
            }

            match source.fetch_status(&record.hash).await {
                Ok(response) => {
                    apply_response(record, response, self.fallback_chain_id, self.reporter.as_mut())?;
                }
                Err(e) => {
                    tracing::warn!(hash = %record.hash, error = %e, "Status fetch failed");
                    self.reporter.report(Report::FetchFailed {
                        hash: record.hash.clone(),
                        reason: e.to_string(),
                    });
                    self.reporter.report(Report::InvalidResponse { hash: record.hash.clone() });
                }
            }
        }

        let remaining = self.remaining();
        tracing::info!(remaining, total = self.records.len(), "Poll pass finished");
        if remaining > 0 {
            return Ok(PassOutcome::Pending { remaining });
        }

        self.done = true;
        self.reporter.report(Report::AllCompleted);
        Ok(PassOutcome::Completed)
    }
}

/// Advance one record with a fetched response
fn apply_response(
    record: &mut TransactionRecord,
    response: StatusResponse,
    fallback_chain_id: u64,
    reporter: &mut dyn Reporter,
) -> Result<(), TrackerError> {
    let Some(details) = response.into_details() else {
        reporter.report(Report::InvalidResponse { hash: record.hash.clone() });
        return Ok(());
    };

    let Some(first) = details.into_iter().next() else {
        if !record.printed {
            record.status = TransactionStatus::NoLogs;
            record.printed = true;
            reporter.report(Report::NoLogs { hash: record.hash.clone() });
        }
        return Ok(());
    };

    match first.status.unwrap_or(ExecutionStatus::Unknown) {
        ExecutionStatus::Completed => {
            record.status = TransactionStatus::Completed;
            if !record.printed {
                emit_resolved_payloads(record, &first.write_payloads, reporter);
                report_completion(record, &first.write_payloads, fallback_chain_id, reporter)?;
                record.printed = true;
            }
        }
        ExecutionStatus::InProgress => {
            record.status = TransactionStatus::InProgress;
            emit_resolved_payloads(record, &first.write_payloads, reporter);
        }
        ExecutionStatus::Unknown => {
            tracing::debug!(hash = %record.hash, "Unrecognised execution status");
            reporter.report(Report::InvalidResponse { hash: record.hash.clone() });
        }
    }
    Ok(())
}

/// Print each newly resolved payload of a multi-payload transaction once
fn emit_resolved_payloads(record: &mut TransactionRecord, payloads: &[WritePayload], reporter: &mut dyn Reporter) {
    if payloads.len() <= 1 {
        return;
    }

    for payload in payloads {
        let Some(execute_tx_hash) = payload.execute_tx_hash() else {
            continue;
        };
        let Some(callback_status) = payload.callback_status() else {
            continue;
        };
        if callback_status != PROMISE_RESOLVED {
            continue;
        }

        let key = format!("{}-{}", execute_tx_hash, callback_status);
        if record.printed_payloads.insert(key) {
            reporter.report(Report::PayloadResolved {
                execute_tx_hash: execute_tx_hash.to_string(),
                callback_status: callback_status.to_string(),
                chain: chain_label(payload),
            });
        }
    }
}

/// Report the final line (and deployed addresses) of a completed transaction
fn report_completion(
    record: &TransactionRecord,
    payloads: &[WritePayload],
    fallback_chain_id: u64,
    reporter: &mut dyn Reporter,
) -> Result<(), TrackerError> {
    let first = payloads.first();
    let deployer = first
        .and_then(|p| p.deployer_details.as_ref())
        .filter(|d| !d.is_empty());

    let Some(deployer) = deployer else {
        reporter.report(Report::Completed {
            hash: record.hash.clone(),
            status: record.status,
            chain: fallback_chain_id.to_string(),
        });
        return Ok(());
    };

    reporter.report(Report::Completed {
        hash: record.hash.clone(),
        status: record.status,
        chain: first.map(chain_label).unwrap_or_else(|| fallback_chain_id.to_string()),
    });
    reporter.report(Report::OnChainAddress(display_or_unknown(deployer.on_chain_address.as_deref())));
    reporter.report(Report::ForwarderAddress(display_or_unknown(deployer.forwarder_address.as_deref())));

    if !deployer.forwarder_deployed() {
        tracing::error!(hash = %record.hash, "Forwarder not deployed");
        reporter.report(Report::ForwarderNotDeployed { hash: record.hash.clone() });
        return Err(TrackerError::ForwarderNotDeployed(record.hash.clone()));
    }
    Ok(())
}

fn chain_label(payload: &WritePayload) -> String {
    payload
        .chain_slug
        .as_ref()
        .map(|slug| slug.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn display_or_unknown(value: Option<&str>) -> String {
    value.unwrap_or("unknown").to_string()
}
