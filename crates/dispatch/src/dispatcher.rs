//! Failover dispatcher
//!
//! Delivers one envelope to the first candidate node that accepts it,
//! walking the candidate queue in order. Attempts are strictly sequential,
//! one outstanding request at a time; concurrent fan-out could leave the
//! same event recorded at two nodes.

use crate::candidates::CandidateSet;
use crate::envelope::{DeliveryEnvelope, NodeAddr};
use parking_lot::RwLock;
use serde::Serialize;
use std::time::Duration;

/// Per-attempt timeout applied when the caller does not configure one
pub const DEFAULT_FORWARD_TIMEOUT_MS: u64 = 3_000;

/// Terminal failure of a whole dispatch
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Every candidate failed; no node recorded the event
    #[error("all {attempts} delivery attempts failed")]
    Exhausted { attempts: u32 },
}

/// One candidate turning an attempt down. Absorbed into failover, never
/// surfaced past the dispatcher.
#[derive(Debug, thiserror::Error)]
enum AttemptFailure {
    #[error("target unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("target rejected the envelope (HTTP {0})")]
    Rejected(reqwest::StatusCode),
}

/// Acceptance by exactly one node
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeliveryReceipt {
    /// Node that accepted the envelope
    #[serde(rename = "ReceiverIp")]
    pub accepted_by: NodeAddr,
    /// Attempts the dispatch took, counting the accepted one
    pub attempts: u32,
}

/// Running counters across dispatches
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchStats {
    pub delivered: u64,
    pub exhausted: u64,
    pub attempts_total: u64,
}

/// Walks an envelope down a candidate queue until one node accepts it
pub struct Dispatcher {
    client: reqwest::Client,
    forward_timeout: Duration,
    stats: RwLock<DispatchStats>,
}

impl Dispatcher {
    /// Create a dispatcher with the given per-attempt timeout
    pub fn new(forward_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            forward_timeout,
            stats: RwLock::new(DispatchStats::default()),
        }
    }

    /// Deliver the envelope to the first accepting candidate.
    ///
    /// The first 2xx response ends the dispatch; an accepted response is
    /// trusted as a committed remote write, so no further candidates are
    /// tried. A transport error, timeout, or error status drops the failed
    /// candidate and moves on to the next one. An exhausted queue is the
    /// only failure surfaced to the caller, with no per-candidate detail.
    ///
    /// Re-dispatching an envelope that was already delivered is not
    /// deduplicated; each call is an independent dispatch.
    pub async fn dispatch(
        &self,
        mut envelope: DeliveryEnvelope,
        mut candidates: CandidateSet,
    ) -> Result<DeliveryReceipt, DispatchError> {
        while let Some(target) = candidates.take_next() {
            envelope.aim_at(&target);
            self.stats.write().attempts_total += 1;

            match self.forward(&envelope, &target).await {
                Ok(()) => {
                    self.stats.write().delivered += 1;
                    tracing::info!(
                        node = %target,
                        attempts = envelope.attempts,
                        "envelope accepted"
                    );
                    return Ok(DeliveryReceipt {
                        accepted_by: target,
                        attempts: envelope.attempts,
                    });
                }
                Err(failure) => {
                    tracing::warn!(
                        node = %target,
                        remaining = candidates.len(),
                        %failure,
                        "delivery attempt failed, dropping candidate"
                    );
                }
            }
        }

        self.stats.write().exhausted += 1;
        Err(DispatchError::Exhausted {
            attempts: envelope.attempts,
        })
    }

    /// One delivery attempt against one candidate
    async fn forward(
        &self,
        envelope: &DeliveryEnvelope,
        target: &NodeAddr,
    ) -> Result<(), AttemptFailure> {
        let response = self
            .client
            .post(target.forward_url())
            .timeout(self.forward_timeout)
            .json(envelope)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AttemptFailure::Rejected(response.status()));
        }

        Ok(())
    }

    /// Snapshot of the running counters
    pub fn stats(&self) -> DispatchStats {
        self.stats.read().clone()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_FORWARD_TIMEOUT_MS))
    }
}
