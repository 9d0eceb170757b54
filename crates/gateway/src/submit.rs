//! Submission path: validate, build the failover order, dispatch

use crate::GatewayConfig;
use scorewire_dispatch::{
    CandidateSet, DeliveryEnvelope, DeliveryReceipt, DispatchError, DispatchStats, Dispatcher,
    NodeAddr,
};
use scorewire_store::{ScoreEvent, ValidationError};
use serde::Deserialize;
use std::time::Duration;

/// An inbound submission: the score event plus an optional addressing hint
/// naming the broker to try first
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    /// Preferred target, attempted before the rest of the pool
    #[serde(rename = "ReceiverIp", default)]
    pub receiver: Option<NodeAddr>,
    /// The score event to distribute
    #[serde(rename = "Event")]
    pub event: ScoreEvent,
}

/// A submission the gateway could not get accepted anywhere
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Rejected before any network attempt
    #[error("invalid score event: {0}")]
    Validation(#[from] ValidationError),
    /// Every broker in the candidate set failed
    #[error("delivery failed: {0}")]
    Exhausted(#[from] DispatchError),
}

/// Accepts score events and hands each to the dispatcher exactly once
pub struct Gateway {
    config: GatewayConfig,
    dispatcher: Dispatcher,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        let dispatcher = Dispatcher::new(Duration::from_millis(config.forward_timeout_ms));
        Self { config, dispatcher }
    }

    /// Deliver one submitted event to exactly one broker.
    ///
    /// The event is validated up front; an invalid one never produces a
    /// network attempt. The candidate order is the addressing hint (when
    /// present) followed by the configured pool. Exhaustion is surfaced as
    /// a single aggregate failure; any resubmission is the caller's call
    /// and is not deduplicated against this one.
    pub async fn submit(&self, request: SubmitRequest) -> Result<DeliveryReceipt, SubmitError> {
        request.event.validate()?;

        let candidates = CandidateSet::new(request.receiver, &self.config.brokers);
        let envelope = DeliveryEnvelope::new(self.config.advertise_addr.clone(), request.event);

        tracing::debug!(candidates = candidates.len(), "dispatching submission");
        Ok(self.dispatcher.dispatch(envelope, candidates).await?)
    }

    /// Snapshot of the dispatcher's running counters
    pub fn stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }
}
