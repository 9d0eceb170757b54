//! Ingestion and read-side handlers

use crate::BrokerConfig;
use scorewire_dispatch::{DeliveryEnvelope, NodeAddr};
use scorewire_store::{EventStore, StoreError, StoredEvent, ValidationError};

/// State shared across broker handlers
pub struct BrokerContext {
    /// This broker's address, as the pool knows it
    pub addr: NodeAddr,
    /// The broker's own event store
    pub store: EventStore,
}

impl BrokerContext {
    /// Open the local store and assemble the handler state
    pub fn open(config: &BrokerConfig) -> Result<Self, StoreError> {
        let store = EventStore::open(&config.data_dir)?;
        Ok(Self {
            addr: config.advertise_addr.clone(),
            store,
        })
    }
}

/// A refused ingestion. Either way the sender is expected to try another
/// broker; the response status keeps the two cases distinguishable from a
/// transport failure.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Payload does not round-trip into a well-formed score event
    #[error("invalid score event: {0}")]
    Invalid(#[from] ValidationError),
    /// Local store refused the write
    #[error("store write failed: {0}")]
    Store(#[from] StoreError),
}

/// Accept a forwarded envelope and record its event locally
pub fn handle_update_score(
    context: &BrokerContext,
    envelope: DeliveryEnvelope,
) -> Result<u64, IngestError> {
    envelope.event.validate()?;

    let seq = context.store.append(&envelope.event)?;
    tracing::info!(
        seq,
        node = %context.addr,
        sender = %envelope.sender,
        attempts = envelope.attempts,
        minute = envelope.event.minute,
        player = %envelope.event.player,
        "score event recorded"
    );

    Ok(seq)
}

/// All locally stored events in insertion order
pub fn handle_list_events(context: &BrokerContext) -> Result<Vec<StoredEvent>, IngestError> {
    Ok(context.store.list_all()?)
}
