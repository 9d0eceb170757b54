//! Persistence layer for accepted score events
//!
//! Uses sled embedded database so a broker's events survive restarts.
//! The store is append-only: no update or delete operations exist.

use crate::event::{ScoreEvent, StoredEvent};
use sled::Db;
use std::path::Path;

/// A failed write or read against the local store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),
    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Append-only event store, one per broker
pub struct EventStore {
    /// Sled database instance
    db: Db,
    /// Events tree, keyed by big-endian insertion sequence
    events: sled::Tree,
}

impl EventStore {
    /// Open or create an event store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(&path)?;
        let events = db.open_tree("events")?;

        tracing::info!("Opened event store at {:?}", path.as_ref());

        Ok(Self { db, events })
    }

    /// Append an event, returning the sequence number assigned to it
    pub fn append(&self, event: &ScoreEvent) -> Result<u64, StoreError> {
        let seq = self.db.generate_id()?;
        let bytes = bincode::serialize(event)?;
        self.events.insert(seq.to_be_bytes(), bytes)?;
        Ok(seq)
    }

    /// Get all stored events in insertion order
    pub fn list_all(&self) -> Result<Vec<StoredEvent>, StoreError> {
        let mut events = Vec::new();

        for entry in self.events.iter() {
            let (key, value) = entry?;
            let arr: [u8; 8] = key.as_ref().try_into().unwrap_or([0u8; 8]);
            let seq = u64::from_be_bytes(arr);
            let event: ScoreEvent = bincode::deserialize(&value)?;
            events.push(StoredEvent { seq, event });
        }

        Ok(events)
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    /// Clear all data (for testing)
    pub fn clear(&self) -> Result<(), StoreError> {
        self.events.clear()?;
        Ok(())
    }
}
