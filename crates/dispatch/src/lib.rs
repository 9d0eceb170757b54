//! Failover delivery core for scorewire
//!
//! One gateway submission becomes one dispatch: a delivery envelope walked
//! down an ordered queue of candidate nodes until one accepts it or the
//! queue runs dry. Attempts are strictly sequential, so at most one node
//! ever records the event.

pub mod candidates;
pub mod dispatcher;
pub mod envelope;

pub use candidates::CandidateSet;
pub use dispatcher::{
    DeliveryReceipt, DispatchError, DispatchStats, Dispatcher, DEFAULT_FORWARD_TIMEOUT_MS,
};
pub use envelope::{DeliveryEnvelope, NodeAddr};
