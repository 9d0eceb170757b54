//! scorewire broker node
//!
//! Runs the per-node ingestion endpoint (`POST /updateScore`) and the read
//! side (`GET /data`). Each broker owns its own event store; brokers never
//! share or replicate state with each other.

pub mod handlers;
pub mod http_server;

pub use handlers::{BrokerContext, IngestError};
pub use http_server::BrokerServer;

use scorewire_dispatch::NodeAddr;
use std::path::PathBuf;

/// Broker configuration
#[derive(Clone, Debug)]
pub struct BrokerConfig {
    /// Address other nodes use to reach this broker
    pub advertise_addr: NodeAddr,
    /// Directory for the local event store
    pub data_dir: PathBuf,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            advertise_addr: NodeAddr::new("127.0.0.1:9090"),
            data_dir: PathBuf::from("./data"),
        }
    }
}
