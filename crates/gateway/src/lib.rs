//! scorewire submission gateway
//!
//! Receives score events over HTTP and delivers each to exactly one broker,
//! failing over across a static pool in order. The gateway validates before
//! any network attempt and reports a single binary outcome to the caller:
//! accepted, or nobody took it.

pub mod http_server;
pub mod submit;

#[cfg(test)]
mod tests;

pub use http_server::GatewayServer;
pub use submit::{Gateway, SubmitError, SubmitRequest};

use scorewire_dispatch::{NodeAddr, DEFAULT_FORWARD_TIMEOUT_MS};

/// Gateway configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Address this gateway reports as the envelope sender
    pub advertise_addr: NodeAddr,
    /// Static broker pool, in failover order
    pub brokers: Vec<NodeAddr>,
    /// Per-attempt forward timeout in milliseconds
    pub forward_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            advertise_addr: NodeAddr::new("127.0.0.1:8080"),
            brokers: vec![
                NodeAddr::new("127.0.0.1:9090"),
                NodeAddr::new("127.0.0.1:9091"),
                NodeAddr::new("127.0.0.1:9092"),
            ],
            forward_timeout_ms: DEFAULT_FORWARD_TIMEOUT_MS,
        }
    }
}

/// Builder for Gateway
pub struct GatewayBuilder {
    config: GatewayConfig,
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::default(),
        }
    }

    pub fn advertise_addr(mut self, addr: NodeAddr) -> Self {
        self.config.advertise_addr = addr;
        self
    }

    pub fn brokers(mut self, brokers: Vec<NodeAddr>) -> Self {
        self.config.brokers = brokers;
        self
    }

    pub fn forward_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.forward_timeout_ms = timeout_ms;
        self
    }

    pub fn build(self) -> Gateway {
        Gateway::new(self.config)
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
