//! Delivery envelope for node-to-node transfer

use chrono::{DateTime, Utc};
use scorewire_store::ScoreEvent;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Address of a node in the pool, as `host:port`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeAddr(String);

impl NodeAddr {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL of the ingestion endpoint at this address
    pub fn forward_url(&self) -> String {
        format!("http://{}/updateScore", self.0)
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeAddr {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

/// Wraps a score event while it travels from the gateway to a broker.
///
/// Created once per submission. The dispatcher re-aims the envelope at each
/// candidate in turn: `receiver` and `attempts` change per attempt, the
/// rest is fixed at creation. `timestamp` in particular is stamped at first
/// gateway receipt and never touched by retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeliveryEnvelope {
    /// Originating gateway
    #[serde(rename = "SenderIp")]
    pub sender: NodeAddr,
    /// Node currently being attempted
    #[serde(rename = "ReceiverIp")]
    pub receiver: NodeAddr,
    /// Time of first gateway receipt
    pub timestamp: DateTime<Utc>,
    /// Delivery attempts so far, counting the in-flight one
    pub attempts: u32,
    /// The score event being delivered
    pub event: ScoreEvent,
}

impl DeliveryEnvelope {
    /// Stamp a fresh envelope. The receiver starts out as the sender and
    /// is re-aimed before the first attempt goes out.
    pub fn new(sender: NodeAddr, event: ScoreEvent) -> Self {
        Self {
            receiver: sender.clone(),
            sender,
            timestamp: Utc::now(),
            attempts: 0,
            event,
        }
    }

    /// Point the envelope at the next delivery target
    pub(crate) fn aim_at(&mut self, target: &NodeAddr) {
        self.receiver = target.clone();
        self.attempts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ScoreEvent {
        ScoreEvent {
            minute: 49,
            player: "Serge Gnabry".to_string(),
            club: "FCB".to_string(),
            score: "0-2".to_string(),
        }
    }

    #[test]
    fn test_re_aiming_keeps_timestamp_and_sender() {
        let mut envelope = DeliveryEnvelope::new(NodeAddr::new("127.0.0.1:8080"), event());
        let stamped = envelope.timestamp;

        envelope.aim_at(&NodeAddr::new("127.0.0.1:9090"));
        envelope.aim_at(&NodeAddr::new("127.0.0.1:9091"));

        assert_eq!(envelope.sender.as_str(), "127.0.0.1:8080");
        assert_eq!(envelope.receiver.as_str(), "127.0.0.1:9091");
        assert_eq!(envelope.timestamp, stamped);
        assert_eq!(envelope.attempts, 2);
    }

    #[test]
    fn test_wire_shape() {
        let mut envelope = DeliveryEnvelope::new(NodeAddr::new("127.0.0.1:8080"), event());
        envelope.aim_at(&NodeAddr::new("127.0.0.1:9090"));

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["SenderIp"], "127.0.0.1:8080");
        assert_eq!(json["ReceiverIp"], "127.0.0.1:9090");
        assert_eq!(json["Attempts"], 1);
        assert_eq!(json["Event"]["Player"], "Serge Gnabry");
        assert!(json["Timestamp"].is_string());
    }

    #[test]
    fn test_forward_url() {
        let addr = NodeAddr::new("127.0.0.1:9092");
        assert_eq!(addr.forward_url(), "http://127.0.0.1:9092/updateScore");
    }
}
