//! Broker HTTP server
//!
//! Serves the ingestion endpoint and the read side on one listener.

use crate::handlers::{handle_list_events, handle_update_score, BrokerContext, IngestError};
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use scorewire_dispatch::DeliveryEnvelope;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// HTTP server for one broker
pub struct BrokerServer {
    context: Arc<BrokerContext>,
}

impl BrokerServer {
    /// Create a new broker server
    pub fn new(context: Arc<BrokerContext>) -> Self {
        Self { context }
    }

    /// Create the Axum router
    pub fn router(self) -> Router {
        // CORS layer so the scoreboard frontend can read /data
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

        Router::new()
            .route("/updateScore", post(update_score))
            .route("/data", get(list_events))
            .route("/ping", get(ping))
            .layer(cors)
            .with_state(self.context)
    }

    /// Run the server
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Broker listening on {}", addr);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn ping() -> &'static str {
    "pong"
}

/// Handle a forwarded delivery envelope
async fn update_score(
    State(context): State<Arc<BrokerContext>>,
    Json(envelope): Json<DeliveryEnvelope>,
) -> impl IntoResponse {
    match handle_update_score(&context, envelope) {
        Ok(seq) => (StatusCode::OK, Json(json!({ "Seq": seq }))),
        Err(e) => (error_status(&e), Json(json!({ "Error": e.to_string() }))),
    }
}

/// Return all locally stored events in insertion order
async fn list_events(State(context): State<Arc<BrokerContext>>) -> impl IntoResponse {
    match handle_list_events(&context) {
        Ok(events) => (StatusCode::OK, Json(json!(events))),
        Err(e) => (error_status(&e), Json(json!({ "Error": e.to_string() }))),
    }
}

/// Map an ingestion error to a response status
fn error_status(error: &IngestError) -> StatusCode {
    match error {
        IngestError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IngestError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorewire_dispatch::NodeAddr;
    use scorewire_store::{EventStore, ScoreEvent, StoredEvent};
    use tempfile::tempdir;

    async fn spawn_broker(store: EventStore) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let context = Arc::new(BrokerContext {
            addr: NodeAddr::new(addr.clone()),
            store,
        });
        let app = BrokerServer::new(context).router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    fn envelope(event: ScoreEvent) -> DeliveryEnvelope {
        DeliveryEnvelope::new(NodeAddr::new("127.0.0.1:8080"), event)
    }

    #[tokio::test]
    async fn test_ping() {
        let dir = tempdir().unwrap();
        let addr = spawn_broker(EventStore::open(dir.path()).unwrap()).await;

        let body = reqwest::get(format!("http://{addr}/ping"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn test_update_score_then_data_round_trip() {
        let dir = tempdir().unwrap();
        let addr = spawn_broker(EventStore::open(dir.path()).unwrap()).await;

        let event = ScoreEvent {
            minute: 88,
            player: "Harry Kane".to_string(),
            club: "FCB".to_string(),
            score: "1-3".to_string(),
        };

        let client = reqwest::Client::new();
        let response = client
            .post(format!("http://{addr}/updateScore"))
            .json(&envelope(event.clone()))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let listed: Vec<StoredEvent> = reqwest::get(format!("http://{addr}/data"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].event, event);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_rejected_not_stored() {
        let dir = tempdir().unwrap();
        let store = EventStore::open(dir.path()).unwrap();
        let addr = spawn_broker(store).await;

        let event = ScoreEvent {
            minute: 10,
            player: String::new(),
            club: "FCB".to_string(),
            score: "0-1".to_string(),
        };

        let client = reqwest::Client::new();
        let response = client
            .post(format!("http://{addr}/updateScore"))
            .json(&envelope(event))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 422);

        let listed: Vec<StoredEvent> = reqwest::get(format!("http://{addr}/data"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
