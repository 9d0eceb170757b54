//! Gateway HTTP server

use crate::submit::{Gateway, SubmitError, SubmitRequest};
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// HTTP server for the submission gateway
pub struct GatewayServer {
    gateway: Arc<Gateway>,
}

impl GatewayServer {
    /// Create a new gateway server
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Create the Axum router
    pub fn router(self) -> Router {
        // CORS layer to allow browser clients
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

        Router::new()
            .route("/addScore", post(add_score))
            .route("/ping", get(ping))
            .layer(cors)
            .with_state(self.gateway)
    }

    /// Run the server
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Gateway listening on {}", addr);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn ping() -> &'static str {
    "pong"
}

/// Handle a score submission
async fn add_score(
    State(gateway): State<Arc<Gateway>>,
    Json(request): Json<SubmitRequest>,
) -> impl IntoResponse {
    match gateway.submit(request).await {
        Ok(receipt) => (StatusCode::OK, Json(json!(receipt))),
        Err(e) => (error_status(&e), Json(json!({ "Error": e.to_string() }))),
    }
}

/// Map a submission error to a response status
fn error_status(error: &SubmitError) -> StatusCode {
    match error {
        SubmitError::Validation(_) => StatusCode::BAD_REQUEST,
        SubmitError::Exhausted(_) => StatusCode::BAD_GATEWAY,
    }
}
