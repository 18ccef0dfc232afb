//! Axum HTTP boundary for the search engine

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::core::error::{Error, Result};
use crate::engine::QueryEngine;

#[derive(Clone)]
struct AppState {
    engine: Arc<QueryEngine>,
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(default)]
    prompt: Option<String>,
}

/// Run the HTTP server until interrupted.
pub async fn run(engine: QueryEngine, port: u16) -> Result<()> {
    let state = AppState {
        engine: Arc::new(engine),
    };

    let app = Router::new()
        .route("/api/search", post(api_search))
        .route("/api/health", get(api_health))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    eprintln!(
        "\x1b[36m>\x1b[0m studybase API running at \x1b[36mhttp://{}\x1b[0m",
        addr
    );
    eprintln!("\x1b[90m  Press Ctrl+C to stop\x1b[0m");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn api_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    let prompt = request.prompt.unwrap_or_default();

    match state.engine.query(&prompt).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(e),
    }
}

async fn api_health(State(state): State<AppState>) -> Response {
    match state.engine.health_check().await {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "message": e.to_string() })),
        )
            .into_response(),
    }
}

fn error_response(error: Error) -> Response {
    let (status, message) = match &error {
        Error::InvalidPrompt => (StatusCode::BAD_REQUEST, "Valid prompt is required"),
        Error::StoreUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "Failed to connect to database")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    };

    info!(%status, "Request failed: {}", error);

    (
        status,
        Json(json!({ "error": message, "details": error.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let response = error_response(Error::InvalidPrompt);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_response(Error::StoreUnavailable {
            message: "down".to_string(),
        });
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = error_response(Error::StoreError {
            message: "oops".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
