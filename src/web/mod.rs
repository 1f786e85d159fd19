// Web server — Axum-based prediction API.
//
// The loaded InferenceService is the only shared state. It's built once
// before the listener binds, so a server that accepts traffic always has a
// working model behind it.

use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::inference::InferenceService;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InferenceService>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(service: InferenceService, bind: &str, port: u16) -> Result<()> {
    let state = AppState {
        service: Arc::new(service),
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("spamcheck API listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// All routes, with permissive CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root::welcome))
        .route("/health", get(health))
        .route("/predict", post(handlers::predict::predict))
        .route("/docs", get(handlers::docs::docs_page))
        .route("/openapi.json", get(handlers::docs::openapi_spec))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check — always returns 200 OK once the server is up.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
