// GET / — static welcome payload pointing at the docs and the predict endpoint.

use axum::response::IntoResponse;
use axum::Json;

pub async fn welcome() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Spam Email Detection API",
        "docs": "/docs",
        "predict_endpoint": "/predict",
    }))
}
