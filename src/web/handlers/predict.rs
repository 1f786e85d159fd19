// POST /predict — classify one text as spam or not spam.
//
// Body validation (valid JSON, `text` present and a string) happens in the
// extractor; anything that gets past it is a valid request and always
// produces one of the two labels.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };

    // Vectorizing and scoring are CPU-bound; keep them off the async workers.
    let service = state.service.clone();
    match tokio::task::spawn_blocking(move || service.predict(&request.text)).await {
        Ok(prediction) => Json(prediction).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Prediction task failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed")
        }
    }
}
