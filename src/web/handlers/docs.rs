// GET /docs and GET /openapi.json — API documentation.
//
// The OpenAPI document is written by hand; /docs renders it with Swagger UI
// loaded from a CDN, and lists the endpoints inline for when the CDN is
// unreachable.

use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;

const DOCS_PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Spam Email Detection API - Docs</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <noscript>
    <h1>Spam Email Detection API</h1>
    <ul>
      <li><code>GET /</code> welcome message</li>
      <li><code>POST /predict</code> with <code>{"text": "..."}</code> returns <code>{"prediction": "spam" | "not spam"}</code></li>
      <li><code>GET /openapi.json</code> OpenAPI description</li>
    </ul>
  </noscript>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

pub async fn docs_page() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-cache")], Html(DOCS_PAGE))
}

pub async fn openapi_spec() -> impl IntoResponse {
    Json(openapi_document())
}

/// OpenAPI 3 description of the public endpoints.
pub fn openapi_document() -> serde_json::Value {
    serde_json::json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Spam Email Detection API",
            "description": "API to classify email text as spam or not spam",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Welcome",
                    "responses": { "200": { "description": "Links to the docs and the predict endpoint" } }
                }
            },
            "/predict": {
                "post": {
                    "summary": "Classify text",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/EmailText" } } }
                    },
                    "responses": {
                        "200": {
                            "description": "Classification result",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Prediction" } } }
                        },
                        "400": { "description": "Malformed JSON" },
                        "415": { "description": "Missing JSON content type" },
                        "422": { "description": "Missing or invalid `text` field" }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "EmailText": {
                    "type": "object",
                    "required": ["text"],
                    "properties": { "text": { "type": "string" } }
                },
                "Prediction": {
                    "type": "object",
                    "required": ["prediction"],
                    "properties": { "prediction": { "type": "string", "enum": ["spam", "not spam"] } }
                }
            }
        }
    })
}
