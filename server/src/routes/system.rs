//! Service introspection routes.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use lingoclip::Language;

use crate::state::AppState;

/// `GET /`: welcome message and endpoint listing.
pub async fn home(State(state): State<AppState>) -> Json<Value> {
    let provider = state.manager.provider();
    Json(json!({
        "service": "lingoclip",
        "message": "Media translation API",
        "providerConfigured": provider.is_configured(),
        "endpoints": [
            "GET  /                      - This welcome message",
            "GET  /api/status            - Capability advertisement",
            "GET  /api/accounts          - List accounts",
            "POST /api/accounts          - Create account",
            "POST /api/uploads           - Upload a media file",
            "POST /api/translations      - Request translation of a job",
            "GET  /api/jobs              - List jobs",
            "GET  /api/jobs/:id          - Poll job status",
            "POST /api/jobs/:id/outcome  - Report provider outcome",
        ],
    }))
}

/// `GET /api/status`: capability advertisement with supported languages and
/// provider configuration.
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let provider = state.manager.provider();
    Json(json!({
        "status": "ok",
        "provider": provider.name(),
        "providerConfigured": provider.is_configured(),
        "supportedLanguages": Language::supported_codes(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
