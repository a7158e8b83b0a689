//! HTTP route composition.
//!
//! A thin façade over the core operations: handlers parse the request,
//! invoke the account store or lifecycle manager, and serialize the result.
//! No business logic lives here.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod accounts;
pub mod jobs;
pub mod system;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(system::home))
        .route("/api/status", get(system::status))
        .route("/api/accounts", get(accounts::list).post(accounts::create))
        .route("/api/uploads", post(jobs::upload))
        .route("/api/translations", post(jobs::request_translation))
        .route("/api/jobs", get(jobs::list))
        .route("/api/jobs/:id", get(jobs::get))
        .route("/api/jobs/:id/outcome", post(jobs::apply_outcome))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
