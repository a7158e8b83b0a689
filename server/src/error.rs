//! Transport-level error mapping.
//!
//! Core errors are typed; this module maps each kind to an HTTP status and
//! a JSON body carrying a machine-readable `error` tag, a human-readable
//! `detail`, and (where it helps the client resynchronize) the job's
//! actual current state.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use lingoclip::db::DatabaseError;
use lingoclip::{AccountError, Language, LifecycleError, StorageError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Structural problem with the request itself (missing/malformed
    /// fields), rejected before the core is touched.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "bad_request", "detail": detail }),
            ),

            ApiError::Account(AccountError::DuplicateContact(contact)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "duplicate_contact",
                    "detail": format!("An account with contact '{contact}' already exists"),
                }),
            ),
            ApiError::Account(AccountError::Database(e)) => internal(e),
            ApiError::Account(AccountError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "account_not_found",
                    "detail": format!("Account '{id}' not found"),
                }),
            ),

            ApiError::Lifecycle(LifecycleError::AccountNotFound(id)) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "account_not_found",
                    "detail": format!("Account '{id}' not found"),
                }),
            ),
            ApiError::Lifecycle(LifecycleError::JobNotFound(id)) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "job_not_found",
                    "detail": format!("Job '{id}' not found"),
                }),
            ),
            ApiError::Lifecycle(LifecycleError::InvalidTransition {
                job_id,
                current,
                expected,
            }) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "invalid_transition",
                    "detail": format!("Job '{job_id}' is '{current}', expected '{expected}'"),
                    "currentStatus": current,
                }),
            ),
            ApiError::Lifecycle(LifecycleError::UnsupportedLanguage(code)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "unsupported_language",
                    "detail": format!("Unsupported target language '{code}'"),
                    "supportedLanguages": Language::supported_codes(),
                }),
            ),
            ApiError::Lifecycle(LifecycleError::ProviderSubmissionFailed { job, source }) => (
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": "provider_submission_failed",
                    "detail": source.to_string(),
                    "job": job,
                }),
            ),
            ApiError::Lifecycle(LifecycleError::Database(e)) => internal(e),

            ApiError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "storage", "detail": "Failed to store uploaded file" }),
                )
            }
            ApiError::Database(e) => internal(e),
        };

        (status, Json(body)).into_response()
    }
}

fn internal(e: &dyn std::error::Error) -> (StatusCode, serde_json::Value) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "internal", "detail": "Internal server error" }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingoclip::JobStatus;

    #[test]
    fn test_status_mapping() {
        let resp = ApiError::BadRequest("missing field".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::Lifecycle(LifecycleError::JobNotFound("j1".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::Lifecycle(LifecycleError::InvalidTransition {
            job_id: "j1".into(),
            current: JobStatus::Processing,
            expected: JobStatus::Uploaded,
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::Account(AccountError::DuplicateContact("a@b.c".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
