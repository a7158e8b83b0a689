//! Job routes: upload registration, translate requests, provider outcomes,
//! and polling.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use lingoclip::{JobListPage, JobQueryParams, ProviderOutcome};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/uploads`: multipart upload with an `account_id` field and a
/// `file` part. Stores the bytes, then registers the job as `uploaded`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut account_id: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("account_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable account_id: {e}")))?;
                account_id = Some(value);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| ApiError::BadRequest("No file selected".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable file part: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let account_id =
        account_id.ok_or_else(|| ApiError::BadRequest("'account_id' is required".to_string()))?;
    let (filename, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    // Validate ownership before touching storage so a bad account id does
    // not leave an orphaned file behind.
    state.accounts.get_account(&account_id)?;

    let handle = state.storage.store(&bytes, &filename)?;
    let job = state
        .manager
        .register_upload(&account_id, &handle.to_string_lossy(), &filename)?;

    tracing::info!("Upload '{}' registered as job {}", filename, job.id);
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

/// `POST /api/translations`: request translation of an uploaded job.
pub async fn request_translation(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let job_id = body
        .get("job_id")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest("'job_id' is required".to_string()))?;
    let target_language = body
        .get("target_language")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest("'target_language' is required".to_string()))?;

    let job = state
        .manager
        .request_translation(job_id, target_language)
        .await?;
    Ok(Json(json!({ "job": job })))
}

/// `POST /api/jobs/:id/outcome`: the provider-callback entry point.
pub async fn apply_outcome(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let outcome: ProviderOutcome = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed outcome: {e}")))?;

    let job = state.manager.apply_provider_outcome(&id, outcome)?;
    Ok(Json(json!({ "job": job })))
}

/// `GET /api/jobs/:id`: poll a single job.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let job = state.manager.get_job(&id)?;
    Ok(Json(json!({ "job": job })))
}

/// `GET /api/jobs`: list jobs with optional filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<JobQueryParams>,
) -> Result<Json<JobListPage>, ApiError> {
    let page = state.manager.list_jobs(&params)?;
    Ok(Json(page))
}
