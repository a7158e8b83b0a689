//! Account routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/accounts`: register a new account.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let contact = body
        .get("contact")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("'contact' is required".to_string()))?;

    let account = state.accounts.create_account(contact)?;
    Ok((StatusCode::CREATED, Json(json!({ "account": account }))))
}

/// `GET /api/accounts`: list all accounts.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let accounts = state.accounts.list_accounts()?;
    let count = accounts.len();
    Ok(Json(json!({
        "accounts": accounts,
        "count": count,
    })))
}
