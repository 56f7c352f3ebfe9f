//! HTTP request handlers.
//!
//! Handlers translate between JSON bodies and the token and connection
//! services. Every failure leaves as an [`ApiError`] envelope; nothing
//! escapes as an unhandled fault.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use bdollar_common::{
    ConnectResponse, CreateTokenResponse, ListTokensResponse, RevokeTokenResponse, StatusResponse,
};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::AppState;
use crate::error::ApiError;
use crate::store::StoreError;

/// Whether the request carries a non-empty `Authorization` header.
///
/// The value is never inspected beyond that.
fn has_credential(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .is_some_and(|value| !value.is_empty())
}

/// Parses a JSON body, mapping malformed input to a 500 with `failure`.
fn parse_body(body: &Bytes, failure: &str) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Malformed request body");
        ApiError::Unexpected(failure.to_string())
    })
}

/// Extracts a non-empty string field.
fn required_string<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// GET /connect
#[instrument(skip_all)]
pub async fn connect(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ConnectResponse>, ApiError> {
    let response = state.connection.connect(has_credential(&headers)).await?;
    Ok(Json(response))
}

/// GET /status
pub async fn status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<StatusResponse> {
    Json(state.connection.status(has_credential(&headers)))
}

/// GET /tokens
#[instrument(skip_all)]
pub async fn list_tokens(State(state): State<Arc<AppState>>) -> Json<ListTokensResponse> {
    Json(ListTokensResponse {
        success: true,
        tokens: state.tokens.list(),
        source: None,
    })
}

/// POST /tokens
#[instrument(skip_all)]
pub async fn create_token(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CreateTokenResponse>, ApiError> {
    let body = parse_body(&body, "Failed to create token")?;
    let name = required_string(&body, "name")
        .ok_or_else(|| ApiError::Validation("Token name is required".to_string()))?;

    let token = state.tokens.create(name).map_err(|e| {
        warn!(error = %e, "Could not issue token");
        ApiError::Unexpected("Failed to create token".to_string())
    })?;

    Ok(Json(CreateTokenResponse {
        success: true,
        message: "Binary Dollar API token created successfully".to_string(),
        token,
        source: None,
    }))
}

/// POST /tokens/revoke
#[instrument(skip_all)]
pub async fn revoke_token(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RevokeTokenResponse>, ApiError> {
    let body = parse_body(&body, "Failed to revoke token")?;
    let secret = required_string(&body, "token")
        .ok_or_else(|| ApiError::Validation("Token is required".to_string()))?;

    state.tokens.revoke(secret).map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound("Token not found".to_string()),
        StoreError::Duplicate(_) => ApiError::Unexpected("Failed to revoke token".to_string()),
    })?;

    Ok(Json(RevokeTokenResponse {
        success: true,
        message: "Token revoked successfully".to_string(),
    }))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
