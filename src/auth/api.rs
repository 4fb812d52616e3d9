//! Authentication API Endpoints
//! Mission: Admin sign-in and admin creation

use crate::{
    api::{json_body, AppState},
    auth::models::CredentialsRequest,
    error::WaitlistError,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::info;

/// Signin endpoint - POST /api/signin
///
/// The token travels back in the `Authorization` response header, not the body.
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response, WaitlistError> {
    let payload = json_body(payload, "unable to decode Json")?;
    info!("🔐 Signin attempt: {}", payload.email);

    let token = state
        .service
        .signin(&payload.email, &payload.password)
        .await?;

    let header = HeaderValue::from_str(&token)
        .map_err(|e| WaitlistError::Token(format!("token is not a valid header value: {}", e)))?;

    Ok((
        StatusCode::ACCEPTED,
        [(AUTHORIZATION, header)],
        Json(json!({ "message": "login successful" })),
    )
        .into_response())
}

/// Create admin endpoint - POST /api/create
pub async fn create_admin(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response, WaitlistError> {
    let payload = json_body(payload, "unable to decode Json payload")?;

    state
        .service
        .create_admin(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": "successfully created admin" })),
    )
        .into_response())
}
