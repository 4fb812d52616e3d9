//! Waitlist API Endpoints

use crate::{
    api::{json_body, AppState},
    auth::models::Claims,
    error::WaitlistError,
    waitlist::models::{AddWaitlistRequest, SignupOutcome, WaitlistEntry},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use tracing::info;

/// POST /api/addWaitlist
pub async fn add_to_waitlist(
    State(state): State<AppState>,
    payload: Result<Json<AddWaitlistRequest>, JsonRejection>,
) -> Result<Response, WaitlistError> {
    let payload = json_body(payload, "Unable to bind waitlist")?;

    match state.service.signup(&payload.email).await? {
        SignupOutcome::Added(_) => Ok((
            StatusCode::OK,
            Json(json!({ "message": "User added to waitlist" })),
        )
            .into_response()),
        SignupOutcome::AlreadyExists => Ok((
            StatusCode::ALREADY_REPORTED,
            Json(json!({ "message": "Email already added to waitlist" })),
        )
            .into_response()),
    }
}

/// GET /api/getWaitlist (protected)
pub async fn get_waitlist(
    State(state): State<AppState>,
) -> Result<Json<Vec<WaitlistEntry>>, WaitlistError> {
    let entries = state.service.list().await?;
    Ok(Json(entries))
}

/// DELETE /api/deleteWaitlist/:email (protected)
pub async fn delete_from_waitlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, WaitlistError> {
    info!(admin = %claims.email, "Deleting {} from waitlist", email);
    state.service.delete(&email).await?;
    Ok(Json(json!({ "message": "Email deleted from waitlist" })))
}

/// DELETE /api/deleteWaitlist (protected, no email segment)
pub async fn delete_missing_email() -> WaitlistError {
    WaitlistError::Validation("Email parameter is missing".to_string())
}
