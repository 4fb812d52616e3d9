//! Authentication Middleware
//! Mission: Protect admin endpoints with JWT validation

use crate::auth::jwt::JwtHandler;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Auth middleware that validates the token carried in `Authorization`
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(req.headers()).ok_or(AuthError::MissingToken)?;

    let claims = jwt_handler
        .validate_token(token)
        .map_err(|_| AuthError::InvalidToken)?;

    // Handlers read the verified identity as `Extension<Claims>`
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Token from the `Authorization` header.
///
/// Clients send the raw token. A `Bearer ` prefix is tolerated and stripped.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then_some(token)
}

/// Auth error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "no auth token provided",
            AuthError::InvalidToken => "could not validate auth token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized", "message": message })),
        )
            .into_response()
    }
}
