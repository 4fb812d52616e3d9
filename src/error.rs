//! Service errors and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the waitlist service.
///
/// `Storage`, `Notifier` and `Token` carry internal detail for logs; the HTTP body only
/// ever shows the generic text from [`WaitlistError::public_message`].
#[derive(Debug, Error)]
pub enum WaitlistError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Unknown admin email or wrong password
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No matching record
    #[error("{0}")]
    NotFound(String),

    /// Record with the same key already exists
    #[error("{0}")]
    Conflict(String),

    /// Backing store failed or timed out
    #[error("storage error: {0}")]
    Storage(String),

    /// Notification could not be delivered (the record is already persisted)
    #[error("notifier error: {0}")]
    Notifier(String),

    /// Token could not be signed
    #[error("token error: {0}")]
    Token(String),

    /// Password could not be hashed
    #[error("password hashing error: {0}")]
    Password(String),
}

impl WaitlistError {
    pub fn status(&self) -> StatusCode {
        match self {
            WaitlistError::Validation(_) | WaitlistError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            WaitlistError::NotFound(_) => StatusCode::NOT_FOUND,
            WaitlistError::Conflict(_) => StatusCode::CONFLICT,
            WaitlistError::Storage(_)
            | WaitlistError::Notifier(_)
            | WaitlistError::Token(_)
            | WaitlistError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            WaitlistError::Validation(_) => "validation",
            WaitlistError::InvalidCredentials => "invalid_credentials",
            WaitlistError::NotFound(_) => "not_found",
            WaitlistError::Conflict(_) => "conflict",
            WaitlistError::Storage(_) => "storage",
            WaitlistError::Notifier(_) => "notifier",
            WaitlistError::Token(_) => "token",
            WaitlistError::Password(_) => "password",
        }
    }

    /// Human-readable text safe to return to clients
    pub fn public_message(&self) -> String {
        match self {
            WaitlistError::Storage(_) => "Database error".to_string(),
            WaitlistError::Notifier(_) => "Unable to send email".to_string(),
            WaitlistError::Token(_) => "Unable to generate token".to_string(),
            WaitlistError::Password(_) => "Failed to hash password".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for WaitlistError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({ "error": self.kind(), "message": self.public_message() })),
        )
            .into_response()
    }
}
