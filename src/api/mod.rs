//! HTTP surface: shared state, body decoding and the router

pub mod routes;

use crate::{auth::JwtHandler, error::WaitlistError, waitlist::WaitlistService};
use axum::{extract::rejection::JsonRejection, Json};
use std::sync::Arc;
use tracing::debug;

pub use routes::build_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WaitlistService>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AppState {
    pub fn new(service: Arc<WaitlistService>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            service,
            jwt_handler,
        }
    }
}

/// Unwrap a JSON body, turning axum's rejection into a 400 with our error shape
pub fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    message: &str,
) -> Result<T, WaitlistError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Err(WaitlistError::Validation(message.to_string()))
        }
    }
}
