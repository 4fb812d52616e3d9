//! Access log for the HTTP surface

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// One structured line per request: method, path, status and elapsed milliseconds.
///
/// 5xx responses go out at `warn`, everything else at `info`. `/health` is not logged.
/// Request headers are never recorded, so the `Authorization` token stays out of the log.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if path == "/health" {
        return next.run(request).await;
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), latency_ms, "request failed");
    } else {
        info!(%method, %path, status = status.as_u16(), latency_ms, "request served");
    }

    response
}
