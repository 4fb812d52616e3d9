//! Cross-cutting HTTP middleware.
//!
//! This module provides:
//! - Request logging with latency tracking
//! - Permissive CORS with preflight short-circuit

pub mod cors;
pub mod logging;

pub use cors::cors;
pub use logging::request_logging;
