//! Waitlist Backend Library
//!
//! Email waitlist with admin-only listing and deletion behind RS256 tokens.
//! Exposes every module so the binary and integration tests share one code path.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod notifier;
pub mod waitlist;

pub use api::{build_router, AppState};
pub use config::Config;
pub use error::WaitlistError;
