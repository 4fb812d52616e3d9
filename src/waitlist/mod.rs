//! Waitlist Module
//! Mission: Deduplicated signups, listing and admin-only deletion

pub mod api;
pub mod models;
pub mod service;
pub mod store;

pub use models::{SignupOutcome, WaitlistEntry};
pub use service::WaitlistService;
pub use store::{InsertOutcome, WaitlistStore};
