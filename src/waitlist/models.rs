//! Waitlist Models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single waitlist signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: String,
    pub email: String,
    pub timestamp: i64, // epoch seconds, set once at signup
}

impl WaitlistEntry {
    /// New entry with a generated id
    pub fn new(email: &str, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            timestamp,
        }
    }
}

/// Body of `POST /api/addWaitlist`
#[derive(Debug, Clone, Deserialize)]
pub struct AddWaitlistRequest {
    #[serde(default)]
    pub email: String,
}

/// Result of a signup that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Added(WaitlistEntry),
    AlreadyExists,
}

/// Form used for storage and lookups: surrounding whitespace dropped, case kept as submitted
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}
