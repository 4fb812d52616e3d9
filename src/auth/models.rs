//! Authentication Models
//! Mission: Define admin credential and token data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrator account as persisted in the `admins` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredential {
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt digest - never serialize
}

/// JWT Claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64, // expiration timestamp (epoch seconds)
}

/// Body of `POST /api/signin` and `POST /api/create`
#[derive(Clone, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
