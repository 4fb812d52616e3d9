//! Password hashing
//! bcrypt digests carry their own salt and cost, so verification needs only the digest.

use anyhow::{Context, Result};
use tracing::warn;

/// bcrypt work factor used for every new admin credential
pub const BCRYPT_COST: u32 = 8;

/// Hash a plaintext password on the blocking pool. bcrypt accepts a cost of 4..=31.
pub async fn hash_password(plaintext: &str, cost: u32) -> Result<String> {
    let plaintext = plaintext.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
        .await
        .context("Password hashing task failed")?
        .context("Failed to hash password")
}

/// Check a plaintext password against a stored digest.
///
/// A mismatch is `false`. So is a digest bcrypt cannot parse; that case is logged
/// because it points at corrupt data rather than a wrong password.
pub async fn verify_password(plaintext: &str, digest: &str) -> bool {
    let plaintext = plaintext.to_string();
    let digest = digest.to_string();

    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest)).await;

    match outcome {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            warn!("Stored password digest could not be verified: {}", e);
            false
        }
        Err(e) => {
            warn!("Password verification task failed: {}", e);
            false
        }
    }
}
