//! Waitlist Service
//! Mission: Signup, listing, deletion and admin sign-in on top of the store

use crate::{
    auth::{
        jwt::JwtHandler,
        models::AdminCredential,
        password::{hash_password, verify_password, BCRYPT_COST},
    },
    error::WaitlistError,
    notifier::{Message, Notifier},
    waitlist::{
        models::{normalize_email, SignupOutcome, WaitlistEntry},
        store::{InsertOutcome, WaitlistStore},
    },
};
use chrono::Utc;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{error, info, warn};

/// Postmark template alias for the signup confirmation
pub const WAITLIST_SIGNUP_TEMPLATE: &str = "waitlist-signup";

pub struct WaitlistService {
    store: Arc<WaitlistStore>,
    notifier: Arc<dyn Notifier>,
    jwt_handler: Arc<JwtHandler>,
    op_timeout: Duration,
    bcrypt_cost: u32,
}

impl WaitlistService {
    pub fn new(
        store: Arc<WaitlistStore>,
        notifier: Arc<dyn Notifier>,
        jwt_handler: Arc<JwtHandler>,
        op_timeout: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            jwt_handler,
            op_timeout,
            bcrypt_cost: BCRYPT_COST,
        }
    }

    /// Add an email to the waitlist and send the confirmation.
    ///
    /// A notifier failure is returned as an error, but the entry stays persisted.
    pub async fn signup(&self, email: &str) -> Result<SignupOutcome, WaitlistError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(WaitlistError::Validation("Email is required".to_string()));
        }

        let existing = self
            .storage("find_waitlist_by_email", self.store.find_waitlist_by_email(&email))
            .await?;
        if existing.is_some() {
            info!("Signup for existing waitlist email {}", email);
            return Ok(SignupOutcome::AlreadyExists);
        }

        let entry = WaitlistEntry::new(&email, Utc::now().timestamp());
        let outcome = self
            .storage("insert_waitlist", self.store.insert_waitlist(&entry))
            .await?;

        if outcome == InsertOutcome::Duplicate {
            // A concurrent signup for the same email won the insert
            info!("Concurrent signup for {} resolved as existing", email);
            return Ok(SignupOutcome::AlreadyExists);
        }

        info!("✅ Added {} to waitlist", email);

        let message = Message::email(&email, WAITLIST_SIGNUP_TEMPLATE, WAITLIST_SIGNUP_TEMPLATE)
            .with_data("Email", &email);
        self.notify(&message).await?;

        Ok(SignupOutcome::Added(entry))
    }

    /// Every entry, in signup order
    pub async fn list(&self) -> Result<Vec<WaitlistEntry>, WaitlistError> {
        self.storage("list_waitlist", self.store.list_waitlist()).await
    }

    /// Remove an email from the waitlist
    pub async fn delete(&self, email: &str) -> Result<(), WaitlistError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(WaitlistError::Validation(
                "Email parameter is missing".to_string(),
            ));
        }

        let existing = self
            .storage("find_waitlist_by_email", self.store.find_waitlist_by_email(&email))
            .await?;
        if existing.is_none() {
            return Err(WaitlistError::NotFound("Email not found".to_string()));
        }

        let deleted = self
            .storage(
                "delete_waitlist_by_email",
                self.store.delete_waitlist_by_email(&email),
            )
            .await?;

        info!("🗑️  Deleted {} from waitlist ({} row)", email, deleted);
        Ok(())
    }

    /// Check admin credentials and issue a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn signin(&self, email: &str, password: &str) -> Result<String, WaitlistError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(WaitlistError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let admin = self
            .storage("find_admin_by_email", self.store.find_admin_by_email(&email))
            .await?;

        let Some(admin) = admin else {
            warn!("❌ Failed signin for {}: unknown admin", email);
            return Err(WaitlistError::InvalidCredentials);
        };

        if !verify_password(password, &admin.password_hash).await {
            warn!("❌ Failed signin for {}: password mismatch", email);
            return Err(WaitlistError::InvalidCredentials);
        }

        let token = self.jwt_handler.generate_token(&admin.email).map_err(|e| {
            error!("Failed to sign token for {}: {:#}", admin.email, e);
            WaitlistError::Token(e.to_string())
        })?;

        info!("✅ Signin successful: {}", admin.email);
        Ok(token)
    }

    /// Create an administrator account
    pub async fn create_admin(&self, email: &str, password: &str) -> Result<(), WaitlistError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(WaitlistError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)
            .await
            .map_err(|e| {
                error!("Failed to hash password: {:#}", e);
                WaitlistError::Password(e.to_string())
            })?;

        let admin = AdminCredential {
            email,
            password_hash,
        };

        let outcome = self
            .storage("insert_admin", self.store.insert_admin(&admin))
            .await?;
        if outcome == InsertOutcome::Duplicate {
            return Err(WaitlistError::Conflict("Admin already exists".to_string()));
        }

        info!("✅ Created admin: {}", admin.email);
        Ok(())
    }

    /// Run a store call under the operation timeout
    async fn storage<T, F>(&self, operation: &'static str, fut: F) -> Result<T, WaitlistError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(operation, "Storage call failed: {:#}", e);
                Err(WaitlistError::Storage(e.to_string()))
            }
            Err(_) => {
                error!(
                    operation,
                    timeout_ms = self.op_timeout.as_millis() as u64,
                    "Storage call timed out"
                );
                Err(WaitlistError::Storage(format!("{} timed out", operation)))
            }
        }
    }

    async fn notify(&self, message: &Message) -> Result<(), WaitlistError> {
        match tokio::time::timeout(self.op_timeout, self.notifier.send(message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!(target_address = %message.target, "Notification failed: {:#}", e);
                Err(WaitlistError::Notifier(e.to_string()))
            }
            Err(_) => {
                error!(target_address = %message.target, "Notification timed out");
                Err(WaitlistError::Notifier("send timed out".to_string()))
            }
        }
    }
}
