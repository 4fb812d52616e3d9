//! JWT Token Handler
//! Mission: Issue and validate RS256 admin tokens

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use thiserror::Error;
use tracing::debug;

/// Lifetime of an issued admin token
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Algorithms accepted on the verify path. Anything outside the RSA family is a downgrade.
const RSA_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("malformed token")]
    Malformed,
    #[error("unexpected signing algorithm")]
    WrongAlgorithm,
}

/// JWT Handler holding the process-wide RSA key pair
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtHandler {
    /// Build a handler from PEM-encoded RSA keys (PKCS#1 or PKCS#8 private, SPKI public)
    pub fn from_pem(private_key_pem: &str, public_key_pem: &str) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .context("Invalid RSA private key PEM")?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .context("Invalid RSA public key PEM")?;

        Ok(Self {
            encoding_key,
            decoding_key,
            expiration_hours: TOKEN_TTL_HOURS,
        })
    }

    /// Generate a token for an admin email, valid for 24 hours
    pub fn generate_token(&self, email: &str) -> Result<String> {
        self.generate_token_with_ttl(email, Duration::hours(self.expiration_hours))
    }

    /// Generate a token with an explicit lifetime. A negative ttl yields an expired token.
    pub fn generate_token_with_ttl(&self, email: &str, ttl: Duration) -> Result<String> {
        let exp = Utc::now()
            .checked_add_signed(ttl)
            .context("Invalid timestamp")?
            .timestamp();

        let claims = Claims {
            email: email.to_string(),
            exp,
        };

        debug!("Generating JWT for {}, expires at {}", email, exp);

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Validate a token and extract its claims
    ///
    /// An `alg` that jsonwebtoken does not know (`none` included) fails header parsing and is
    /// reported as [`TokenError::Malformed`].
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Malformed)?;
        if !RSA_ALGORITHMS.contains(&header.alg) {
            return Err(TokenError::WrongAlgorithm);
        }

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = RSA_ALGORITHMS.to_vec();
        validation.leeway = 0;

        let decoded =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::BadSignature,
                    ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                        TokenError::WrongAlgorithm
                    }
                    _ => TokenError::Malformed,
                }
            })?;

        debug!("Validated JWT for {}", decoded.claims.email);

        Ok(decoded.claims)
    }
}
