//! Authentication Module
//! Mission: Admin credentials, RS256 tokens and the access gate

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{JwtHandler, TokenError};
pub use middleware::auth_middleware;
pub use models::{AdminCredential, Claims};
