//! Viewer identity ports.
//!
//! Logging in is handled elsewhere; this crate only needs to turn a bearer
//! token back into a user id and username.

use uuid::Uuid;

use crate::domain::Viewer;

/// Claims stored in access tokens.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
}

impl From<TokenClaims> for Viewer {
    fn from(claims: TokenClaims) -> Self {
        Viewer::authenticated(claims.user_id, claims.username)
    }
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Generate an access token for a user.
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
