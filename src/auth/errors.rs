use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
    #[error("Failed to sign token: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),
    #[error("Session expired")]
    SessionExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Session lifetime of {0} hours is out of range")]
    InvalidSessionTtl(i64),
}

/// Outcome of checking an update token, other than success
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTokenError {
    #[error("Update token missing")]
    Missing,
    #[error("Update token expired")]
    Expired,
    #[error("Invalid update token")]
    Invalid,
}
