use axum::{response::IntoResponse, Json};
use hyper::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Missing or invalid Authorization header")]
    InvalidAuthorizationHeader,
    #[error("Session expired")]
    SessionExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Admin access required")]
    AdminRequired,
}

impl From<AuthError> for AuthenticationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SessionExpired => AuthenticationError::SessionExpired,
            _ => AuthenticationError::InvalidToken,
        }
    }
}

impl IntoResponse for AuthenticationError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AuthenticationError::AdminRequired => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        };

        let body = json!({
            "success": false,
            "message": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}
