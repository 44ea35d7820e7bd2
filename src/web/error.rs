use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{
    auth::{AuthError, UpdateTokenError},
    database::RepositoryError,
    utils::errors::UploadError,
};

/// Error returned by the API handlers, rendered as `{success: false, message}`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// A request the body extractors refused, keeping their status code
    #[error("{1}")]
    Rejected(StatusCode, String),
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use ApiError::*;
        let status_code = match self {
            BadRequest(_) => StatusCode::BAD_REQUEST,
            Unauthorized(_) => StatusCode::UNAUTHORIZED,
            NotFound(_) => StatusCode::NOT_FOUND,
            Conflict(_) => StatusCode::CONFLICT,
            Rejected(status, _) => status,
            InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "success": false,
            "message": self.to_string(),
        });

        (status_code, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEntry => ApiError::Conflict("Entry already exists".to_string()),
            err => {
                tracing::error!("Repository failure: {err:?}");
                ApiError::InternalServerError
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SessionExpired | AuthError::InvalidToken => {
                ApiError::Unauthorized(err.to_string())
            }
            err => {
                tracing::error!("Authentication failure: {err:?}");
                ApiError::InternalServerError
            }
        }
    }
}

impl From<UpdateTokenError> for ApiError {
    fn from(err: UpdateTokenError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Multipart(e) => ApiError::Rejected(e.status(), e.body_text()),
            err => {
                tracing::error!("Upload failure: {err:?}");
                ApiError::InternalServerError
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}
