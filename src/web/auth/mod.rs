pub mod errors;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use errors::AuthenticationError;
use hyper::header;

use crate::{auth::SessionClaims, models::Role, utils::state::AppState};

/// Authentication middleware guarding staff-only routes
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, AuthenticationError> {
    // Try to extract token from Authorization header
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthenticationError::InvalidAuthorizationHeader)?;

    let claims = state.token_keys.decode_session_token(token)?;

    // Insert the session claims into request extensions
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Rejects authenticated sessions that do not belong to an admin.
/// Must run after [`auth`].
pub async fn require_admin(
    Extension(claims): Extension<SessionClaims>,
    request: Request,
    next: Next,
) -> Result<Response, AuthenticationError> {
    if claims.role != Role::Admin {
        tracing::info!("{} ({}) denied admin route", claims.email, claims.role.as_str());
        return Err(AuthenticationError::AdminRequired);
    }
    Ok(next.run(request).await)
}
