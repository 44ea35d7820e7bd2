use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{
        password::{hash_password, verify_dummy, verify_password},
        SessionClaims,
    },
    models::{Account, AccountView, Credentials, RegisterRequest, Role},
    utils::state::AppState,
    web::{error::ApiError, extract::ApiJson, validation},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub account: AccountView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub account: AccountView,
}

pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(&state, credentials, Role::Admin).await.map(Json)
}

pub async fn noticer_login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(&state, credentials, Role::Noticer).await.map(Json)
}

async fn login(
    state: &AppState,
    credentials: Credentials,
    role: Role,
) -> Result<LoginResponse, ApiError> {
    let email = credentials.email.trim().to_lowercase();

    let account = state.account_repo.find_by_email(&email).await?;
    // argon2 runs whether or not the email is known
    let verified = match &account {
        Some(account) => verify_password(&credentials.password, &account.password_hash),
        None => verify_dummy(&credentials.password),
    };

    let account = match account {
        Some(account) if verified && account.role == role => account,
        _ => {
            tracing::info!("Rejected {} login for {email}", role.as_str());
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let token = state.token_keys.issue_session_token(&account)?;
    tracing::info!("{} {} logged in", role.as_str(), account.email);

    Ok(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        account: AccountView::from(&account),
    })
}

/// Registers a new staff account. Admin only.
pub async fn register(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = validation::required("name", &payload.name)?;
    let email = validation::email(&payload.email)?;
    validation::password(&payload.password)?;
    let role = payload.role.unwrap_or(Role::Admin);

    let store = &state.account_repo;
    if store.find_by_email(&email).await?.is_some() {
        tracing::warn!("Attempted to register existing account {email}");
        return Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let account = Account {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        email,
        password_hash: hash_password(&payload.password)?,
        role,
        created_at: Utc::now(),
    };
    let view = AccountView::from(&account);
    store.insert_one(account).await?;

    tracing::info!(
        "{} registered {} account {}",
        claims.email,
        role.as_str(),
        view.email
    );
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Account registered".to_string(),
            account: view,
        }),
    ))
}
