use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    auth::SessionClaims,
    models::{FileList, SendUpdateRequest, UpdateRequest, UpdateStatus},
    utils::state::AppState,
    web::{error::ApiError, extract::ApiJson, validation},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct SendUpdateResponse {
    pub success: bool,
    pub message: String,
    pub request_id: String,
    pub update_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Opens an update request for a proposal and issues its update token
pub async fn send_update_request(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(payload): ApiJson<SendUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let proposal_id = validation::required("proposal_id", &payload.proposal_id)?;
    let proposal_type = validation::required("proposal_type", &payload.proposal_type)?;
    let message = validation::required("message", &payload.message)?;
    let expiry_days = validation::expiry_days(payload.expiry_days)?;

    let now = Utc::now();
    let request = UpdateRequest {
        id: uuid::Uuid::new_v4().to_string(),
        proposal_id,
        proposal_type,
        message,
        requested_by: claims.sub.clone(),
        status: UpdateStatus::Pending,
        expires_at: now + TimeDelta::days(expiry_days),
        created_at: now,
        submitted_at: None,
        submitted_files: FileList::default(),
        submission_note: None,
    };

    // sign before persisting so a signing failure leaves no orphaned request
    let update_token = state.token_keys.issue_update_token(&request)?;
    let request_id = request.id.clone();
    let expires_at = request.expires_at;
    let proposal_id = request.proposal_id.clone();

    state.update_request_repo.insert_one(request).await?;

    tracing::info!(
        "{} requested an update for proposal {proposal_id} (request {request_id}, expires {expires_at})",
        claims.email
    );
    Ok((
        StatusCode::CREATED,
        Json(SendUpdateResponse {
            success: true,
            message: "Update request sent".to_string(),
            request_id,
            update_token,
            expires_at,
        }),
    ))
}
