use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    auth::UpdateClaims,
    models::{FileList, UpdateStatus},
    utils::{
        errors::UploadError,
        state::AppState,
        uploads::ProvisionalUploads,
    },
    web::{error::ApiError, extract::ApiMultipart},
};

const TOKEN_FIELD: &str = "update_token";
const NOTE_FIELD: &str = "note";

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitUpdateResponse {
    pub success: bool,
    pub message: String,
    pub request_id: String,
    pub files: Vec<String>,
}

#[derive(Debug, Default)]
struct SubmissionForm {
    update_token: Option<String>,
    note: Option<String>,
}

/// Accepts a proposal update: files plus the update token issued for it.
///
/// Files are written to the upload directory before the token is checked.
/// Whenever the submission is not accepted they are deleted again.
pub async fn submit_update(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<SubmitUpdateResponse>, ApiError> {
    let mut uploads = state.uploads.begin();

    let form = match read_submission(&mut multipart, &mut uploads).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Failed to read update submission: {e}");
            uploads.discard().await;
            return Err(e.into());
        }
    };

    let claims = match state
        .token_keys
        .verify_update_token(form.update_token.as_deref())
    {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Rejected update submission: {e}");
            uploads.discard().await;
            return Err(e.into());
        }
    };

    match record_submission(&state, &claims, &uploads, form.note).await {
        Ok(files) => {
            tracing::info!(
                "Proposal {} submitted {} file(s) for update request {}",
                claims.proposal_id,
                files.len(),
                claims.sub
            );
            Ok(Json(SubmitUpdateResponse {
                success: true,
                message: "Update submitted".to_string(),
                request_id: claims.sub,
                files,
            }))
        }
        Err(e) => {
            uploads.discard().await;
            Err(e)
        }
    }
}

async fn read_submission(
    multipart: &mut Multipart,
    uploads: &mut ProvisionalUploads,
) -> Result<SubmissionForm, UploadError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        let is_file = field.file_name().is_some();

        match name.as_deref() {
            Some(TOKEN_FIELD) if !is_file => form.update_token = Some(field.text().await?),
            Some(NOTE_FIELD) if !is_file => {
                let note = field.text().await?;
                form.note = Some(note.trim().to_string()).filter(|n| !n.is_empty());
            }
            _ if is_file => {
                uploads.store_field(field).await?;
            }
            other => tracing::debug!("Ignoring form field {other:?}"),
        }
    }

    Ok(form)
}

async fn record_submission(
    state: &AppState,
    claims: &UpdateClaims,
    uploads: &ProvisionalUploads,
    note: Option<String>,
) -> Result<Vec<String>, ApiError> {
    let store = &state.update_request_repo;

    let request = store.find_one_by(&claims.sub).await?.ok_or_else(|| {
        tracing::warn!("Update token references unknown request {}", claims.sub);
        ApiError::Unauthorized("Invalid update token".to_string())
    })?;

    if request.status == UpdateStatus::Submitted {
        return Err(ApiError::Conflict(
            "An update was already submitted for this request".to_string(),
        ));
    }

    let files = uploads.file_names();
    let recorded = store
        .mark_submitted(&request.id, FileList(files.clone()), note, Utc::now())
        .await?;
    if !recorded {
        return Err(ApiError::Conflict(
            "An update was already submitted for this request".to_string(),
        ));
    }

    Ok(files)
}
