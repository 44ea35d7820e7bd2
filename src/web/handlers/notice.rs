use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    auth::SessionClaims,
    models::{FileList, NewNotice, Notice},
    utils::state::AppState,
    web::{error::ApiError, extract::ApiJson, validation},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct NoticeListResponse {
    pub success: bool,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NoticeResponse {
    pub success: bool,
    pub message: String,
    pub notice: Notice,
}

/// Lists every notice, newest first
pub async fn get_notices(
    State(state): State<AppState>,
) -> Result<Json<NoticeListResponse>, ApiError> {
    let notices = state.notice_repo.find_all().await?;
    Ok(Json(NoticeListResponse {
        success: true,
        notices,
    }))
}

pub async fn add_notice(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(payload): ApiJson<NewNotice>,
) -> Result<impl IntoResponse, ApiError> {
    let title = validation::required("title", &payload.title)?;
    let description = validation::required("description", &payload.description)?;
    let link = validation::link(payload.link.as_deref())?;
    let attachments: Vec<String> = payload
        .attachments
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_owned)
        .collect();

    let notice = Notice {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        description,
        created_at: Utc::now(),
        attachments: FileList(attachments),
        link,
        posted_by: claims.sub.clone(),
    };
    state.notice_repo.insert_one(notice.clone()).await?;

    tracing::info!("{} posted notice {}", claims.email, notice.id);
    Ok((
        StatusCode::CREATED,
        Json(NoticeResponse {
            success: true,
            message: "Notice published".to_string(),
            notice,
        }),
    ))
}

pub async fn delete_notice(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.notice_repo.delete_by(&id).await? {
        return Err(ApiError::NotFound("Notice not found".to_string()));
    }

    tracing::info!("{} removed notice {id}", claims.email);
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Notice removed",
    })))
}
