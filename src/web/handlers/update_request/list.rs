use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{models::UpdateRequest, utils::state::AppState, web::error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRequestListResponse {
    pub success: bool,
    pub requests: Vec<UpdateRequest>,
}

pub async fn list_update_requests(
    State(state): State<AppState>,
) -> Result<Json<UpdateRequestListResponse>, ApiError> {
    let requests = state.update_request_repo.find_all().await?;
    Ok(Json(UpdateRequestListResponse {
        success: true,
        requests,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{pending_request, test_app_state};
    use chrono::TimeDelta;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_update_requests() {
        let stored = vec![
            pending_request("req-2", TimeDelta::days(7)),
            pending_request("req-1", TimeDelta::days(1)),
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([stored.clone()])
            .into_connection();
        let (state, _upload_dir) = test_app_state(Some(Arc::new(db))).await;

        let Json(response) = list_update_requests(State(state)).await.unwrap();
        assert!(response.success);
        assert_eq!(response.requests, stored);
    }

    #[tokio::test]
    async fn test_list_update_requests_db_failure() {
        let (state, _upload_dir) = test_app_state(None).await;

        let result = list_update_requests(State(state)).await;
        assert!(matches!(result, Err(ApiError::InternalServerError)));
    }
}
