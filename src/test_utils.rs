use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use sea_orm::{DbBackend, MockDatabase};
use secrecy::SecretString;
use tempfile::TempDir;

use crate::{
    auth::{password::hash_password, TokenKeys},
    models::{Account, FileList, Role, UpdateRequest, UpdateStatus},
    utils::{state::AppState, uploads::UploadStore},
};

pub fn test_token_keys() -> TokenKeys {
    TokenKeys::new(
        &SecretString::from("test-session-secret"),
        &SecretString::from("test-update-secret"),
        1,
    )
    .expect("Failed to build test token keys")
}

/// Builds an app state over a mock database and a fresh upload directory.
/// The directory is removed when the returned `TempDir` is dropped.
pub async fn test_app_state(
    db_conn: Option<Arc<sea_orm::DatabaseConnection>>,
) -> (AppState, TempDir) {
    let db = db_conn
        .unwrap_or_else(|| Arc::new(MockDatabase::new(DbBackend::Postgres).into_connection()));

    let upload_dir = TempDir::new().expect("Failed to create test upload directory");
    let uploads = UploadStore::init(upload_dir.path())
        .await
        .expect("Failed to create test upload directory");

    (AppState::new(db, test_token_keys(), uploads), upload_dir)
}

pub fn test_account(email: &str, password: &str, role: Role) -> Account {
    Account {
        id: uuid::Uuid::new_v4().to_string(),
        name: "Test Staff".to_string(),
        email: email.to_string(),
        password_hash: hash_password(password).expect("Failed to hash password"),
        role,
        created_at: Utc::now(),
    }
}

/// A bearer token for a freshly made account with the given role
pub fn bearer_for(state: &AppState, role: Role) -> String {
    let account = Account {
        id: format!("{}-1", role.as_str()),
        name: "Test Staff".to_string(),
        email: format!("{}@research.edu", role.as_str()),
        password_hash: String::new(),
        role,
        created_at: Utc::now(),
    };
    let token = state
        .token_keys
        .issue_session_token(&account)
        .expect("Failed to sign session token");
    format!("Bearer {token}")
}

pub fn pending_request(id: &str, expires_in: TimeDelta) -> UpdateRequest {
    let now = Utc::now();
    UpdateRequest {
        id: id.to_string(),
        proposal_id: "PRJ-2024-017".to_string(),
        proposal_type: "research-grant".to_string(),
        message: "Please upload the revised budget".to_string(),
        requested_by: "admin-1".to_string(),
        status: UpdateStatus::Pending,
        expires_at: now + expires_in,
        created_at: now,
        submitted_at: None,
        submitted_files: FileList::default(),
        submission_note: None,
    }
}

pub fn upload_dir_is_empty(state: &AppState) -> bool {
    std::fs::read_dir(state.uploads.dir())
        .expect("Failed to read upload directory")
        .next()
        .is_none()
}
