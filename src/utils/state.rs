use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::{eyre, Context};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use secrecy::ExposeSecret;

use super::uploads::UploadStore;
use crate::{
    auth::{password::hash_password, TokenKeys},
    config::Config,
    database::{queries::SeaOrmStore, Migrator},
    models::{Account, Notice, Role, UpdateRequest},
};

#[derive(Clone)]
pub struct AppState {
    pub account_repo: Arc<SeaOrmStore<Account>>,
    pub notice_repo: Arc<SeaOrmStore<Notice>>,
    pub update_request_repo: Arc<SeaOrmStore<UpdateRequest>>,
    pub token_keys: Arc<TokenKeys>,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, token_keys: TokenKeys, uploads: UploadStore) -> Self {
        Self {
            account_repo: Arc::new(SeaOrmStore::new(Arc::clone(&db))),
            notice_repo: Arc::new(SeaOrmStore::new(Arc::clone(&db))),
            update_request_repo: Arc::new(SeaOrmStore::new(db)),
            token_keys: Arc::new(token_keys),
            uploads,
        }
    }
}

pub async fn build_state(config: &Config) -> color_eyre::Result<AppState> {
    let db: DatabaseConnection = Database::connect(config.database.url.expose_secret())
        .await
        .wrap_err("Failed to connect to database")?;

    Migrator::up(&db, None)
        .await
        .wrap_err("Failed to apply migrations")?;

    let uploads = UploadStore::init(&config.uploads.dir)
        .await
        .wrap_err_with(|| format!("Failed to create upload directory {}", config.uploads.dir))?;

    let token_keys = TokenKeys::new(
        &config.auth.jwt_secret,
        &config.auth.update_token_secret,
        config.auth.session_ttl_hours,
    )
    .wrap_err("Failed to set up token signing")?;

    let state = AppState::new(Arc::new(db), token_keys, uploads);
    ensure_bootstrap_admin(&state, config).await?;
    Ok(state)
}

/// Creates the configured bootstrap admin unless an account with that email exists
async fn ensure_bootstrap_admin(state: &AppState, config: &Config) -> color_eyre::Result<()> {
    let (Some(email), Some(password)) = (
        config.auth.bootstrap_admin_email.as_deref(),
        config.auth.bootstrap_admin_password.as_ref(),
    ) else {
        return Ok(());
    };

    let email = email.trim().to_lowercase();
    if state.account_repo.find_by_email(&email).await?.is_some() {
        tracing::debug!("Bootstrap admin {email} already present");
        return Ok(());
    }

    let password_hash = hash_password(password.expose_secret())?;
    let admin = Account {
        id: uuid::Uuid::new_v4().to_string(),
        name: "Administrator".to_string(),
        email: email.clone(),
        password_hash,
        role: Role::Admin,
        created_at: Utc::now(),
    };
    state
        .account_repo
        .insert_one(admin)
        .await
        .map_err(|e| eyre!("Failed to create bootstrap admin {email}: {e}"))?;

    tracing::info!("Created bootstrap admin account {email}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        database::RepositoryError,
        test_utils::{test_account, test_app_state},
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use sealed_test::prelude::*;

    #[sealed_test(env = [
        ("APP_AUTH__BOOTSTRAP_ADMIN_EMAIL", "Director@Research.edu"),
        ("APP_AUTH__BOOTSTRAP_ADMIN_PASSWORD", "initial-password"),
    ])]
    fn test_bootstrap_admin_created_when_missing() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let config = Config::load().unwrap();
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<Account>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection();
            let (state, _upload_dir) = test_app_state(Some(Arc::new(db))).await;

            assert!(ensure_bootstrap_admin(&state, &config).await.is_ok());
        });
    }

    #[sealed_test(env = [
        ("APP_AUTH__BOOTSTRAP_ADMIN_EMAIL", "director@research.edu"),
        ("APP_AUTH__BOOTSTRAP_ADMIN_PASSWORD", "initial-password"),
    ])]
    fn test_bootstrap_admin_left_alone_when_present() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let config = Config::load().unwrap();
            let existing = test_account("director@research.edu", "changed-since", Role::Admin);
            // no exec results queued: an insert would fail
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![existing]])
                .into_connection();
            let (state, _upload_dir) = test_app_state(Some(Arc::new(db))).await;

            assert!(ensure_bootstrap_admin(&state, &config).await.is_ok());
            // the queued lookup was consumed
            let lookup = state.account_repo.find_by_email("director@research.edu").await;
            assert!(matches!(lookup, Err(RepositoryError::FetchError)));
        });
    }

    #[tokio::test]
    async fn test_bootstrap_admin_skipped_without_config() {
        let config = Config::load().unwrap();
        // no queued results: any query would fail
        let (state, _upload_dir) = test_app_state(None).await;

        assert!(ensure_bootstrap_admin(&state, &config).await.is_ok());
        let lookup = state.account_repo.find_by_email("admin@research.edu").await;
        assert!(matches!(lookup, Err(RepositoryError::FetchError)));
    }
}
