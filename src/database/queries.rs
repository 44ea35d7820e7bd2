use std::{marker::PhantomData, sync::Arc};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, SqlErr,
};

use super::error::RepositoryError;
use crate::models::{
    accounts, notices, update_requests, Account, FileList, Notice, UpdateRequest, UpdateStatus,
};

/// Repository over a single table, parameterised by the domain type it stores
pub struct SeaOrmStore<T> {
    db: Arc<DatabaseConnection>,
    _entity: PhantomData<T>,
}

impl<T> SeaOrmStore<T> {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

fn store_error(err: DbErr) -> RepositoryError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return RepositoryError::DuplicateEntry;
    }
    tracing::error!("Failed to store entity: {err:?}");
    RepositoryError::StoreError
}

fn fetch_error(err: DbErr) -> RepositoryError {
    tracing::error!("Failed to fetch entity: {err:?}");
    RepositoryError::FetchError
}

impl SeaOrmStore<Account> {
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email.to_lowercase()))
            .one(&*self.db)
            .await
            .map_err(fetch_error)
    }

    pub async fn insert_one(&self, account: Account) -> Result<(), RepositoryError> {
        accounts::Entity::insert(account.into_active_model())
            .exec_without_returning(&*self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

impl SeaOrmStore<Notice> {
    pub async fn find_all(&self) -> Result<Vec<Notice>, RepositoryError> {
        notices::Entity::find()
            .order_by_desc(notices::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(fetch_error)
    }

    pub async fn insert_one(&self, notice: Notice) -> Result<(), RepositoryError> {
        notices::Entity::insert(notice.into_active_model())
            .exec_without_returning(&*self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    /// Returns `false` when no notice carries the given id
    pub async fn delete_by(&self, id: &str) -> Result<bool, RepositoryError> {
        let result = notices::Entity::delete_by_id(id.to_owned())
            .exec(&*self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete notice {id}: {e:?}");
                RepositoryError::DeleteError
            })?;
        Ok(result.rows_affected > 0)
    }
}

impl SeaOrmStore<UpdateRequest> {
    pub async fn find_one_by(&self, id: &str) -> Result<Option<UpdateRequest>, RepositoryError> {
        update_requests::Entity::find_by_id(id.to_owned())
            .one(&*self.db)
            .await
            .map_err(fetch_error)
    }

    pub async fn find_all(&self) -> Result<Vec<UpdateRequest>, RepositoryError> {
        update_requests::Entity::find()
            .order_by_desc(update_requests::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(fetch_error)
    }

    pub async fn insert_one(&self, request: UpdateRequest) -> Result<(), RepositoryError> {
        update_requests::Entity::insert(request.into_active_model())
            .exec_without_returning(&*self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    /// Records a submission against a pending request.
    ///
    /// Only rows still in the `pending` state are touched, so a second
    /// submission for the same request returns `false`.
    pub async fn mark_submitted(
        &self,
        id: &str,
        files: FileList,
        note: Option<String>,
        submitted_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let changes = update_requests::ActiveModel {
            status: Set(UpdateStatus::Submitted),
            submitted_at: Set(Some(submitted_at)),
            submitted_files: Set(files),
            submission_note: Set(note),
            ..Default::default()
        };

        let result = update_requests::Entity::update_many()
            .set(changes)
            .filter(update_requests::Column::Id.eq(id))
            .filter(update_requests::Column::Status.eq(UpdateStatus::Pending))
            .exec(&*self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to mark update request {id} as submitted: {e:?}");
                RepositoryError::UpdateError
            })?;
        Ok(result.rows_affected > 0)
    }
}
