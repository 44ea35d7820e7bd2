pub(crate) mod error;
pub(crate) mod queries;

pub use error::RepositoryError;
pub use migrations::Migrator;
pub use queries::SeaOrmStore;

/// Database migrations module
pub mod migrations {
    use sea_orm_migration::prelude::*;

    /// Main migrator struct for database migrations
    pub struct Migrator;

    #[async_trait::async_trait]
    impl MigratorTrait for Migrator {
        fn migrations() -> Vec<Box<dyn MigrationTrait>> {
            vec![Box::new(tables::Migration)]
        }
    }

    /// Database tables module containing table creation migrations
    pub mod tables {
        use super::*;

        /// Migration struct for creating database tables
        #[derive(DeriveMigrationName)]
        pub struct Migration;

        #[async_trait::async_trait]
        impl MigrationTrait for Migration {
            /// Creates the necessary database tables if they don't exist
            async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
                // Staff accounts, one row per admin or noticer
                manager
                    .create_table(
                        Table::create()
                            .table(Accounts::Table)
                            .if_not_exists()
                            .col(
                                ColumnDef::new(Accounts::Id)
                                    .string()
                                    .not_null()
                                    .primary_key(),
                            )
                            .col(ColumnDef::new(Accounts::Name).string().not_null())
                            .col(
                                ColumnDef::new(Accounts::Email)
                                    .string()
                                    .not_null()
                                    .unique_key(),
                            )
                            .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                            .col(ColumnDef::new(Accounts::Role).string().not_null())
                            .col(
                                ColumnDef::new(Accounts::CreatedAt)
                                    .timestamp_with_time_zone()
                                    .not_null(),
                            )
                            .to_owned(),
                    )
                    .await?;

                manager
                    .create_table(
                        Table::create()
                            .table(Notices::Table)
                            .if_not_exists()
                            .col(
                                ColumnDef::new(Notices::Id)
                                    .string()
                                    .not_null()
                                    .primary_key(),
                            )
                            .col(ColumnDef::new(Notices::Title).string().not_null())
                            .col(ColumnDef::new(Notices::Description).text().not_null())
                            .col(
                                ColumnDef::new(Notices::CreatedAt)
                                    .timestamp_with_time_zone()
                                    .not_null(),
                            )
                            .col(ColumnDef::new(Notices::Attachments).json().not_null())
                            .col(ColumnDef::new(Notices::Link).string().null())
                            .col(ColumnDef::new(Notices::PostedBy).string().not_null())
                            .to_owned(),
                    )
                    .await?;

                manager
                    .create_table(
                        Table::create()
                            .table(UpdateRequests::Table)
                            .if_not_exists()
                            .col(
                                ColumnDef::new(UpdateRequests::Id)
                                    .string()
                                    .not_null()
                                    .primary_key(),
                            )
                            .col(
                                ColumnDef::new(UpdateRequests::ProposalId)
                                    .string()
                                    .not_null(),
                            )
                            .col(
                                ColumnDef::new(UpdateRequests::ProposalType)
                                    .string()
                                    .not_null(),
                            )
                            .col(ColumnDef::new(UpdateRequests::Message).text().not_null())
                            .col(
                                ColumnDef::new(UpdateRequests::RequestedBy)
                                    .string()
                                    .not_null(),
                            )
                            .col(ColumnDef::new(UpdateRequests::Status).string().not_null())
                            .col(
                                ColumnDef::new(UpdateRequests::ExpiresAt)
                                    .timestamp_with_time_zone()
                                    .not_null(),
                            )
                            .col(
                                ColumnDef::new(UpdateRequests::CreatedAt)
                                    .timestamp_with_time_zone()
                                    .not_null(),
                            )
                            .col(
                                ColumnDef::new(UpdateRequests::SubmittedAt)
                                    .timestamp_with_time_zone()
                                    .null(),
                            )
                            .col(
                                ColumnDef::new(UpdateRequests::SubmittedFiles)
                                    .json()
                                    .not_null(),
                            )
                            .col(
                                ColumnDef::new(UpdateRequests::SubmissionNote)
                                    .text()
                                    .null(),
                            )
                            .to_owned(),
                    )
                    .await?;

                Ok(())
            }

            /// Drops the database tables
            async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
                manager
                    .drop_table(Table::drop().table(UpdateRequests::Table).to_owned())
                    .await?;
                manager
                    .drop_table(Table::drop().table(Notices::Table).to_owned())
                    .await?;
                manager
                    .drop_table(Table::drop().table(Accounts::Table).to_owned())
                    .await?;
                Ok(())
            }
        }

        #[derive(Iden)]
        enum Accounts {
            Table,
            Id,
            Name,
            Email,
            PasswordHash,
            Role,
            CreatedAt,
        }

        #[derive(Iden)]
        enum Notices {
            Table,
            Id,
            Title,
            Description,
            CreatedAt,
            Attachments,
            Link,
            PostedBy,
        }

        #[derive(Iden)]
        enum UpdateRequests {
            Table,
            Id,
            ProposalId,
            ProposalType,
            Message,
            RequestedBy,
            Status,
            ExpiresAt,
            CreatedAt,
            SubmittedAt,
            SubmittedFiles,
            SubmissionNote,
        }
    }
}
