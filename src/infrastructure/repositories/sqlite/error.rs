// src/infrastructure/repositories/sqlite/error.rs

use diesel::r2d2;
use diesel::result::Error as DieselError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DieselError),

    #[error("Diesel connection error: {0}")]
    ConnectionError(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    ConnectionPoolError(String),

    #[error("Failed to convert entity: {0}")]
    ConversionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Repository operation failed: {0}")]
    OperationFailed(String),
}

pub type SqliteResult<T> = Result<T, SqliteRepositoryError>;

impl From<r2d2::Error> for SqliteRepositoryError {
    fn from(err: r2d2::Error) -> Self {
        SqliteRepositoryError::ConnectionPoolError(err.to_string())
    }
}

impl From<SqliteRepositoryError> for crate::domain::error::DomainError {
    fn from(err: SqliteRepositoryError) -> Self {
        match err {
            SqliteRepositoryError::DatabaseError(diesel_err) => match diesel_err {
                DieselError::NotFound => crate::domain::error::DomainError::BookmarkNotFound(
                    "Resource not found".to_string(),
                ),
                DieselError::DatabaseError(_, info) => {
                    crate::domain::error::DomainError::RepositoryError(format!(
                        "Database error: {}",
                        info.message()
                    ))
                }
                _ => crate::domain::error::DomainError::RepositoryError(format!(
                    "Database error: {}",
                    diesel_err
                )),
            },
            SqliteRepositoryError::ConnectionError(e) => {
                crate::domain::error::DomainError::RepositoryError(format!(
                    "Database connection error: {}",
                    e
                ))
            }
            SqliteRepositoryError::ConnectionPoolError(e) => {
                crate::domain::error::DomainError::RepositoryError(format!(
                    "Connection pool error: {}",
                    e
                ))
            }
            SqliteRepositoryError::ConversionError(e) => {
                crate::domain::error::DomainError::RepositoryError(format!(
                    "Data conversion error: {}",
                    e
                ))
            }
            SqliteRepositoryError::IoError(e) => {
                crate::domain::error::DomainError::RepositoryError(format!("IO error: {}", e))
            }
            SqliteRepositoryError::MigrationError(e) => {
                crate::domain::error::DomainError::RepositoryError(format!(
                    "Migration error: {}",
                    e
                ))
            }
            SqliteRepositoryError::OperationFailed(e) => {
                crate::domain::error::DomainError::RepositoryError(e)
            }
        }
    }
}
