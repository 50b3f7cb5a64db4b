//! Repository error taxonomy.

use crate::db::DbError;
use crate::normalize::NormalizeError;
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by read services and write repositories.
///
/// "No matching row" is not an error: reads return `Option`/empty results.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Persistence failure from the underlying store, unmodified.
    #[error(transparent)]
    Db(#[from] DbError),
    /// Search criteria of the wrong type for the configured entity.
    #[error("search criteria do not match `{entity}`: {message}")]
    TypeMismatch {
        entity: &'static str,
        message: String,
    },
    /// The backing store cannot perform the requested operation.
    #[error("`{operation}` is not supported on `{entity}`: {reason}")]
    NotSupported {
        entity: &'static str,
        operation: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    /// The cancellation token fired before the commit became durable.
    #[error("save_changes was cancelled before commit")]
    Cancelled,
    #[error("required table is missing: {0}")]
    MissingRequiredTable(&'static str),
    #[error("required column is missing: {table}.{column}")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Entity state that cannot be written or read back consistently.
    #[error("invalid entity data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
