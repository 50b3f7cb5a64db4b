//! SQLite connection bootstrap.
//!
//! # Responsibility
//! - Open and configure SQLite connections used by repositories.
//! - Report whether a connection can accept writes.
//!
//! # Invariants
//! - Schema management belongs to the caller; this module never creates or
//!   alters tables.
//! - Returned connections have `foreign_keys=ON` unless the caller opts out.

use thiserror::Error;

mod open;

pub use open::{open_db, open_db_in_memory, open_db_with, DbOptions};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
