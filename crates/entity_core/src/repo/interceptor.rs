//! Pre-commit hook invoked by the unit of work.

use crate::repo::error::RepoResult;
use rusqlite::Connection;

/// Called on every staged insert/update entity right before the commit
/// transaction starts.
///
/// Interceptors may mutate the entity in place; they cannot stage writes.
pub trait SaveInterceptor<E>: Send + Sync {
    fn saving(&self, conn: &Connection, entity: &mut E) -> RepoResult<()>;
}
