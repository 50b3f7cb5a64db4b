//! Post-read enrichment of materialized entities.

use crate::repo::error::RepoResult;
use rusqlite::Connection;

/// Fills derived, non-persisted fields on entities after a read.
///
/// Processors see every row of one read at once and run in registration
/// order, after requested includes are attached.
pub trait EntityProcessor<E>: Send + Sync {
    fn process_many(&self, conn: &Connection, items: &mut [E]) -> RepoResult<()>;
}
