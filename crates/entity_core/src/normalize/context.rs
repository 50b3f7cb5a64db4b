//! Collaborators handed to normalizer factories and normalizers.

use crate::normalize::{NormalizeError, NormalizeResult};
use rusqlite::{Connection, OptionalExtension, Params, Row, Statement};

/// Read-only view of the connection a unit of work commits through.
///
/// Lets normalizers look up related rows without being able to write.
#[derive(Clone, Copy)]
pub struct NormalizeContext<'conn> {
    conn: &'conn Connection,
}

impl<'conn> NormalizeContext<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Prepares a statement, rejecting anything that is not read-only.
    pub fn prepare_read(&self, sql: &str) -> NormalizeResult<Statement<'conn>> {
        let stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(NormalizeError::WriteAttempt(sql.trim().to_string()));
        }
        Ok(stmt)
    }

    /// Runs a read-only single-row query; `None` when no row matches.
    pub fn query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> NormalizeResult<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.prepare_read(sql)?;
        Ok(stmt.query_row(params, map).optional()?)
    }

    /// Runs a read-only query and collects every mapped row.
    pub fn query_all<T, P, F>(&self, sql: &str, params: P, mut map: F) -> NormalizeResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.prepare_read(sql)?;
        let mut rows = stmt.query(params)?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            values.push(map(row)?);
        }
        Ok(values)
    }
}
