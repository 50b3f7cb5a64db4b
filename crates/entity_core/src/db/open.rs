//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by repository behavior.
//!
//! # Invariants
//! - Returned connections honor the requested `DbOptions`.
//! - Read-only connections are opened with `SQLITE_OPEN_READ_ONLY` so write
//!   attempts are rejected by SQLite itself.

use super::DbResult;
use log::{debug, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Connection options applied by [`open_db_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbOptions {
    /// How long SQLite waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Enables `PRAGMA foreign_keys`.
    pub foreign_keys: bool,
    /// Opens the file without write access.
    pub read_only: bool,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            foreign_keys: true,
            read_only: false,
        }
    }
}

/// Opens a SQLite database file with default options.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with(path, &DbOptions::default())
}

/// Opens a SQLite database file with explicit options.
///
/// # Side effects
/// - Emits `db_open` logging events with duration.
pub fn open_db_with(path: impl AsRef<Path>, options: &DbOptions) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = if options.read_only { "file_ro" } else { "file" };
    debug!("event=db_open module=db status=start mode={mode}");

    let conn = if options.read_only {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?
    } else {
        Connection::open(path)?
    };
    configure_connection(&conn, options)?;

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Opens an in-memory SQLite database with default options.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn, &DbOptions::default())?;

    info!(
        "event=db_open module=db status=ok mode=memory duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn configure_connection(conn: &Connection, options: &DbOptions) -> DbResult<()> {
    if options.foreign_keys {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    }
    conn.busy_timeout(options.busy_timeout)?;
    Ok(())
}
