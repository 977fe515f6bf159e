//! SQLite ticket store utilities.
//!
//! Runtime defaults:
//! - `journal_mode = WAL` so readers proceed while a writer commits
//! - `busy_timeout = 5s` so competing writers queue instead of failing
//! - `foreign_keys = ON` to protect relational integrity between tables
//!
//! Every mutating operation goes through [`write_tx`], which opens the
//! transaction with `BEGIN IMMEDIATE`. The write lock is therefore held
//! before the ticket row is read, and two racing transitions serialize:
//! the second one validates against the status the first one committed.

pub mod migrations;
pub mod query;
pub mod records;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::{path::Path, time::Duration};

/// Busy timeout used for store connections unless configured otherwise.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// File name of the store inside the project directory.
pub const STORE_FILE_NAME: &str = "tickets.sqlite3";

/// Open (or create) the ticket store, apply runtime pragmas, and migrate
/// the schema to the latest version.
///
/// # Errors
///
/// Returns an error if opening/configuring/migrating the database fails.
pub fn open_store(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create ticket store directory {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("open ticket store {}", path.display()))?;

    configure_connection(&conn, busy_timeout).context("configure sqlite pragmas")?;
    migrations::migrate(&mut conn).context("apply ticket store migrations")?;

    tracing::debug!(path = %path.display(), "opened ticket store");
    Ok(conn)
}

/// Open a private in-memory store with the full schema.
///
/// # Errors
///
/// Returns an error if configuring or migrating the database fails.
pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().context("open in-memory ticket store")?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .context("enable foreign keys")?;
    migrations::migrate(&mut conn).context("apply ticket store migrations")?;
    Ok(conn)
}

fn configure_connection(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}

/// Begin a write transaction that takes the database write lock up front.
///
/// Dropping the returned transaction without committing rolls it back.
///
/// # Errors
///
/// Returns an error if the lock cannot be acquired within the busy timeout.
pub fn write_tx(conn: &mut Connection) -> rusqlite::Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

/// Current wall-clock time in microseconds since the Unix epoch.
#[must_use]
pub fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}
