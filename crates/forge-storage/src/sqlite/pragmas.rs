//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use forge_core::errors::ForgeResult;

use crate::to_store_err;

/// WAL journal, NORMAL sync, 5s busy timeout.
pub fn apply_pragmas(conn: &Connection) -> ForgeResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Whether WAL mode is active. In-memory databases report `memory`.
pub fn verify_wal_mode(conn: &Connection) -> ForgeResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
