//! v001: corrections, graph_patterns.

use rusqlite::Connection;

use forge_core::errors::ForgeResult;

use crate::to_store_err;

pub fn migrate(conn: &Connection) -> ForgeResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS corrections (
            seq               INTEGER PRIMARY KEY AUTOINCREMENT,
            fingerprint       TEXT NOT NULL,
            node_type         TEXT NOT NULL,
            corrected_config  TEXT NOT NULL,
            outcome           TEXT NOT NULL,
            pattern_ref       TEXT,
            recorded_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_corrections_fp ON corrections(fingerprint, node_type);

        CREATE TABLE IF NOT EXISTS graph_patterns (
            id              TEXT PRIMARY KEY,
            category        TEXT NOT NULL,
            keywords        TEXT NOT NULL DEFAULT '[]',
            content         TEXT NOT NULL,
            confidence      REAL NOT NULL,
            version         INTEGER NOT NULL DEFAULT 0,
            success_count   INTEGER NOT NULL DEFAULT 0,
            failure_count   INTEGER NOT NULL DEFAULT 0,
            updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_patterns_category ON graph_patterns(category);
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}
