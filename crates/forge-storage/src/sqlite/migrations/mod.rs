//! Schema migrations, applied in order and recorded in `schema_version`.

mod v001_initial;

use rusqlite::Connection;
use tracing::info;

use forge_core::errors::{ForgeResult, StoreError};

use crate::to_store_err;

type Migration = fn(&Connection) -> ForgeResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[(1, v001_initial::migrate)];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

pub fn current_version(conn: &Connection) -> ForgeResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_store_err(e.to_string()))
}

/// Apply every migration newer than the recorded version.
pub fn run_migrations(conn: &Connection) -> ForgeResult<u32> {
    let mut version = current_version(conn)?;
    for (target, migrate) in MIGRATIONS {
        if *target <= version {
            continue;
        }
        migrate(conn).map_err(|e| StoreError::MigrationFailed {
            version: *target,
            reason: e.to_string(),
        })?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [target])
            .map_err(|e| to_store_err(e.to_string()))?;
        info!(version = target, "applied migration");
        version = *target;
    }
    Ok(version)
}
