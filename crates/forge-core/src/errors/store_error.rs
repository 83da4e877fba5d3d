/// Knowledge-store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store {store} unavailable: {reason}")]
    Unavailable { store: String, reason: String },

    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("pattern not found: {pattern_id}")]
    PatternNotFound { pattern_id: String },

    #[error("write conflict on {pattern_id}: expected version {expected}, found {found}")]
    VersionConflict {
        pattern_id: String,
        expected: u64,
        found: u64,
    },

    #[error("serialization error: {message}")]
    Serialization { message: String },
}
