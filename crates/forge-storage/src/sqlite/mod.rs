//! SQLite persistence for the two mutable stores: correction history and
//! graph patterns. One write connection guarded by a mutex; both store
//! handles share it.

pub mod corrections;
pub mod migrations;
pub mod patterns;
pub mod pragmas;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use forge_core::errors::ForgeResult;
use forge_core::models::IntentCategory;

pub use corrections::SqliteCorrectionStore;
pub use patterns::SqlitePatternStore;

use crate::to_store_err;

#[derive(Clone)]
pub(crate) struct SharedConnection {
    inner: Arc<Mutex<Connection>>,
}

impl SharedConnection {
    pub(crate) fn with_conn<F, T>(&self, f: F) -> ForgeResult<T>
    where
        F: FnOnce(&Connection) -> ForgeResult<T>,
    {
        let guard = self
            .inner
            .lock()
            .map_err(|e| to_store_err(format!("connection lock poisoned: {e}")))?;
        f(&guard)
    }
}

/// Owns the connection and hands out typed store handles.
#[derive(Clone)]
pub struct SqliteKnowledgeStore {
    conn: SharedConnection,
}

impl SqliteKnowledgeStore {
    /// Open (or create) a database file and bring its schema up to date.
    pub fn open(path: &Path) -> ForgeResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_store_err(e.to_string()))?;
        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), "sqlite knowledge store opened");
        Ok(store)
    }

    /// Private in-memory database (for testing).
    pub fn open_in_memory() -> ForgeResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_store_err(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> ForgeResult<Self> {
        pragmas::apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: SharedConnection {
                inner: Arc::new(Mutex::new(conn)),
            },
        })
    }

    pub fn corrections(&self) -> SqliteCorrectionStore {
        SqliteCorrectionStore::new(self.conn.clone())
    }

    pub fn patterns(&self) -> SqlitePatternStore {
        SqlitePatternStore::new(self.conn.clone())
    }

    pub fn schema_version(&self) -> ForgeResult<u32> {
        self.conn.with_conn(migrations::current_version)
    }

    pub fn is_wal(&self) -> ForgeResult<bool> {
        self.conn.with_conn(pragmas::verify_wal_mode)
    }
}

impl std::fmt::Debug for SqliteKnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteKnowledgeStore").finish_non_exhaustive()
    }
}

/// Categories are stored by their kebab-case label.
pub(crate) fn parse_category(label: &str) -> IntentCategory {
    IntentCategory::from_label(label).unwrap_or(IntentCategory::Unknown)
}

pub(crate) fn to_json(value: &impl serde::Serialize) -> ForgeResult<String> {
    serde_json::to_string(value).map_err(|e| {
        forge_core::errors::StoreError::Serialization {
            message: e.to_string(),
        }
        .into()
    })
}

pub(crate) fn from_json<T: serde::de::DeserializeOwned>(text: &str) -> ForgeResult<T> {
    serde_json::from_str(text).map_err(|e| {
        forge_core::errors::StoreError::Serialization {
            message: e.to_string(),
        }
        .into()
    })
}
