//! Graph-pattern table with a version column for compare-and-swap writes.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use forge_core::errors::{ForgeResult, StoreError};
use forge_core::models::{CandidateOrigin, Outcome, RetrievalCandidate, StoreQuery};
use forge_core::traits::{ConfidenceUpdate, KnowledgeStore, PatternStore, WriteMode};
use forge_core::Confidence;

use super::{from_json, parse_category, to_json, SharedConnection};
use crate::memory::graph_patterns::pattern_candidate;
use crate::memory::PatternEntry;
use crate::to_store_err;

#[derive(Clone)]
pub struct SqlitePatternStore {
    conn: SharedConnection,
}

const SELECT_COLUMNS: &str =
    "SELECT id, category, keywords, content, confidence, version, success_count, failure_count
     FROM graph_patterns";

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<(PatternEntry, String, String)> {
    let category: String = row.get(1)?;
    let keywords: String = row.get(2)?;
    let content: String = row.get(3)?;
    let entry = PatternEntry {
        id: row.get(0)?,
        category: parse_category(&category),
        keywords: Vec::new(),
        content: serde_json::Value::Null,
        confidence: Confidence::new(row.get(4)?),
        version: row.get::<_, i64>(5)? as u64,
        success_count: row.get::<_, i64>(6)? as u64,
        failure_count: row.get::<_, i64>(7)? as u64,
    };
    Ok((entry, keywords, content))
}

fn hydrate((mut entry, keywords, content): (PatternEntry, String, String)) -> ForgeResult<PatternEntry> {
    entry.keywords = from_json(&keywords)?;
    entry.content = from_json(&content)?;
    Ok(entry)
}

fn load(conn: &Connection, pattern_id: &str) -> ForgeResult<Option<PatternEntry>> {
    let raw = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [pattern_id],
            row_to_entry,
        )
        .optional()
        .map_err(|e| to_store_err(e.to_string()))?;
    raw.map(hydrate).transpose()
}

impl SqlitePatternStore {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Insert or replace a pattern.
    pub fn upsert(&self, entry: &PatternEntry) -> ForgeResult<()> {
        let keywords = to_json(&entry.keywords)?;
        let content = to_json(&entry.content)?;
        self.conn.with_conn(|conn| {
            conn.execute(
                "INSERT INTO graph_patterns
                    (id, category, keywords, content, confidence, version, success_count, failure_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                    category = excluded.category,
                    keywords = excluded.keywords,
                    content = excluded.content,
                    confidence = excluded.confidence,
                    version = excluded.version,
                    success_count = excluded.success_count,
                    failure_count = excluded.failure_count",
                params![
                    entry.id,
                    entry.category.as_str(),
                    keywords,
                    content,
                    entry.confidence.value(),
                    entry.version as i64,
                    entry.success_count as i64,
                    entry.failure_count as i64,
                ],
            )
            .map_err(|e| to_store_err(e.to_string()))?;
            Ok(())
        })
    }

    pub fn get(&self, pattern_id: &str) -> ForgeResult<Option<PatternEntry>> {
        self.conn.with_conn(|conn| load(conn, pattern_id))
    }
}

fn write(
    conn: &Connection,
    pattern_id: &str,
    confidence: Confidence,
    outcome: Outcome,
    expected_version: Option<u64>,
) -> ForgeResult<usize> {
    let (success, failure) = match outcome {
        Outcome::Success => (1, 0),
        Outcome::Failure => (0, 1),
    };
    let changed = match expected_version {
        Some(expected) => conn.execute(
            "UPDATE graph_patterns
             SET confidence = ?1, version = version + 1,
                 success_count = success_count + ?2, failure_count = failure_count + ?3,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?4 AND version = ?5",
            params![confidence.value(), success, failure, pattern_id, expected as i64],
        ),
        None => conn.execute(
            "UPDATE graph_patterns
             SET confidence = ?1, version = version + 1,
                 success_count = success_count + ?2, failure_count = failure_count + ?3,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?4",
            params![confidence.value(), success, failure, pattern_id],
        ),
    };
    changed.map_err(|e| to_store_err(e.to_string()))
}

#[async_trait]
impl KnowledgeStore for SqlitePatternStore {
    fn name(&self) -> &str {
        "graph-patterns"
    }

    fn origin(&self) -> CandidateOrigin {
        CandidateOrigin::GraphPattern
    }

    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        let entries = self.conn.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("{SELECT_COLUMNS} WHERE category = ?1 ORDER BY id"))
                .map_err(|e| to_store_err(e.to_string()))?;
            let rows = stmt
                .query_map([query.category.as_str()], row_to_entry)
                .map_err(|e| to_store_err(e.to_string()))?;
            rows.map(|r| r.map_err(|e| to_store_err(e.to_string())).and_then(hydrate))
                .collect::<ForgeResult<Vec<_>>>()
        })?;

        let scored: Vec<(String, RetrievalCandidate)> = entries
            .iter()
            .map(|e| (e.id.clone(), pattern_candidate(e, query)))
            .collect();
        Ok(crate::memory::sort_and_truncate(scored, query.limit))
    }
}

#[async_trait]
impl PatternStore for SqlitePatternStore {
    async fn update(&self, update: &ConfidenceUpdate) -> ForgeResult<Confidence> {
        let id = update.pattern_id.as_str();
        let written = self.conn.with_conn(|conn| {
            let current = load(conn, id)?.ok_or_else(|| StoreError::PatternNotFound {
                pattern_id: id.to_string(),
            })?;
            let new = current.confidence.ema(update.outcome.value(), update.alpha);
            let expected = match update.mode {
                WriteMode::CompareAndSwap => Some(current.version),
                WriteMode::LastWriterWins => None,
            };
            if write(conn, id, new, update.outcome, expected)? == 0 {
                let found = load(conn, id)?.map(|e| e.version).unwrap_or_default();
                return Err(StoreError::VersionConflict {
                    pattern_id: id.to_string(),
                    expected: current.version,
                    found,
                }
                .into());
            }
            Ok(new)
        })?;
        debug!(pattern_id = id, confidence = %written, "pattern confidence persisted");
        Ok(written)
    }
}
