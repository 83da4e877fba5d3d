//! Correction history table.

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use forge_core::errors::ForgeResult;
use forge_core::models::{CandidateOrigin, Correction, Outcome, RetrievalCandidate, StoreQuery};
use forge_core::traits::{CorrectionStore, KnowledgeStore};

use super::{from_json, parse_category, to_json, SharedConnection};
use crate::memory::correction_history::correction_candidate;
use crate::to_store_err;

#[derive(Clone)]
pub struct SqliteCorrectionStore {
    conn: SharedConnection,
}

impl SqliteCorrectionStore {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> ForgeResult<u64> {
        self.conn.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM corrections", [], |row| row.get(0))
                .map_err(|e| to_store_err(e.to_string()))
        })
    }
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Success => "success",
        Outcome::Failure => "failure",
    }
}

#[async_trait]
impl KnowledgeStore for SqliteCorrectionStore {
    fn name(&self) -> &str {
        "correction-history"
    }

    fn origin(&self) -> CandidateOrigin {
        CandidateOrigin::CorrectionHistory
    }

    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        self.conn.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT seq, fingerprint, node_type, corrected_config, outcome, pattern_ref
                     FROM corrections
                     WHERE fingerprint = ?1 AND node_type = ?2
                     ORDER BY seq DESC",
                )
                .map_err(|e| to_store_err(e.to_string()))?;

            let mut out = Vec::new();
            for fingerprint in &query.fingerprints {
                let rows = stmt
                    .query_map(params![fingerprint, query.category.as_str()], |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, Option<String>>(5)?,
                        ))
                    })
                    .map_err(|e| to_store_err(e.to_string()))?;

                for row in rows {
                    let (seq, fp, node_type, config, outcome, pattern_ref) =
                        row.map_err(|e| to_store_err(e.to_string()))?;
                    let correction = Correction {
                        fingerprint: fp,
                        node_type: parse_category(&node_type),
                        corrected_config: from_json(&config)?,
                        outcome: Outcome::from(outcome == "success"),
                        pattern_ref,
                    };
                    out.push((seq, correction_candidate(&correction, seq as u64)));
                }
            }

            out.sort_by(|a, b| b.0.cmp(&a.0));
            out.truncate(query.limit);
            Ok(out.into_iter().map(|(_, c)| c).collect())
        })
    }
}

#[async_trait]
impl CorrectionStore for SqliteCorrectionStore {
    async fn record(&self, correction: &Correction) -> ForgeResult<u64> {
        let config = to_json(&correction.corrected_config)?;
        let seq = self.conn.with_conn(|conn| {
            conn.execute(
                "INSERT INTO corrections (fingerprint, node_type, corrected_config, outcome, pattern_ref)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    correction.fingerprint,
                    correction.node_type.as_str(),
                    config,
                    outcome_label(correction.outcome),
                    correction.pattern_ref,
                ],
            )
            .map_err(|e| to_store_err(e.to_string()))?;
            Ok(conn.last_insert_rowid() as u64)
        })?;
        debug!(fingerprint = %correction.fingerprint, seq, "correction persisted");
        Ok(seq)
    }
}
