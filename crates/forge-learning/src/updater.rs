//! FeedbackUpdater: record, then EMA update with compare-and-swap retry.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use forge_core::config::LearningConfig;
use forge_core::errors::{ForgeError, ForgeResult, LearningError, StoreError};
use forge_core::models::{Correction, DegradationEvent, Outcome};
use forge_core::traits::{ConfidenceUpdate, CorrectionStore, PatternStore, WriteMode};
use forge_core::Confidence;

/// What one correction did to the stores.
#[derive(Debug, Clone)]
pub struct FeedbackReport {
    /// Sequence number the correction history assigned.
    pub sequence: u64,
    /// Confidence written to the referenced pattern, if one was updated.
    pub confidence: Option<Confidence>,
    /// Compare-and-swap attempts made (0 when no pattern was touched).
    pub attempts: u32,
    pub degraded_to_lww: bool,
    pub degradation: Option<DegradationEvent>,
}

pub struct FeedbackUpdater {
    corrections: Arc<dyn CorrectionStore>,
    patterns: Option<Arc<dyn PatternStore>>,
    alpha: f64,
    max_attempts: u32,
}

impl FeedbackUpdater {
    pub fn new(
        corrections: Arc<dyn CorrectionStore>,
        patterns: Option<Arc<dyn PatternStore>>,
        config: &LearningConfig,
    ) -> Self {
        Self {
            corrections,
            patterns,
            alpha: config.ema_alpha,
            max_attempts: config.max_update_attempts.max(1),
        }
    }

    /// Record the correction, then update the referenced pattern.
    ///
    /// Write contention never fails the call: after `max_attempts` lost
    /// compare-and-swaps the update is forced with last-writer-wins.
    pub async fn apply(&self, correction: &Correction) -> ForgeResult<FeedbackReport> {
        let span = info_span!(
            "forge.feedback",
            fingerprint = %correction.fingerprint,
            node_type = %correction.node_type,
        );
        self.apply_inner(correction).instrument(span).await
    }

    async fn apply_inner(&self, correction: &Correction) -> ForgeResult<FeedbackReport> {
        if correction.fingerprint.trim().is_empty() {
            return Err(LearningError::InvalidCorrection {
                reason: "fingerprint is empty".to_string(),
            }
            .into());
        }

        let sequence = self.corrections.record(correction).await?;
        debug!(sequence, "correction recorded");

        let mut report = FeedbackReport {
            sequence,
            confidence: None,
            attempts: 0,
            degraded_to_lww: false,
            degradation: None,
        };

        let (Some(pattern_id), Some(patterns)) = (&correction.pattern_ref, &self.patterns) else {
            return Ok(report);
        };

        match self
            .update_confidence(patterns.as_ref(), pattern_id, correction.outcome, &mut report)
            .await
        {
            Ok(confidence) => {
                info!(
                    pattern_id = %pattern_id,
                    confidence = confidence.value(),
                    attempts = report.attempts,
                    "pattern confidence updated"
                );
                report.confidence = Some(confidence);
            }
            Err(ForgeError::Store(StoreError::PatternNotFound { .. })) => {
                warn!(pattern_id = %pattern_id, "correction references unknown pattern, confidence unchanged");
            }
            Err(e) => return Err(e),
        }
        Ok(report)
    }

    async fn update_confidence(
        &self,
        patterns: &dyn PatternStore,
        pattern_id: &str,
        outcome: Outcome,
        report: &mut FeedbackReport,
    ) -> ForgeResult<Confidence> {
        let mut update = ConfidenceUpdate {
            pattern_id: pattern_id.to_string(),
            outcome,
            alpha: self.alpha,
            mode: WriteMode::CompareAndSwap,
        };

        for attempt in 1..=self.max_attempts {
            report.attempts = attempt;
            match patterns.update(&update).await {
                Ok(confidence) => return Ok(confidence),
                Err(ForgeError::Store(StoreError::VersionConflict { expected, found, .. })) => {
                    debug!(pattern_id, attempt, expected, found, "confidence write lost a race, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            pattern_id,
            attempts = self.max_attempts,
            "confidence update still contended, falling back to last-writer-wins"
        );
        update.mode = WriteMode::LastWriterWins;
        let confidence = patterns.update(&update).await?;
        report.degraded_to_lww = true;
        report.degradation = Some(DegradationEvent::new(
            "feedback-updater",
            format!(
                "{} compare-and-swap attempts on {pattern_id} conflicted",
                self.max_attempts
            ),
            "last-writer-wins",
        ));
        Ok(confidence)
    }
}
