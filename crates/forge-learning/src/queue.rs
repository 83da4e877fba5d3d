//! Event queue decoupling feedback ingress from the updater.
//!
//! `submit` only enqueues and acknowledges; a single worker task applies
//! events in arrival order. Synthesis requests never wait on it.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use forge_core::errors::LearningError;
use forge_core::models::Correction;

use crate::updater::FeedbackUpdater;

/// Acknowledgement for an accepted feedback event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub event_id: Uuid,
}

/// Totals reported when the queue shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackStats {
    pub processed: u64,
    pub failed: u64,
    pub lww_fallbacks: u64,
}

struct FeedbackEvent {
    id: Uuid,
    correction: Correction,
}

pub struct FeedbackQueue {
    sender: mpsc::Sender<FeedbackEvent>,
    worker: JoinHandle<FeedbackStats>,
    capacity: usize,
}

impl FeedbackQueue {
    /// Spawn the worker on the current tokio runtime.
    pub fn start(updater: Arc<FeedbackUpdater>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let worker = tokio::spawn(run_worker(updater, receiver));
        info!(capacity, "feedback queue started");
        Self {
            sender,
            worker,
            capacity,
        }
    }

    /// Enqueue a correction without waiting for it to be applied.
    pub fn submit(&self, correction: Correction) -> Result<Ack, LearningError> {
        let id = Uuid::new_v4();
        self.sender
            .try_send(FeedbackEvent { id, correction })
            .map_err(|e| match e {
                TrySendError::Full(_) => LearningError::QueueFull {
                    capacity: self.capacity,
                },
                TrySendError::Closed(_) => LearningError::QueueClosed,
            })?;
        Ok(Ack { event_id: id })
    }

    /// Events waiting for the worker.
    pub fn pending(&self) -> usize {
        self.capacity.saturating_sub(self.sender.capacity())
    }

    /// Stop accepting events, drain what is queued, and return the totals.
    pub async fn shutdown(self) -> FeedbackStats {
        drop(self.sender);
        match self.worker.await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "feedback worker did not finish cleanly");
                FeedbackStats::default()
            }
        }
    }
}

async fn run_worker(
    updater: Arc<FeedbackUpdater>,
    mut receiver: mpsc::Receiver<FeedbackEvent>,
) -> FeedbackStats {
    let mut stats = FeedbackStats::default();
    while let Some(event) = receiver.recv().await {
        match updater.apply(&event.correction).await {
            Ok(report) => {
                stats.processed += 1;
                if report.degraded_to_lww {
                    stats.lww_fallbacks += 1;
                }
            }
            Err(e) => {
                stats.failed += 1;
                warn!(event_id = %event.id, error = %e, "feedback event failed");
            }
        }
    }
    info!(
        processed = stats.processed,
        failed = stats.failed,
        lww_fallbacks = stats.lww_fallbacks,
        "feedback queue drained"
    );
    stats
}
