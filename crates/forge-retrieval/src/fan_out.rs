//! Concurrent per-store queries, each under its own timeout.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use forge_core::models::{DegradationEvent, RetrievalCandidate, StoreQuery};
use forge_core::traits::KnowledgeStore;
use forge_core::BoundedCall;

/// Raw results from one fan-out, in store registration order.
#[derive(Debug, Default)]
pub struct FanOutResult {
    pub candidates: Vec<RetrievalCandidate>,
    pub degradations: Vec<DegradationEvent>,
}

/// Query every store concurrently. Failed or timed-out stores are logged and
/// omitted. Each candidate's origin is stamped from the store that returned it.
pub async fn query_all(
    stores: &[Arc<dyn KnowledgeStore>],
    query: &StoreQuery,
    policy: BoundedCall,
) -> FanOutResult {
    let calls = stores.iter().map(|store| async move {
        let result = policy.run(store.name(), |_| store.query(query)).await;
        (store, result)
    });

    let mut out = FanOutResult::default();
    for (store, result) in join_all(calls).await {
        match result {
            Ok(mut candidates) => {
                let origin = store.origin();
                debug!(store = store.name(), hits = candidates.len(), "store answered");
                for c in &mut candidates {
                    c.origin = origin;
                }
                out.candidates.extend(candidates);
            }
            Err(failure) => {
                warn!(
                    store = store.name(),
                    timed_out = failure.timed_out(),
                    error = %failure.last_error,
                    "store omitted from retrieval"
                );
                out.degradations.push(DegradationEvent::new(
                    format!("retrieval/{}", store.name()),
                    failure.last_error.to_string(),
                    "omit-store",
                ));
            }
        }
    }
    out
}
