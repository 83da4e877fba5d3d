//! HybridRetriever: fan-out, filter, merge for one or many intents.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, info_span, Instrument};

use forge_core::config::RetrievalConfig;
use forge_core::models::{DegradationEvent, IntegrationIntent, RetrievalCandidate, StoreQuery};
use forge_core::traits::KnowledgeStore;
use forge_core::BoundedCall;

use crate::{fan_out, filter, merge};

/// Ranked candidates for one intent plus any stores that were skipped.
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    pub candidates: Vec<RetrievalCandidate>,
    pub degradations: Vec<DegradationEvent>,
}

impl Retrieval {
    pub fn top(&self) -> Option<&RetrievalCandidate> {
        self.candidates.first()
    }
}

/// Request-level lookup keys shared by every intent of one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestKeys<'a> {
    pub prior_corrections_ref: Option<&'a str>,
    pub canonical_pattern_id: Option<&'a str>,
}

pub struct HybridRetriever {
    stores: Vec<Arc<dyn KnowledgeStore>>,
    config: RetrievalConfig,
    policy: BoundedCall,
}

impl HybridRetriever {
    /// Retriever with no stores. Each store query gets one attempt bounded
    /// by `config.store_timeout_ms`.
    pub fn new(config: RetrievalConfig) -> Self {
        let policy = BoundedCall::single(config.store_timeout());
        Self {
            stores: Vec::new(),
            config,
            policy,
        }
    }

    /// Register a store. Every registered store is queried for each intent.
    pub fn with_store(mut self, store: Arc<dyn KnowledgeStore>) -> Self {
        self.stores.push(store);
        self
    }

    /// Register a store on an existing retriever.
    pub fn add_store(&mut self, store: Arc<dyn KnowledgeStore>) {
        self.stores.push(store);
    }

    /// Names of the registered stores, in registration order.
    pub fn store_names(&self) -> Vec<&str> {
        self.stores.iter().map(|s| s.name()).collect()
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Build the store key for an intent.
    pub fn query_for(&self, intent: &IntegrationIntent, keys: RequestKeys<'_>) -> StoreQuery {
        StoreQuery::for_intent(intent, self.config.per_store_limit)
            .with_prior_corrections(keys.prior_corrections_ref)
            .with_canonical_pattern(keys.canonical_pattern_id)
    }

    /// Run one query against every store and merge the results.
    pub async fn retrieve(&self, query: &StoreQuery) -> Retrieval {
        let raw = fan_out::query_all(&self.stores, query, self.policy).await;
        let raw_count = raw.candidates.len();
        let accepted = filter::apply_thresholds(raw.candidates, &self.config);
        let accepted_count = accepted.len();
        let candidates = merge::merge_candidates(accepted, self.config.candidate_cap);

        debug!(
            category = %query.category,
            raw = raw_count,
            accepted = accepted_count,
            merged = candidates.len(),
            skipped_stores = raw.degradations.len(),
            "retrieval merged"
        );

        Retrieval {
            candidates,
            degradations: raw.degradations,
        }
    }

    pub async fn retrieve_for(
        &self,
        intent: &IntegrationIntent,
        keys: RequestKeys<'_>,
    ) -> Retrieval {
        self.retrieve(&self.query_for(intent, keys)).await
    }

    /// Retrieve for every intent concurrently. Output order matches input.
    pub async fn retrieve_all(
        &self,
        intents: &[IntegrationIntent],
        keys: RequestKeys<'_>,
    ) -> Vec<Retrieval> {
        let per_intent = intents.iter().enumerate().map(|(index, intent)| {
            self.retrieve_for(intent, keys)
                .instrument(info_span!("forge.retrieve.intent", index, category = %intent.category))
        });
        let results = join_all(per_intent).await;

        info!(
            intents = intents.len(),
            candidates = results.iter().map(|r| r.candidates.len()).sum::<usize>(),
            degraded = results.iter().map(|r| r.degradations.len()).sum::<usize>(),
            "retrieval complete"
        );
        results
    }
}

impl std::fmt::Debug for HybridRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridRetriever")
            .field("stores", &self.store_names())
            .field("config", &self.config)
            .finish()
    }
}
