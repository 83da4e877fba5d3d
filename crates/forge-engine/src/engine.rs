//! SynthesisEngine: the request pipeline.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use forge_core::errors::{ForgeError, ForgeResult};
use forge_core::models::{
    DegradationEvent, IntegrationIntent, ProvenanceSummary, RetrievalCandidate,
    SynthesisOutput, SynthesisRequest,
};
use forge_core::traits::{CorrectionStore, KnowledgeStore, LanguageModel, PatternStore};
use forge_core::{CancellationToken, ForgeConfig};
use forge_graph::{ConsistencyValidator, GraphAssembler};
use forge_intent::IntentInterpreter;
use forge_learning::{FeedbackQueue, FeedbackUpdater};
use forge_retrieval::{HybridRetriever, RequestKeys};
use forge_synthesis::ComponentSynthesizer;

use crate::builder::SynthesisEngineBuilder;
use crate::telemetry::names;
use crate::{assemble_span, interpret_span, retrieve_span, synthesize_span, validate_span};

pub struct SynthesisEngine {
    interpreter: IntentInterpreter,
    retriever: HybridRetriever,
    synthesizer: ComponentSynthesizer,
    assembler: GraphAssembler,
    validator: ConsistencyValidator,
    corrections: Option<Arc<dyn CorrectionStore>>,
    patterns: Option<Arc<dyn PatternStore>>,
    config: ForgeConfig,
}

impl SynthesisEngine {
    pub fn builder() -> SynthesisEngineBuilder {
        SynthesisEngineBuilder::new()
    }

    pub(crate) fn new(
        model: Arc<dyn LanguageModel>,
        config: ForgeConfig,
        stores: Vec<Arc<dyn KnowledgeStore>>,
        corrections: Option<Arc<dyn CorrectionStore>>,
        patterns: Option<Arc<dyn PatternStore>>,
    ) -> Self {
        let mut retriever = HybridRetriever::new(config.retrieval.clone());
        for store in stores {
            retriever.add_store(store);
        }
        Self {
            interpreter: IntentInterpreter::new(model, &config.interpreter),
            retriever,
            synthesizer: ComponentSynthesizer::new(),
            assembler: GraphAssembler::new(),
            validator: ConsistencyValidator::new(),
            corrections,
            patterns,
            config,
        }
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Updater writing to this engine's correction and pattern stores.
    /// `None` when no correction store was configured.
    pub fn feedback_updater(&self) -> Option<FeedbackUpdater> {
        let corrections = self.corrections.clone()?;
        Some(FeedbackUpdater::new(
            corrections,
            self.patterns.clone(),
            &self.config.learning,
        ))
    }

    /// Start a feedback queue over [`feedback_updater`](Self::feedback_updater).
    pub fn feedback_queue(&self) -> Option<FeedbackQueue> {
        let updater = self.feedback_updater()?;
        Some(FeedbackQueue::start(
            Arc::new(updater),
            self.config.learning.queue_capacity,
        ))
    }

    /// Synthesize a flow graph from a textual requirement.
    ///
    /// All-or-nothing: a cancelled or failed request returns an error and no
    /// partial graph.
    pub async fn synthesize(
        &self,
        request: &SynthesisRequest,
        cancel: &CancellationToken,
    ) -> ForgeResult<SynthesisOutput> {
        let span = info_span!(names::REQUEST, fingerprint = %request.source_fingerprint);
        self.interpret_and_run(request, cancel).instrument(span).await
    }

    /// Synthesize from a caller-supplied plan, skipping interpretation.
    /// Intents outside the vocabulary become placeholder nodes.
    pub async fn synthesize_intents(
        &self,
        intents: &[IntegrationIntent],
        request: &SynthesisRequest,
        cancel: &CancellationToken,
    ) -> ForgeResult<SynthesisOutput> {
        check(cancel)?;
        let span = info_span!(names::REQUEST, fingerprint = %request.source_fingerprint);
        self.run(intents, request, cancel, Vec::new(), false)
            .instrument(span)
            .await
    }

    async fn interpret_and_run(
        &self,
        request: &SynthesisRequest,
        cancel: &CancellationToken,
    ) -> ForgeResult<SynthesisOutput> {
        check(cancel)?;
        let interpretation = self
            .interpreter
            .interpret(&request.intent_text, &request.source_fingerprint)
            .instrument(interpret_span!(request.source_fingerprint))
            .await;
        check(cancel)?;

        let degradations: Vec<DegradationEvent> = interpretation.degradation.into_iter().collect();
        self.run(
            &interpretation.intents,
            request,
            cancel,
            degradations,
            interpretation.used_fallback,
        )
        .await
    }

    async fn run(
        &self,
        intents: &[IntegrationIntent],
        request: &SynthesisRequest,
        cancel: &CancellationToken,
        mut degradations: Vec<DegradationEvent>,
        used_fallback_plan: bool,
    ) -> ForgeResult<SynthesisOutput> {
        let keys = RequestKeys {
            prior_corrections_ref: request.prior_corrections_ref.as_deref(),
            canonical_pattern_id: request.canonical_pattern_id.as_deref(),
        };
        let retrievals = self
            .retriever
            .retrieve_all(intents, keys)
            .instrument(retrieve_span!(intents.len()))
            .await;
        check(cancel)?;

        let mut candidates: Vec<Vec<RetrievalCandidate>> = Vec::with_capacity(retrievals.len());
        for retrieval in retrievals {
            degradations.extend(retrieval.degradations);
            candidates.push(retrieval.candidates);
        }

        let synthesis = synthesize_span!(intents.len())
            .in_scope(|| self.synthesizer.synthesize_all(intents, &candidates))?;
        degradations.extend(synthesis.degradations);

        let graph = assemble_span!(synthesis.groups.len())
            .in_scope(|| self.assembler.assemble(&synthesis.groups));
        let report = validate_span!(graph.nodes.len())
            .in_scope(|| self.validator.validate(graph))?;
        check(cancel)?;

        let summary = ProvenanceSummary::from_graph(&report.graph);
        info!(
            nodes = report.graph.nodes.len(),
            edges = report.graph.edges.len(),
            template = summary.template_count,
            retrieved = summary.retrieved_count,
            corrected = summary.corrected_count,
            repairs = report.issues.len(),
            degradations = degradations.len(),
            fallback = used_fallback_plan,
            "synthesis complete"
        );
        Ok(SynthesisOutput {
            graph: report.graph,
            summary,
            issues: report.issues,
            degradations,
            used_fallback_plan,
        })
    }
}

fn check(cancel: &CancellationToken) -> Result<(), ForgeError> {
    if cancel.is_cancelled() {
        return Err(ForgeError::Cancelled);
    }
    Ok(())
}

impl std::fmt::Debug for SynthesisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisEngine")
            .field("interpreter", &self.interpreter)
            .field("retriever", &self.retriever)
            .finish()
    }
}
