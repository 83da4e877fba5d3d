//! Intent interpreter: bounded model call with a deterministic fallback.

use std::sync::Arc;

use tracing::{debug, info, warn};

use forge_core::config::InterpreterConfig;
use forge_core::errors::ForgeError;
use forge_core::models::{DegradationEvent, IntegrationIntent};
use forge_core::traits::{LanguageModel, ModelRequest};
use forge_core::{BoundedCall, CallFailure};

use crate::fallback::fallback_plan;
use crate::prompt::{build_prompt, build_strict_prompt, response_schema};
use crate::schema::parse_plan;

/// Result of interpreting one requirement. `intents` is never empty.
#[derive(Debug, Clone)]
pub struct Interpretation {
    pub intents: Vec<IntegrationIntent>,
    pub used_fallback: bool,
    /// Model attempts made (0 only if the policy allowed none).
    pub attempts: u32,
    pub degradation: Option<DegradationEvent>,
}

pub struct IntentInterpreter {
    model: Arc<dyn LanguageModel>,
    policy: BoundedCall,
    min_keyword_len: usize,
}

impl IntentInterpreter {
    pub fn new(model: Arc<dyn LanguageModel>, config: &InterpreterConfig) -> Self {
        Self {
            model,
            policy: BoundedCall::new(config.max_attempts, config.model_timeout()),
            min_keyword_len: config.fallback_min_keyword_len,
        }
    }

    pub fn policy(&self) -> BoundedCall {
        self.policy
    }

    /// Interpret `text`. Never fails: exhausted model attempts produce the
    /// fallback plan and a degradation event.
    pub async fn interpret(&self, text: &str, fingerprint: &str) -> Interpretation {
        let schema = response_schema();
        let model_name = self.model.name().to_string();

        let interpretation = self
            .policy
            .run_or_else(
                "intent-interpreter",
                |attempt| {
                    let request = ModelRequest {
                        prompt: if attempt == 1 {
                            build_prompt(text)
                        } else {
                            build_strict_prompt(text)
                        },
                        response_schema: schema.clone(),
                        attempt,
                    };
                    let model = Arc::clone(&self.model);
                    async move {
                        let raw = model.complete(&request).await?;
                        let intents = parse_plan(&raw, text, fingerprint)?;
                        Ok::<_, ForgeError>(Interpretation {
                            intents,
                            used_fallback: false,
                            attempts: attempt,
                            degradation: None,
                        })
                    }
                },
                |failure| self.keyword_fallback(text, fingerprint, &model_name, failure),
            )
            .await;

        if !interpretation.used_fallback {
            info!(
                model = %model_name,
                attempts = interpretation.attempts,
                intents = interpretation.intents.len(),
                "intent plan accepted"
            );
            for (i, intent) in interpretation.intents.iter().enumerate() {
                debug!(index = i, category = %intent.category, keywords = ?intent.keywords, "intent");
            }
        }
        interpretation
    }

    fn keyword_fallback(
        &self,
        text: &str,
        fingerprint: &str,
        model_name: &str,
        failure: CallFailure,
    ) -> Interpretation {
        warn!(
            model = %model_name,
            attempts = failure.attempts,
            error = %failure.last_error,
            "model plan rejected, using keyword fallback"
        );
        Interpretation {
            intents: fallback_plan(text, fingerprint, self.min_keyword_len),
            used_fallback: true,
            attempts: failure.attempts,
            degradation: Some(DegradationEvent::new(
                "intent-interpreter",
                failure.to_string(),
                "keyword-fallback",
            )),
        }
    }
}

impl std::fmt::Debug for IntentInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentInterpreter")
            .field("model", &self.model.name())
            .field("policy", &self.policy)
            .finish()
    }
}
