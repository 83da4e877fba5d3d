//! ComponentSynthesizer: intent + ranked candidates -> component group.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use forge_core::errors::SynthesisError;
use forge_core::models::{
    ComponentSpec, ComponentType, DegradationEvent, IntegrationIntent, IntentCategory,
    Provenance, RetrievalCandidate,
};

use crate::extract;
use crate::group::{BranchArm, ComponentGroup, GroupShape};
use crate::ids::{correlation_id, node_id, order, MAX_NODES_PER_INTENT};
use crate::template::{as_object, default_config, substitute, Bindings};

/// Condition label of the mandatory default arm.
pub const DEFAULT_ARM: &str = "otherwise";

/// Explicit conditions kept per branch. The decision node and the default
/// arm take the remaining two node slots of the intent.
pub const MAX_BRANCH_CONDITIONS: usize = MAX_NODES_PER_INTENT - 2;

/// Groups for a whole plan, in intent order.
#[derive(Debug, Clone, Default)]
pub struct Synthesis {
    pub groups: Vec<ComponentGroup>,
    pub degradations: Vec<DegradationEvent>,
}

impl Synthesis {
    pub fn node_count(&self) -> usize {
        self.groups.iter().map(|g| g.nodes.len()).sum()
    }
}

/// Stateless; every output is a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentSynthesizer;

struct Grounding<'a> {
    candidate: Option<&'a RetrievalCandidate>,
    provenance: Provenance,
    bindings: Bindings,
}

impl<'a> Grounding<'a> {
    fn new(intent: &IntegrationIntent, candidates: &'a [RetrievalCandidate]) -> Self {
        let candidate = candidates
            .iter()
            .find(|c| c.node_type == intent.category)
            .or_else(|| candidates.first());
        Self {
            candidate,
            provenance: Provenance::from_origin(candidate.map(|c| c.origin)),
            bindings: Bindings::from_intent(intent),
        }
    }

    /// Candidate content (or one named section of it) with placeholders filled.
    fn config(&self, component_type: ComponentType, section: Option<&str>) -> Map<String, Value> {
        let source = match (self.candidate, section) {
            (Some(c), Some(key)) => c
                .content
                .get(key)
                .filter(|v| v.is_object())
                .cloned()
                .or_else(|| (component_type == ComponentType::Invocation).then(|| c.content.clone())),
            (Some(c), None) => Some(c.content.clone()),
            (None, _) => None,
        };
        let raw = source.unwrap_or_else(|| default_config(component_type));
        let mut config = as_object(&substitute(&raw, &self.bindings));
        if let Some(c) = self.candidate {
            let mut grounding = Map::new();
            grounding.insert("origin".into(), json!(c.origin.as_str()));
            if let Some(reference) = &c.reference {
                grounding.insert("reference".into(), json!(reference));
            }
            config.insert("grounding".into(), Value::Object(grounding));
        }
        config
    }
}

fn spec(
    intent_index: usize,
    node_index: usize,
    component_type: ComponentType,
    intent: &IntegrationIntent,
    config: Map<String, Value>,
    provenance: Provenance,
    correlation: Option<&str>,
) -> ComponentSpec {
    let name = match intent.keywords.first() {
        Some(k) => format!("{component_type}-{k}"),
        None => component_type.as_str().to_string(),
    };
    ComponentSpec {
        id: node_id(intent_index, node_index),
        component_type,
        name,
        config: Value::Object(config),
        provenance,
        order: order(intent_index, node_index),
        intent_index,
        correlation_id: correlation.map(str::to_string),
    }
}

impl ComponentSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Expand one intent. The degradation event is set only for placeholder
    /// nodes emitted for categories outside the vocabulary.
    pub fn synthesize(
        &self,
        intent_index: usize,
        intent: &IntegrationIntent,
        candidates: &[RetrievalCandidate],
    ) -> (ComponentGroup, Option<DegradationEvent>) {
        let grounding = Grounding::new(intent, candidates);
        let group = match intent.category {
            IntentCategory::Trigger => self.single(intent_index, intent, &grounding, ComponentType::Trigger),
            IntentCategory::Transform => self.single(intent_index, intent, &grounding, ComponentType::Transform),
            IntentCategory::ErrorHandler => {
                self.single(intent_index, intent, &grounding, ComponentType::ErrorHandler)
            }
            IntentCategory::Terminal => self.single(intent_index, intent, &grounding, ComponentType::Terminal),
            IntentCategory::ExternalCall => self.trio(intent_index, intent, &grounding),
            IntentCategory::ConditionalBranch => self.branch(intent_index, intent, &grounding),
            IntentCategory::Unknown => {
                warn!(
                    intent_index,
                    text = %intent.raw_text,
                    "unknown intent category, emitting placeholder node"
                );
                let node = spec(
                    intent_index,
                    0,
                    ComponentType::Placeholder,
                    intent,
                    as_object(&substitute(
                        &default_config(ComponentType::Placeholder),
                        &grounding.bindings,
                    )),
                    Provenance::Template,
                    None,
                );
                let event = DegradationEvent::new(
                    "synthesis",
                    format!("unknown intent category at index {intent_index}"),
                    "placeholder-node",
                );
                return (
                    ComponentGroup {
                        intent_index,
                        category: intent.category,
                        shape: GroupShape::Single {
                            node: node.id.clone(),
                        },
                        nodes: vec![node],
                    },
                    Some(event),
                );
            }
        };

        debug!(
            intent_index,
            category = %intent.category,
            nodes = group.nodes.len(),
            provenance = ?grounding.provenance,
            "intent expanded"
        );
        (group, None)
    }

    /// Expand a whole plan. `candidates[i]` grounds `intents[i]`; a missing
    /// entry means no candidates.
    pub fn synthesize_all(
        &self,
        intents: &[IntegrationIntent],
        candidates: &[Vec<RetrievalCandidate>],
    ) -> Result<Synthesis, SynthesisError> {
        if intents.is_empty() {
            return Err(SynthesisError::EmptyPlan);
        }
        let mut out = Synthesis::default();
        for (index, intent) in intents.iter().enumerate() {
            let ranked = candidates.get(index).map(Vec::as_slice).unwrap_or(&[]);
            let (group, degradation) = self.synthesize(index, intent, ranked);
            out.groups.push(group);
            out.degradations.extend(degradation);
        }
        Ok(out)
    }

    fn single(
        &self,
        intent_index: usize,
        intent: &IntegrationIntent,
        grounding: &Grounding<'_>,
        component_type: ComponentType,
    ) -> ComponentGroup {
        let node = spec(
            intent_index,
            0,
            component_type,
            intent,
            grounding.config(component_type, None),
            grounding.provenance,
            None,
        );
        ComponentGroup {
            intent_index,
            category: intent.category,
            shape: GroupShape::Single {
                node: node.id.clone(),
            },
            nodes: vec![node],
        }
    }

    fn trio(
        &self,
        intent_index: usize,
        intent: &IntegrationIntent,
        grounding: &Grounding<'_>,
    ) -> ComponentGroup {
        let correlation = correlation_id(intent_index);
        let invocation_id = node_id(intent_index, 0);
        let channel_id = node_id(intent_index, 1);
        let endpoint_id = node_id(intent_index, 2);

        let mut invocation = grounding.config(ComponentType::Invocation, Some("invocation"));
        invocation.insert("channel".into(), json!(channel_id));

        let mut channel = grounding.config(ComponentType::Channel, Some("channel"));
        channel.insert("source".into(), json!(invocation_id));
        channel.insert("target".into(), json!(endpoint_id));

        let mut endpoint = grounding.config(ComponentType::Endpoint, Some("endpoint"));
        endpoint.insert("channel".into(), json!(channel_id));

        let nodes = vec![
            spec(intent_index, 0, ComponentType::Invocation, intent, invocation, grounding.provenance, Some(&correlation)),
            spec(intent_index, 1, ComponentType::Channel, intent, channel, grounding.provenance, Some(&correlation)),
            spec(intent_index, 2, ComponentType::Endpoint, intent, endpoint, grounding.provenance, Some(&correlation)),
        ];
        ComponentGroup {
            intent_index,
            category: intent.category,
            shape: GroupShape::Trio {
                invocation: invocation_id,
                channel: channel_id,
                endpoint: endpoint_id,
            },
            nodes,
        }
    }

    fn branch(
        &self,
        intent_index: usize,
        intent: &IntegrationIntent,
        grounding: &Grounding<'_>,
    ) -> ComponentGroup {
        let correlation = correlation_id(intent_index);
        let conditions = branch_conditions(intent, grounding.candidate);

        let mut decision_config = grounding.config(ComponentType::Decision, None);
        decision_config.insert("conditions".into(), json!(conditions));
        decision_config.insert("default".into(), json!(DEFAULT_ARM));
        let decision = spec(
            intent_index,
            0,
            ComponentType::Decision,
            intent,
            decision_config,
            grounding.provenance,
            Some(&correlation),
        );

        let labelled = conditions
            .iter()
            .map(|c| (c.as_str(), false))
            .chain(std::iter::once((DEFAULT_ARM, true)));

        let mut nodes = vec![decision];
        let mut arms = Vec::new();
        for (offset, (condition, is_default)) in labelled.enumerate() {
            let mut config = as_object(&default_config(ComponentType::Route));
            config.insert("condition".into(), json!(condition));
            config.insert("default".into(), json!(is_default));
            let node = spec(
                intent_index,
                offset + 1,
                ComponentType::Route,
                intent,
                config,
                grounding.provenance,
                Some(&correlation),
            );
            arms.push(BranchArm {
                node: node.id.clone(),
                condition: condition.to_string(),
                is_default,
            });
            nodes.push(node);
        }

        ComponentGroup {
            intent_index,
            category: intent.category,
            shape: GroupShape::Branch {
                decision: nodes[0].id.clone(),
                arms,
            },
            nodes,
        }
    }
}

/// Explicit conditions: `if`/`when` clauses of the intent text, else the
/// candidate's `conditions` array. The default arm is never listed here.
fn branch_conditions(intent: &IntegrationIntent, candidate: Option<&RetrievalCandidate>) -> Vec<String> {
    let from_text = extract::conditions(&intent.raw_text);
    let found = if from_text.is_empty() {
        candidate
            .and_then(|c| c.content.get("conditions"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    } else {
        from_text
    };
    let mut conditions: Vec<String> = found
        .into_iter()
        .filter(|c: &String| !c.eq_ignore_ascii_case(DEFAULT_ARM))
        .collect();
    if conditions.len() > MAX_BRANCH_CONDITIONS {
        warn!(
            found = conditions.len(),
            kept = MAX_BRANCH_CONDITIONS,
            "branch has too many conditions, extra arms dropped"
        );
        conditions.truncate(MAX_BRANCH_CONDITIONS);
    }
    conditions
}
