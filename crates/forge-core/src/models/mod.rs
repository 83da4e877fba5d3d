pub mod candidate;
pub mod component;
pub mod correction;
pub mod degradation_event;
pub mod flow_graph;
pub mod intent;
pub mod query;
pub mod request;
pub mod validation_issue;

pub use candidate::{CandidateOrigin, RetrievalCandidate};
pub use component::{ComponentSpec, ComponentType, Provenance};
pub use correction::{Correction, Outcome};
pub use degradation_event::DegradationEvent;
pub use flow_graph::{Edge, EdgeKind, FlowGraph};
pub use intent::{IntegrationIntent, IntentCategory};
pub use query::StoreQuery;
pub use request::{ProvenanceSummary, SynthesisOutput, SynthesisRequest};
pub use validation_issue::{IssueKind, ValidationIssue};
