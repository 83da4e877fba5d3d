//! # forge-core
//!
//! Foundation crate for the flowforge synthesis engine.
//! Defines the data model, traits, errors, config, the bounded call policy,
//! and constants. Every other crate in the workspace depends on this.

pub mod call_policy;
pub mod cancellation;
pub mod confidence;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use call_policy::{BoundedCall, CallFailure};
pub use cancellation::CancellationToken;
pub use confidence::Confidence;
pub use config::ForgeConfig;
pub use errors::{ForgeError, ForgeResult};
pub use models::{
    CandidateOrigin, ComponentSpec, ComponentType, Correction, Edge, EdgeKind, FlowGraph,
    IntegrationIntent, IntentCategory, Outcome, Provenance, RetrievalCandidate, ValidationIssue,
};
