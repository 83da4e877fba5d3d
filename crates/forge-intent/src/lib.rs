//! # forge-intent
//!
//! Turns free-text integration requirements into an ordered, non-empty list
//! of typed intents. The model is asked for a fixed JSON shape; a schema
//! violation earns one retry with a stricter prompt, after which a
//! deterministic keyword fallback produces a single `external-call` intent.

pub mod fallback;
pub mod interpreter;
pub mod prompt;
pub mod schema;

pub use fallback::{extract_keywords, fallback_plan};
pub use interpreter::{IntentInterpreter, Interpretation};
pub use schema::parse_plan;
