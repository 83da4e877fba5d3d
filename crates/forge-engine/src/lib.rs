//! # forge-engine
//!
//! Runs a synthesis request end to end:
//! interpret → retrieve (per intent, concurrently) → synthesize → assemble →
//! validate. Feedback is handled out of band by `forge-learning`; the
//! engine hands out an updater wired to the same stores.

pub mod builder;
pub mod engine;
pub mod telemetry;

pub use builder::SynthesisEngineBuilder;
pub use engine::SynthesisEngine;
