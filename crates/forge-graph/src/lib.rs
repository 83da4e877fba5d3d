//! # forge-graph
//!
//! Wires synthesized component groups into one directed flow graph, assigns
//! layer ranks, then validates and repairs it.

pub mod assembler;
pub mod index;
pub mod layout;
pub mod validator;

pub use assembler::GraphAssembler;
pub use index::FlowIndex;
pub use validator::{ConsistencyValidator, ValidationReport};
