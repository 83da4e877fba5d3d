//! # forge-synthesis
//!
//! Expands each intent plus its ranked candidates into concrete component
//! specs. Simple intents become one node. `external-call` becomes an
//! invocation/channel/endpoint trio sharing a correlation id.
//! `conditional-branch` becomes a decision node with one route arm per
//! condition plus a mandatory `otherwise` arm.
//!
//! Node ids derive from intent position and node index, never from random
//! generation, so identical input always yields identical ids.

pub mod extract;
pub mod group;
pub mod ids;
pub mod synthesizer;
pub mod template;

pub use group::{BranchArm, ComponentGroup, GroupShape};
pub use synthesizer::{ComponentSynthesizer, Synthesis, MAX_BRANCH_CONDITIONS};
