pub mod embedding;
pub mod language_model;
pub mod store;

pub use embedding::EmbeddingProvider;
pub use language_model::{LanguageModel, ModelRequest};
pub use store::{ConfidenceUpdate, CorrectionStore, KnowledgeStore, PatternStore, WriteMode};
