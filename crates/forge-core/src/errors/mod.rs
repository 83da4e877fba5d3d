//! Error handling for flowforge.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod forge_error;
pub mod intent_error;
pub mod learning_error;
pub mod retrieval_error;
pub mod store_error;
pub mod synthesis_error;

pub use config_error::ConfigError;
pub use error_code::ForgeErrorCode;
pub use forge_error::{ForgeError, ForgeResult};
pub use intent_error::IntentError;
pub use learning_error::LearningError;
pub use retrieval_error::RetrievalError;
pub use store_error::StoreError;
pub use synthesis_error::SynthesisError;
