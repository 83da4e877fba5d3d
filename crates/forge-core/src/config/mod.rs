//! Engine configuration with layered resolution.

pub mod defaults;
pub mod interpreter_config;
pub mod learning_config;
pub mod retrieval_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use interpreter_config::InterpreterConfig;
pub use learning_config::LearningConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;

use crate::constants::{MAX_CANDIDATE_CAP, MIN_CANDIDATE_CAP};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`FORGE_*`)
/// 2. Project config (`flowforge.toml` in the project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub retrieval: RetrievalConfig,
    pub interpreter: InterpreterConfig,
    pub learning: LearningConfig,
    pub storage: StorageConfig,
}

impl ForgeConfig {
    /// Load configuration for a project root.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(defaults::PROJECT_CONFIG_FILE);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FORGE_*` overrides read through `lookup`. Unparseable values are
    /// ignored so a typo in the environment never masks the file config.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{name}", defaults::ENV_PREFIX));

        if let Some(v) = var("GRAPH_CONFIDENCE_THRESHOLD").and_then(|s| s.parse().ok()) {
            self.retrieval.graph_confidence_threshold = v;
        }
        if let Some(v) = var("SEMANTIC_SIMILARITY_THRESHOLD").and_then(|s| s.parse().ok()) {
            self.retrieval.semantic_similarity_threshold = v;
        }
        if let Some(v) = var("CANDIDATE_CAP").and_then(|s| s.parse().ok()) {
            self.retrieval.candidate_cap = v;
        }
        if let Some(v) = var("STORE_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.retrieval.store_timeout_ms = v;
        }
        if let Some(v) = var("MODEL_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.interpreter.model_timeout_ms = v;
        }
        if let Some(v) = var("EMA_ALPHA").and_then(|s| s.parse().ok()) {
            self.learning.ema_alpha = v;
        }
        if let Some(v) = var("MAX_UPDATE_ATTEMPTS").and_then(|s| s.parse().ok()) {
            self.learning.max_update_attempts = v;
        }
        if let Some(v) = var("SQLITE_PATH") {
            self.storage.sqlite_path = Some(v.into());
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |field: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                })
            }
        };
        unit(
            "retrieval.graph_confidence_threshold",
            self.retrieval.graph_confidence_threshold,
        )?;
        unit(
            "retrieval.semantic_similarity_threshold",
            self.retrieval.semantic_similarity_threshold,
        )?;

        if !(MIN_CANDIDATE_CAP..=MAX_CANDIDATE_CAP).contains(&self.retrieval.candidate_cap) {
            return Err(ConfigError::ValidationFailed {
                field: "retrieval.candidate_cap".to_string(),
                message: format!("must be between {MIN_CANDIDATE_CAP} and {MAX_CANDIDATE_CAP}"),
            });
        }
        if self.retrieval.store_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "retrieval.store_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.interpreter.model_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "interpreter.model_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.interpreter.max_attempts == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "interpreter.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(self.learning.ema_alpha > 0.0 && self.learning.ema_alpha <= 1.0) {
            return Err(ConfigError::ValidationFailed {
                field: "learning.ema_alpha".to_string(),
                message: "must be in (0.0, 1.0]".to_string(),
            });
        }
        if self.learning.max_update_attempts == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "learning.max_update_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.learning.queue_capacity == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "learning.queue_capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.storage.embedding_dimensions == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "storage.embedding_dimensions".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
