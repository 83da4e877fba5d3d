use async_trait::async_trait;

use crate::errors::ForgeResult;

/// One constrained-schema completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub prompt: String,
    /// JSON schema the output must satisfy.
    pub response_schema: serde_json::Value,
    /// 1-based attempt number.
    pub attempt: u32,
}

/// Black-box language-model capability. Request in, raw text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &ModelRequest) -> ForgeResult<String>;
}
