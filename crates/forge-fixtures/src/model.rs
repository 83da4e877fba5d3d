use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use forge_core::errors::{ForgeResult, IntentError};
use forge_core::traits::{LanguageModel, ModelRequest};

/// One canned model reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Fail(String),
    /// Sleep before answering; long enough to trip a short timeout.
    Hang(Duration),
}

/// Language model that replays a fixed script. The last reply repeats once
/// the script runs out. Every request is recorded.
#[derive(Debug)]
pub struct ScriptedModel {
    replies: Vec<ScriptedReply>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![ScriptedReply::Text(text.into())])
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ModelRequest) -> ForgeResult<String> {
        let index = {
            let mut log = self.requests.lock().map_err(|_| IntentError::ModelFailed {
                reason: "request log poisoned".into(),
            })?;
            log.push(request.clone());
            log.len() - 1
        };
        let reply = self
            .replies
            .get(index)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or_else(|| ScriptedReply::Fail("empty script".into()));

        match reply {
            ScriptedReply::Text(text) => Ok(text),
            ScriptedReply::Fail(reason) => Err(IntentError::ModelFailed { reason }.into()),
            ScriptedReply::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(String::new())
            }
        }
    }
}
