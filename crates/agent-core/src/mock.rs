//! Scripted Provider
//!
//! In-memory [`LlmProvider`] that replays a queue of canned responses.
//! Used by the reasoning loop tests and anywhere a deterministic model
//! is needed without a running backend.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{AgentError, Result};
use crate::memory::Turn;
use crate::provider::{Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo};

/// One canned model response: either generated text or a provider failure
pub struct ScriptedResponse(Result<String>);

impl ScriptedResponse {
    /// Plain text response
    pub fn text(content: impl Into<String>) -> Self {
        Self(Ok(content.into()))
    }

    /// A tool invocation, formatted the way the prompt instructs the model
    pub fn invoke(tool: &str, arguments: serde_json::Value) -> Self {
        let call = serde_json::json!({ "tool": tool, "arguments": arguments });
        Self(Ok(format!("```tool\n{}\n```", call)))
    }

    /// A provider-level failure
    pub fn error(err: AgentError) -> Self {
        Self(Err(err))
    }
}

/// Provider that pops one [`ScriptedResponse`] per completion request.
///
/// Every request (window + options) is recorded so tests can assert on
/// what the model actually saw.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    requests: Mutex<Vec<(Vec<Turn>, GenerationOptions)>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<(Vec<Turn>, GenerationOptions)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(&self, turns: &[Turn], options: &GenerationOptions) -> Result<Completion> {
        self.requests
            .lock()
            .unwrap()
            .push((turns.to_vec(), options.clone()));

        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Model("scripted provider exhausted".into()))?;

        let content = next.0?;
        Ok(Completion {
            content,
            model: options.model.clone(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: "scripted".into(),
            name: "scripted".into(),
            context_length: None,
        }])
    }
}
