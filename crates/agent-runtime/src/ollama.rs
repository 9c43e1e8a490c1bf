//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference.

use agent_core::{
    error::{AgentError, Result},
    memory::{Role, Turn},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage},
};
use async_trait::async_trait;
use ollama_rs::{
    generation::chat::{request::ChatMessageRequest, ChatMessage, ChatMessageResponse, MessageRole},
    models::ModelOptions as OllamaOptions,
    Ollama,
};

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost".into());
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(11434);

        Self { host, port }
    }
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom host/port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::from_config(OllamaConfig {
            host: host.into(),
            port,
        })
    }

    /// Create from configuration
    pub fn from_config(config: OllamaConfig) -> Self {
        Self {
            client: Ollama::new(&config.host, config.port),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(OllamaConfig::from_env())
    }

    /// Create with default localhost settings
    pub fn localhost() -> Self {
        Self::from_config(OllamaConfig::default())
    }

    /// Convert conversation turns to Ollama chat messages.
    ///
    /// The system prompt rides in the options, never in the turns, so it
    /// is prepended here. Tool turns become user-role context; Ollama has
    /// no separate tool role in plain chat.
    fn convert_turns(turns: &[Turn], options: &GenerationOptions) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(turns.len() + 1);

        if let Some(system) = &options.system_prompt {
            messages.push(ChatMessage::new(MessageRole::System, system.clone()));
        }

        for turn in turns {
            let role = match turn.role {
                Role::User | Role::Tool => MessageRole::User,
                Role::Assistant => MessageRole::Assistant,
            };
            messages.push(ChatMessage::new(role, turn.content.clone()));
        }

        messages
    }

    /// Convert Ollama response to agent completion
    fn convert_completion(response: ChatMessageResponse, model: &str) -> Completion {
        Completion {
            content: response.message.content,
            model: model.to_string(),
            usage: response.final_data.as_ref().map(|d| TokenUsage {
                prompt_tokens: d.prompt_eval_count as u32,
                completion_tokens: d.eval_count as u32,
                total_tokens: (d.prompt_eval_count + d.eval_count) as u32,
            }),
            finish_reason: Some(FinishReason::Stop),
        }
    }

    /// Build Ollama generation options
    fn build_options(opts: &GenerationOptions) -> OllamaOptions {
        OllamaOptions::default()
            .temperature(opts.temperature)
            .top_p(opts.top_p)
            .num_predict(opts.max_tokens as i32)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(&self, turns: &[Turn], options: &GenerationOptions) -> Result<Completion> {
        let messages = Self::convert_turns(turns, options);
        let ollama_options = Self::build_options(options);

        let request =
            ChatMessageRequest::new(options.model.clone(), messages).options(ollama_options);

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AgentError::ModelUnavailable(e.to_string()))?;

        Ok(Self::convert_completion(response, &options.model))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| AgentError::ModelUnavailable(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.clone(),
                name: m.name,
                context_length: None, // Not exposed by Ollama API
            })
            .collect())
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        // Llama tokenizer is roughly 4 chars per token
        (text.len() / 4) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.host, "http://localhost");
        assert_eq!(config.port, 11434);
    }

    #[test]
    fn system_prompt_is_prepended() {
        let turns = vec![Turn::user("Hello"), Turn::assistant("Hi there")];
        let mut options = GenerationOptions::default();
        options.system_prompt = Some("You are helpful.".into());

        let converted = OllamaProvider::convert_turns(&turns, &options);
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0].content, "You are helpful.");
        assert_eq!(converted[1].content, "Hello");
    }

    #[test]
    fn tool_turns_become_user_context() {
        let turns = vec![
            Turn::user("Weather in Oslo?"),
            Turn::tool("weather_forecast", None, "[Tool 'weather_forecast' returned]\nOvercast"),
        ];
        let options = GenerationOptions::default();

        let converted = OllamaProvider::convert_turns(&turns, &options);
        assert_eq!(converted.len(), 2);
        assert!(converted[1].content.contains("Overcast"));
    }
}
