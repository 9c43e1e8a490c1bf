//! Web Search Tool
//!
//! Live web lookups for anything the model doesn't know. A query that
//! matches nothing is reported as a successful empty result so the model
//! can say so instead of treating it as a tool breakage.

use async_trait::async_trait;
use std::sync::Arc;

use agent_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::error::ProviderError;
use crate::sources::SearchSource;

/// Tool for web searches
pub struct WebSearchTool {
    source: Arc<dyn SearchSource>,
}

impl WebSearchTool {
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "web_search".into(),
            description: "Search the web for current information: news, events, facts, opening hours, anything not in your training data.".into(),
            parameters: vec![ParameterSchema {
                name: "query".into(),
                param_type: "string".into(),
                description: "Search query or topic to look up".into(),
                required: true,
                default: None,
                enum_values: None,
            }],
            category: Some("research".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call
            .arguments
            .get("query")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or_default();
        if query.is_empty() {
            return Ok(ToolResult::failure("web_search", "query must not be empty"));
        }

        let hits = match self.source.search(query).await {
            Ok(hits) => hits,
            Err(ProviderError::EmptyResult) => {
                return Ok(
                    ToolResult::success("web_search", format!("No results found for '{}'.", query))
                        .with_data(serde_json::json!([])),
                )
            }
            Err(e) => return Ok(ToolResult::failure("web_search", e.to_string())),
        };

        let mut output = format!("Search results for '{}':\n", query);
        for (i, hit) in hits.iter().enumerate() {
            output.push_str(&format!("{}. {}: {}", i + 1, hit.title, hit.snippet));
            if let Some(url) = &hit.url {
                output.push_str(&format!(" [{}]", url));
            }
            output.push('\n');
        }

        let data = serde_json::to_value(&hits)?;
        Ok(ToolResult::success("web_search", output.trim_end()).with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSearchSource;
    use std::collections::HashMap;

    fn call(args: serde_json::Value) -> ToolCall {
        let arguments: HashMap<String, serde_json::Value> = args
            .as_object()
            .map(|m| m.clone().into_iter().collect())
            .unwrap_or_default();
        ToolCall {
            name: "web_search".into(),
            arguments,
            id: None,
        }
    }

    #[tokio::test]
    async fn numbers_the_hits() {
        let tool = WebSearchTool::new(Arc::new(MockSearchSource::new()));
        let result = tool
            .execute(&call(serde_json::json!({"query": "Lisbon tram 28"})))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("1. "));
        assert!(result.output.contains("Lisbon tram 28"));
        assert_eq!(result.data.unwrap().as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_result_is_success_with_empty_list() {
        let tool = WebSearchTool::new(Arc::new(MockSearchSource::empty()));
        let result = tool
            .execute(&call(serde_json::json!({"query": "xyzzy"})))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("No results found"));
        assert!(result.data.unwrap().as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let tool = WebSearchTool::new(Arc::new(MockSearchSource::new()));
        let result = tool
            .execute(&call(serde_json::json!({"query": "   "})))
            .await
            .unwrap();

        assert!(!result.success);
    }

    #[tokio::test]
    async fn empty_search_still_lets_the_agent_answer() {
        use agent_core::mock::{ScriptedProvider, ScriptedResponse};
        use agent_core::{Agent, AgentConfig, ConversationMemory, Role, ToolRegistry};

        let mut tools = ToolRegistry::new();
        tools
            .register(WebSearchTool::new(Arc::new(MockSearchSource::empty())))
            .unwrap();

        let provider = ScriptedProvider::new(vec![
            ScriptedResponse::invoke("web_search", serde_json::json!({"query": "moon festival"})),
            ScriptedResponse::text("I couldn't find anything recent about that."),
        ]);
        let agent = Agent::new(Arc::new(provider), Arc::new(tools), AgentConfig::default());

        let mut memory = ConversationMemory::new();
        let reply = agent
            .respond(&mut memory, "Any news on the moon festival?")
            .await
            .unwrap();

        assert!(!reply.exhausted);
        assert_eq!(reply.text, "I couldn't find anything recent about that.");

        // The empty result lands as a successful tool turn, not a failure.
        let tool_turn = &memory.turns()[1];
        assert_eq!(tool_turn.role, Role::Tool);
        assert!(tool_turn.content.contains("[Tool 'web_search' returned]"));
        assert!(tool_turn.content.contains("No results found"));
    }
}
