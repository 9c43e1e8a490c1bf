//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior.
//! Each cycle the agent asks the model to either invoke a tool or answer;
//! tool results feed back as context until the model answers or the
//! iteration cap is hit.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::memory::{ConversationMemory, MemoryWindow, Turn};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Context budget applied to memory before each completion
    pub window: MemoryWindow,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 6,
            window: MemoryWindow::default(),
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// What the model chose to do with the current context
#[derive(Debug)]
pub enum AgentDecision {
    /// Invoke a tool and feed the result back
    Invoke(ToolCall),

    /// Answer the user directly
    Respond(String),
}

/// Final outcome of one reasoning run
#[derive(Clone, Debug, serde::Serialize)]
pub struct AgentReply {
    /// Answer text shown to the user
    pub text: String,

    /// Reasoning iterations consumed
    pub iterations: usize,

    /// True when the iteration cap was hit and `text` is the fallback answer
    pub exhausted: bool,
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create a new agent
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.prompt_section());
        }

        prompt
    }

    /// Resolve one user utterance against the given memory.
    ///
    /// Appends the user turn, loops decide/invoke up to the iteration cap,
    /// and always leaves a final assistant turn in memory. Hitting the cap
    /// is not a failure: the reply carries a fallback answer with
    /// `exhausted` set so callers can surface it.
    pub async fn respond(&self, memory: &mut ConversationMemory, input: &str) -> Result<AgentReply> {
        memory.append(Turn::user(input));

        for iteration in 1..=self.config.max_iterations {
            match self.decide(memory).await? {
                AgentDecision::Respond(text) => {
                    memory.append(Turn::assistant(&text));
                    return Ok(AgentReply {
                        text,
                        iterations: iteration,
                        exhausted: false,
                    });
                }
                AgentDecision::Invoke(call) => {
                    tracing::debug!(tool = %call.name, iteration, "executing tool");

                    let result = self.invoke_tool(&call).await;
                    let content = self.format_tool_result(&result);
                    memory.append(Turn::tool(&call.name, Some(call.arguments.clone()), content));
                }
            }
        }

        tracing::warn!(
            max_iterations = self.config.max_iterations,
            "iteration cap reached without a final answer"
        );

        let text = AgentError::MaxIterations(self.config.max_iterations).user_message();
        memory.append(Turn::assistant(&text));
        Ok(AgentReply {
            text,
            iterations: self.config.max_iterations,
            exhausted: true,
        })
    }

    /// One-shot question against a throwaway memory
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut memory = ConversationMemory::new();
        let reply = self.respond(&mut memory, question).await?;
        Ok(reply.text)
    }

    /// Ask the model what to do next with the current context
    async fn decide(&self, memory: &ConversationMemory) -> Result<AgentDecision> {
        let mut options = self.config.generation.clone();
        options.system_prompt = Some(self.build_system_prompt());

        let window = memory.window(&self.config.window);
        let completion = self.provider.complete(window, &options).await?;

        Ok(self.parse_decision(&completion.content))
    }

    /// Interpret model output: a tool block means invoke, anything else answers
    fn parse_decision(&self, content: &str) -> AgentDecision {
        match self.parse_tool_call(content) {
            Some(call) => AgentDecision::Invoke(call),
            None => AgentDecision::Respond(content.trim().to_string()),
        }
    }

    /// Parse a tool call from LLM response
    fn parse_tool_call(&self, content: &str) -> Option<ToolCall> {
        // Look for ```tool ... ``` blocks
        let tool_start = "```tool";
        let tool_end = "```";

        if let Some(start_idx) = content.find(tool_start) {
            let after_marker = &content[start_idx + tool_start.len()..];
            if let Some(end_idx) = after_marker.find(tool_end) {
                let json_str = after_marker[..end_idx].trim();

                if let Ok(mut call) = serde_json::from_str::<ToolCall>(json_str) {
                    if call.id.is_none() {
                        call.id = Some(uuid::Uuid::new_v4().to_string());
                    }
                    return Some(call);
                }
            }
        }

        // Fallback: try to find raw JSON with "tool" key
        self.parse_inline_tool_call(content)
    }

    /// Try to parse inline JSON tool call
    fn parse_inline_tool_call(&self, content: &str) -> Option<ToolCall> {
        if !content.contains(r#""tool""#) {
            return None;
        }

        let start = content.find('{')?;
        let end = content.rfind('}')?;

        if end <= start {
            return None;
        }

        let json_str = &content[start..=end];
        let mut call = serde_json::from_str::<ToolCall>(json_str).ok()?;
        if call.id.is_none() {
            call.id = Some(uuid::Uuid::new_v4().to_string());
        }
        Some(call)
    }

    /// Invoke a tool call, converting any error into a failed result.
    ///
    /// A failing tool never aborts the loop; the failure text goes back
    /// to the model so it can recover or apologize.
    async fn invoke_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.invoke(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "tool invocation failed");
                ToolResult {
                    name: call.name.clone(),
                    id: call.id.clone(),
                    success: false,
                    output: format!("Error: {}", e),
                    data: None,
                }
            }
        }
    }

    /// Format tool result for the transcript
    fn format_tool_result(&self, result: &ToolResult) -> String {
        if result.success {
            format!("[Tool '{}' returned]\n{}", result.name, result.output)
        } else {
            format!("[Tool '{}' failed]\n{}", result.name, result.output)
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    tool_error: Option<AgentError>,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            tool_error: None,
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        if let Err(e) = self.tools.register(tool) {
            self.tool_error.get_or_insert(e);
        }
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn window(mut self, window: MemoryWindow) -> Self {
        self.config.window = window;
        self
    }

    pub fn build(self) -> Result<Agent> {
        if let Some(e) = self.tool_error {
            return Err(e);
        }

        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Role;
    use crate::mock::{ScriptedProvider, ScriptedResponse};
    use crate::tool::{ParameterSchema, Tool, ToolSchema};
    use async_trait::async_trait;

    struct FakeRateTool;

    #[async_trait]
    impl Tool for FakeRateTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "convert_currency".into(),
                description: "Convert an amount between currencies".into(),
                parameters: vec![ParameterSchema {
                    name: "amount".into(),
                    param_type: "number".into(),
                    description: "Amount to convert".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                }],
                category: Some("travel".into()),
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let amount = call
                .arguments
                .get("amount")
                .and_then(|v| v.as_f64())
                .unwrap_or_default();
            Ok(ToolResult::success(
                "convert_currency",
                format!("{} USD = {} EUR", amount, amount * 0.9),
            ))
        }
    }

    fn agent_with(responses: Vec<ScriptedResponse>, max_iterations: usize) -> Agent {
        let mut tools = ToolRegistry::new();
        tools.register(FakeRateTool).unwrap();
        let mut config = AgentConfig::default();
        config.max_iterations = max_iterations;
        Agent::new(
            Arc::new(ScriptedProvider::new(responses)),
            Arc::new(tools),
            config,
        )
    }

    #[tokio::test]
    async fn direct_answer_completes_in_one_iteration() {
        let agent = agent_with(vec![ScriptedResponse::text("Paris is lovely in spring.")], 6);
        let mut memory = ConversationMemory::new();

        let reply = agent.respond(&mut memory, "Tell me about Paris").await.unwrap();
        assert_eq!(reply.text, "Paris is lovely in spring.");
        assert_eq!(reply.iterations, 1);
        assert!(!reply.exhausted);

        let roles: Vec<&Role> = memory.turns().iter().map(|t| &t.role).collect();
        assert_eq!(roles, vec![&Role::User, &Role::Assistant]);
    }

    #[tokio::test]
    async fn tool_invocation_feeds_result_back() {
        let agent = agent_with(
            vec![
                ScriptedResponse::invoke("convert_currency", serde_json::json!({"amount": 100.0})),
                ScriptedResponse::text("100 USD is about 90 EUR."),
            ],
            6,
        );
        let mut memory = ConversationMemory::new();

        let reply = agent
            .respond(&mut memory, "How much is 100 USD in EUR?")
            .await
            .unwrap();
        assert_eq!(reply.text, "100 USD is about 90 EUR.");
        assert_eq!(reply.iterations, 2);

        // user, tool, assistant
        assert_eq!(memory.len(), 3);
        let tool_turn = &memory.turns()[1];
        assert_eq!(tool_turn.role, Role::Tool);
        assert_eq!(tool_turn.tool_name.as_deref(), Some("convert_currency"));
        assert!(tool_turn.content.contains("[Tool 'convert_currency' returned]"));
        assert!(tool_turn
            .tool_args
            .as_ref()
            .unwrap()
            .contains_key("amount"));
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_turn_and_loop_recovers() {
        let agent = agent_with(
            vec![
                ScriptedResponse::invoke("teleport", serde_json::json!({})),
                ScriptedResponse::text("Sorry, I cannot do that."),
            ],
            6,
        );
        let mut memory = ConversationMemory::new();

        let reply = agent.respond(&mut memory, "Teleport me to Oslo").await.unwrap();
        assert_eq!(reply.text, "Sorry, I cannot do that.");

        let tool_turn = &memory.turns()[1];
        assert!(tool_turn.content.contains("[Tool 'teleport' failed]"));
    }

    #[tokio::test]
    async fn iteration_cap_yields_fallback_answer() {
        let responses = (0..6)
            .map(|_| ScriptedResponse::invoke("convert_currency", serde_json::json!({"amount": 1.0})))
            .collect();
        let agent = agent_with(responses, 6);
        let mut memory = ConversationMemory::new();

        let reply = agent.respond(&mut memory, "loop forever").await.unwrap();
        assert!(reply.exhausted);
        assert_eq!(reply.iterations, 6);
        assert!(!reply.text.is_empty());

        // Exactly six tool turns were recorded, then the fallback answer.
        let tool_turns = memory
            .turns()
            .iter()
            .filter(|t| t.role == Role::Tool)
            .count();
        assert_eq!(tool_turns, 6);
        assert_eq!(memory.last().unwrap().role, Role::Assistant);
    }

    #[tokio::test]
    async fn provider_failure_escapes_as_error() {
        let agent = agent_with(
            vec![ScriptedResponse::error(AgentError::ModelUnavailable(
                "connection refused".into(),
            ))],
            6,
        );
        let mut memory = ConversationMemory::new();

        let err = agent.respond(&mut memory, "hello").await.unwrap_err();
        assert!(matches!(err, AgentError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn system_prompt_travels_in_options_not_as_turn() {
        let provider = Arc::new(ScriptedProvider::new(vec![ScriptedResponse::text("hi")]));
        let mut tools = ToolRegistry::new();
        tools.register(FakeRateTool).unwrap();
        let agent = Agent::new(Arc::clone(&provider) as Arc<dyn LlmProvider>, Arc::new(tools), AgentConfig::default());

        let mut memory = ConversationMemory::new();
        agent.respond(&mut memory, "hello").await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let (turns, options) = &requests[0];
        assert!(options
            .system_prompt
            .as_deref()
            .unwrap()
            .contains("convert_currency"));
        assert!(turns.iter().all(|t| t.role != Role::Assistant || !t.content.is_empty()));
        assert!(memory.turns().iter().all(|t| matches!(t.role, Role::User | Role::Assistant | Role::Tool)));
    }

    #[test]
    fn parse_decision_reads_fenced_block() {
        let agent = agent_with(vec![], 6);
        let content = r#"Let me check that for you.
```tool
{"tool": "convert_currency", "arguments": {"amount": 50}}
```"#;

        match agent.parse_decision(content) {
            AgentDecision::Invoke(call) => {
                assert_eq!(call.name, "convert_currency");
                assert!(call.id.is_some());
            }
            AgentDecision::Respond(_) => panic!("expected tool invocation"),
        }
    }

    #[test]
    fn parse_decision_reads_inline_json() {
        let agent = agent_with(vec![], 6);
        let content = r#"{"tool": "convert_currency", "arguments": {"amount": 50}}"#;

        assert!(matches!(
            agent.parse_decision(content),
            AgentDecision::Invoke(_)
        ));
    }

    #[test]
    fn malformed_block_falls_back_to_plain_answer() {
        let agent = agent_with(vec![], 6);
        let content = "```tool\n{not json at all\n```";

        match agent.parse_decision(content) {
            AgentDecision::Respond(text) => assert!(text.contains("not json")),
            AgentDecision::Invoke(_) => panic!("malformed block must not invoke"),
        }
    }

    #[test]
    fn builder_surfaces_duplicate_tool() {
        let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(vec![]));
        let err = AgentBuilder::new()
            .provider(provider)
            .tool(FakeRateTool)
            .tool(FakeRateTool)
            .build()
            .unwrap_err();
        assert!(matches!(err, AgentError::DuplicateTool(_)));
    }
}
