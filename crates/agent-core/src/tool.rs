//! Tool System
//!
//! Extensible tool framework for agent capabilities.
//! Tools are registered at runtime and invoked by the reasoning loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier (the prompt format labels this field "tool")
    #[serde(alias = "tool")]
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (success message or error)
    pub output: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, integer, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl ParameterSchema {
    /// True when `value` matches the declared JSON type
    fn type_matches(&self, value: &serde_json::Value) -> bool {
        match self.param_type.as_str() {
            "string" => value.is_string(),
            "number" => value.is_number(),
            "integer" => value.is_i64() || value.is_u64(),
            "boolean" => value.is_boolean(),
            "array" => value.is_array(),
            "object" => value.is_object(),
            _ => true,
        }
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;

    /// Validate arguments against the schema before execution.
    ///
    /// Checks required parameters, JSON types, and enum membership.
    /// Runs before any network or provider code is touched.
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            match call.arguments.get(&param.name) {
                None => {
                    if param.required {
                        return Err(AgentError::InvalidArguments(format!(
                            "{}: missing required parameter '{}'",
                            schema.name, param.name
                        )));
                    }
                }
                Some(value) => {
                    if !param.type_matches(value) {
                        return Err(AgentError::InvalidArguments(format!(
                            "{}: parameter '{}' must be a {}",
                            schema.name, param.name, param.param_type
                        )));
                    }
                    if let Some(allowed) = &param.enum_values {
                        if !allowed.contains(value) {
                            return Err(AgentError::InvalidArguments(format!(
                                "{}: parameter '{}' must be one of {}",
                                schema.name,
                                param.name,
                                serde_json::to_string(allowed).unwrap_or_default()
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Registry for available tools.
///
/// Tools are stored in registration order so that schema listings and the
/// generated prompt section are deterministic run to run.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a new tool. Names must be unique.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a shared tool instance
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.schema().name;
        if self.index.contains_key(&name) {
            return Err(AgentError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Invoke a tool call: resolve, validate, execute
    pub async fn invoke(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| AgentError::UnknownTool(call.name.clone()))?;

        tool.validate(call)?;

        tool.execute(call).await
    }

    /// All tool schemas, in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Tool names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.schema().name).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Generate system prompt section describing available tools
    pub fn prompt_section(&self) -> String {
        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("You can use the following tools by responding with a JSON block:\n\n");
        prompt.push_str("```tool\n{\"tool\": \"tool_name\", \"arguments\": {\"arg\": \"value\"}}\n```\n\n");

        for schema in self.schemas() {
            prompt.push_str(&format!("### {}\n", schema.name));
            prompt.push_str(&format!("{}\n", schema.description));

            if !schema.parameters.is_empty() {
                prompt.push_str("**Parameters:**\n");
                for param in &schema.parameters {
                    let required = if param.required { " (required)" } else { "" };
                    prompt.push_str(&format!(
                        "- `{}` ({}){}: {}\n",
                        param.name, param.param_type, required, param.description
                    ));
                }
            }
            prompt.push('\n');
        }

        prompt
    }
}

// ============================================================================
// Built-in Tools
// ============================================================================

/// DateTime tool - returns current time
pub struct DateTimeTool;

#[async_trait]
impl Tool for DateTimeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "datetime".into(),
            description: "Get the current date and time (UTC)".into(),
            parameters: vec![ParameterSchema {
                name: "format".into(),
                param_type: "string".into(),
                description: "Output format: 'iso', 'human', or 'unix'".into(),
                required: false,
                default: Some(serde_json::json!("human")),
                enum_values: Some(vec![
                    serde_json::json!("iso"),
                    serde_json::json!("human"),
                    serde_json::json!("unix"),
                ]),
            }],
            category: Some("time".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let format = call
            .arguments
            .get("format")
            .and_then(|v| v.as_str())
            .unwrap_or("human");

        let now = chrono::Utc::now();

        let output = match format {
            "iso" => now.to_rfc3339(),
            "unix" => now.timestamp().to_string(),
            _ => now.format("%A, %B %d, %Y at %H:%M:%S UTC").to_string(),
        };

        Ok(ToolResult::success("datetime", output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Echo back the message".into(),
                parameters: vec![
                    ParameterSchema {
                        name: "message".into(),
                        param_type: "string".into(),
                        description: "Text to echo".into(),
                        required: true,
                        default: None,
                        enum_values: None,
                    },
                    ParameterSchema {
                        name: "repeat".into(),
                        param_type: "integer".into(),
                        description: "Number of repetitions".into(),
                        required: false,
                        default: Some(serde_json::json!(1)),
                        enum_values: None,
                    },
                ],
                category: Some("test".into()),
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let message = call
                .arguments
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            Ok(ToolResult::success("echo", message))
        }
    }

    fn call(name: &str, args: serde_json::Value) -> ToolCall {
        let arguments = args
            .as_object()
            .map(|m| m.clone().into_iter().collect())
            .unwrap_or_default();
        ToolCall {
            name: name.into(),
            arguments,
            id: None,
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();

        let err = registry.register(EchoTool).unwrap_err();
        assert!(matches!(err, AgentError::DuplicateTool(name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn schemas_follow_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();
        registry.register(DateTimeTool).unwrap();

        let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["echo", "datetime"]);
        assert_eq!(registry.names(), vec!["echo", "datetime"]);
    }

    #[tokio::test]
    async fn invoke_unknown_tool_fails() {
        let registry = ToolRegistry::new();
        let err = registry.invoke(&call("nope", serde_json::json!({}))).await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool(name) if name == "nope"));
    }

    #[tokio::test]
    async fn invoke_rejects_missing_required_parameter() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();

        let err = registry.invoke(&call("echo", serde_json::json!({}))).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn invoke_rejects_wrong_argument_type() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();

        let bad = call("echo", serde_json::json!({"message": "hi", "repeat": "three"}));
        let err = registry.invoke(&bad).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidArguments(msg) if msg.contains("repeat")));
    }

    #[tokio::test]
    async fn invoke_rejects_value_outside_enum() {
        let mut registry = ToolRegistry::new();
        registry.register(DateTimeTool).unwrap();

        let bad = call("datetime", serde_json::json!({"format": "stardate"}));
        let err = registry.invoke(&bad).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn invoke_runs_valid_call() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();

        let result = registry
            .invoke(&call("echo", serde_json::json!({"message": "hello"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello");
    }

    #[test]
    fn tool_call_accepts_prompt_format_alias() {
        let parsed: ToolCall =
            serde_json::from_str(r#"{"tool": "echo", "arguments": {"message": "hi"}}"#).unwrap();
        assert_eq!(parsed.name, "echo");
        assert_eq!(
            parsed.arguments.get("message").and_then(|v| v.as_str()),
            Some("hi")
        );
    }

    #[test]
    fn prompt_section_lists_every_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();
        registry.register(DateTimeTool).unwrap();

        let prompt = registry.prompt_section();
        assert!(prompt.contains("### echo"));
        assert!(prompt.contains("### datetime"));
        assert!(prompt.contains("`message` (string) (required)"));
    }
}
