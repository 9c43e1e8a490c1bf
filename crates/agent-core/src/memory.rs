//! Conversation Memory
//!
//! The append-only transcript of one session: user utterances, assistant
//! answers, and tool invocations, in the order they happened. The reasoning
//! loop reads a bounded window of it as model context; the chat surface
//! renders all of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a recorded turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool invocation result (injected as context)
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// One recorded message/event in a session's transcript.
///
/// Turns are immutable once appended: `ConversationMemory` hands out shared
/// slices only and offers no way to edit or reorder what was recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn
    pub role: Role,

    /// Text content (for tool turns, the formatted result or failure)
    pub content: String,

    /// Tool that was invoked (tool turns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Arguments the tool was invoked with (tool turns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_args: Option<HashMap<String, serde_json::Value>>,

    /// When the turn was recorded
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Turn {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_name: None,
            tool_args: None,
            created_at: Utc::now(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool turn recording one invocation and its outcome
    pub fn tool(
        tool_name: impl Into<String>,
        tool_args: Option<HashMap<String, serde_json::Value>>,
        content: impl Into<String>,
    ) -> Self {
        let mut turn = Self::new(Role::Tool, content);
        turn.tool_name = Some(tool_name.into());
        turn.tool_args = tool_args;
        turn
    }

    /// Estimate token count (~4 characters per token, plus role overhead)
    pub fn estimate_tokens(&self) -> u32 {
        (self.content.len() / 4) as u32 + 4
    }
}

/// Context budget for [`ConversationMemory::window`]
#[derive(Clone, Copy, Debug)]
pub struct MemoryWindow {
    /// Maximum number of turns handed to the model
    pub max_turns: usize,

    /// Maximum estimated tokens handed to the model
    pub max_tokens: u32,
}

impl Default for MemoryWindow {
    fn default() -> Self {
        Self {
            max_turns: 40,
            max_tokens: 8192,
        }
    }
}

/// Ordered, append-only log of turns for one session
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. O(1); order is insertion order, always.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The full transcript, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recently recorded turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// The most recent subsequence fitting the budget, oldest turns dropped
    /// first. The newest turn is always included, even when it alone exceeds
    /// the token budget, so the model never sees an empty context.
    pub fn window(&self, budget: &MemoryWindow) -> &[Turn] {
        if self.turns.is_empty() {
            return &self.turns;
        }

        let mut start = self.turns.len();
        let mut tokens = 0u32;

        while start > 0 {
            let cost = self.turns[start - 1].estimate_tokens();
            let within_turns = self.turns.len() - start < budget.max_turns;
            let within_tokens = tokens.saturating_add(cost) <= budget.max_tokens;

            if !(within_turns && within_tokens) && start < self.turns.len() {
                break;
            }

            tokens = tokens.saturating_add(cost);
            start -= 1;
        }

        &self.turns[start..]
    }

    /// Discard all recorded turns
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Estimate total tokens across the transcript
    pub fn estimate_tokens(&self) -> u32 {
        self.turns.iter().map(Turn::estimate_tokens).sum()
    }

    /// Number of recorded turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
