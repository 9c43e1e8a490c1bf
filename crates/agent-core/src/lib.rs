//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction, conversation
//! memory, and an extensible tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Assistant                              │
//! │  ┌──────────┐   ┌─────────────────────────────────────────┐  │
//! │  │ Sessions │──▶│                Agent                    │  │
//! │  └──────────┘   │  ┌───────────┐ ┌────────┐ ┌──────────┐  │  │
//! │   (memory per   │  │ Reasoning │─│  Tool  │─│   Llm    │  │  │
//! │    session)     │  │   Loop    │ │Registry│ │ Provider │  │  │
//! │                 │  └───────────┘ └────────┘ └──────────┘  │  │
//! │                 └─────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Ollama, OpenAI, or any
//! other backend without changing agent logic. The `Tool` trait does the
//! same for capabilities: register a tool and the reasoning loop can use it.

pub mod assistant;
pub mod error;
pub mod memory;
pub mod mock;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tool;

pub use assistant::Assistant;
pub use error::{AgentError, Result};
pub use memory::{ConversationMemory, MemoryWindow, Role, Turn};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentConfig, AgentDecision, AgentReply};
pub use session::{Session, SessionId};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
