//! Session Management
//!
//! A session ties one conversation memory to a stable identifier and
//! lifecycle state. Sessions live in memory only; ending one discards it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::memory::{ConversationMemory, Role};

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete agent session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Conversation transcript
    pub memory: ConversationMemory,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,

    /// Whether session is active
    pub active: bool,
}

impl Session {
    /// Create a new session
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            memory: ConversationMemory::new(),
            created_at: now,
            updated_at: now,
            active: true,
        }
    }

    /// Create with specific ID
    pub fn with_id(id: SessionId) -> Self {
        let mut session = Self::new();
        session.id = id;
        session
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Title derived from the first user turn
    pub fn title(&self) -> String {
        self.memory
            .turns()
            .iter()
            .find(|t| t.role == Role::User)
            .map(|t| {
                let preview: String = t.content.chars().take(50).collect();
                if t.content.chars().count() > 50 {
                    format!("{}...", preview)
                } else {
                    preview
                }
            })
            .unwrap_or_else(|| {
                // Ids can come from the caller, so never assume length.
                let short: String = self.id.0.chars().take(8).collect();
                format!("Session {}", short)
            })
    }

    /// End the session
    pub fn end(&mut self) {
        self.active = false;
        self.touch();
    }

    /// Turn count
    pub fn turn_count(&self) -> usize {
        self.memory.len()
    }

    /// Duration since creation
    pub fn duration(&self) -> chrono::Duration {
        self.updated_at - self.created_at
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Turn;

    #[test]
    fn new_session_is_active_and_empty() {
        let session = Session::new();
        assert!(session.active);
        assert_eq!(session.turn_count(), 0);
        assert!(session.title().starts_with("Session "));
    }

    #[test]
    fn title_previews_first_user_turn() {
        let mut session = Session::new();
        session.memory.append(Turn::user("What's the weather in Lisbon this weekend?"));
        session.memory.append(Turn::assistant("Let me check."));

        assert_eq!(session.title(), "What's the weather in Lisbon this weekend?");
    }

    #[test]
    fn long_titles_are_truncated() {
        let mut session = Session::new();
        session.memory.append(Turn::user("x".repeat(80)));

        let title = session.title();
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 53);
    }

    #[test]
    fn ending_deactivates() {
        let mut session = Session::new();
        session.end();
        assert!(!session.active);
    }
}
