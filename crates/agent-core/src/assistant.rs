//! Assistant Facade
//!
//! Multi-session front door over one [`Agent`]. Each session owns its
//! conversation memory behind an async mutex, so utterances within a
//! session resolve strictly one at a time while separate sessions run
//! concurrently.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{AgentError, Result};
use crate::memory::{Role, Turn};
use crate::reasoning::{Agent, AgentReply};
use crate::session::{Session, SessionId};

/// Conversational assistant shared by all transport layers
pub struct Assistant {
    agent: Agent,
    sessions: RwLock<HashMap<SessionId, Arc<tokio::sync::Mutex<Session>>>>,
}

impl Assistant {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying agent (for tool and config introspection)
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Get or create the session for `id`
    fn session(&self, id: &SessionId) -> Arc<tokio::sync::Mutex<Session>> {
        if let Some(session) = self.sessions.read().unwrap().get(id) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().unwrap();
        Arc::clone(
            sessions
                .entry(id.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Session::with_id(id.clone())))),
        )
    }

    /// Look up an existing session without creating one
    fn existing(&self, id: &SessionId) -> Option<Arc<tokio::sync::Mutex<Session>>> {
        self.sessions.read().unwrap().get(id).cloned()
    }

    /// Resolve one user utterance within a session.
    ///
    /// Creates the session on first use. The session lock is held for the
    /// whole resolution, so a second utterance for the same session waits
    /// until this one has appended its final assistant turn.
    pub async fn submit(&self, id: &SessionId, input: &str) -> Result<AgentReply> {
        let session = self.session(id);
        let mut session = session.lock().await;

        if !session.active {
            return Err(AgentError::Session(format!("session {} has ended", id)));
        }

        let reply = self.agent.respond(&mut session.memory, input).await?;
        session.touch();
        Ok(reply)
    }

    /// Full transcript of a session, oldest turn first
    pub async fn transcript(&self, id: &SessionId) -> Result<Vec<Turn>> {
        let session = self
            .existing(id)
            .ok_or_else(|| AgentError::Session(format!("unknown session {}", id)))?;
        let session = session.lock().await;
        Ok(session.memory.turns().to_vec())
    }

    /// Transcript rendered as plain text, one line per turn
    pub async fn transcript_text(&self, id: &SessionId) -> Result<String> {
        let turns = self.transcript(id).await?;
        let mut out = String::new();
        for turn in &turns {
            let speaker = match turn.role {
                Role::User => "You".to_string(),
                Role::Assistant => "Assistant".to_string(),
                Role::Tool => format!(
                    "[tool {}]",
                    turn.tool_name.as_deref().unwrap_or("unknown")
                ),
            };
            out.push_str(&format!("{}: {}\n", speaker, turn.content));
        }
        Ok(out)
    }

    /// End and discard a session. Returns false when the id was never seen.
    pub async fn end_session(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().unwrap().remove(id);
        match removed {
            Some(session) => {
                // In-flight submits still hold clones of the Arc; mark the
                // session ended so they fail instead of resolving.
                session.lock().await.end();
                true
            }
            None => false,
        }
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ScriptedProvider, ScriptedResponse};
    use crate::reasoning::AgentConfig;
    use crate::tool::ToolRegistry;

    fn assistant_with(responses: Vec<ScriptedResponse>) -> Assistant {
        let agent = Agent::new(
            Arc::new(ScriptedProvider::new(responses)),
            Arc::new(ToolRegistry::new()),
            AgentConfig::default(),
        );
        Assistant::new(agent)
    }

    #[tokio::test]
    async fn submit_creates_session_and_records_turns() {
        let assistant = assistant_with(vec![
            ScriptedResponse::text("Hello!"),
            ScriptedResponse::text("Goodbye!"),
        ]);
        let id = SessionId::new();

        let first = assistant.submit(&id, "hi").await.unwrap();
        assert_eq!(first.text, "Hello!");
        assert_eq!(assistant.session_count(), 1);

        assistant.submit(&id, "bye").await.unwrap();

        let transcript = assistant.transcript(&id).await.unwrap();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[3].content, "Goodbye!");
    }

    #[tokio::test]
    async fn sessions_do_not_share_memory() {
        let assistant = assistant_with(vec![
            ScriptedResponse::text("a"),
            ScriptedResponse::text("b"),
        ]);
        let one = SessionId::new();
        let two = SessionId::new();

        assistant.submit(&one, "first").await.unwrap();
        assistant.submit(&two, "second").await.unwrap();

        assert_eq!(assistant.transcript(&one).await.unwrap().len(), 2);
        assert_eq!(assistant.transcript(&two).await.unwrap().len(), 2);
        assert_eq!(assistant.session_count(), 2);
    }

    #[tokio::test]
    async fn transcript_of_unknown_session_fails() {
        let assistant = assistant_with(vec![]);
        let err = assistant.transcript(&SessionId::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::Session(_)));
    }

    #[tokio::test]
    async fn ended_session_rejects_new_input() {
        let assistant = assistant_with(vec![ScriptedResponse::text("hi")]);
        let id = SessionId::new();
        assistant.submit(&id, "hello").await.unwrap();

        assert!(assistant.end_session(&id).await);
        assert_eq!(assistant.session_count(), 0);
        assert!(!assistant.end_session(&id).await);
    }

    #[tokio::test]
    async fn transcript_text_labels_speakers() {
        let assistant = assistant_with(vec![ScriptedResponse::text("It will rain.")]);
        let id = SessionId::new();
        assistant.submit(&id, "Weather tomorrow?").await.unwrap();

        let text = assistant.transcript_text(&id).await.unwrap();
        assert!(text.contains("You: Weather tomorrow?"));
        assert!(text.contains("Assistant: It will rain."));
    }
}
