//! Session ledger: append-only conversation history per chat session.

use database::{
    chat_session, conversation, ChatSession, ChatSessionSummary, ContextRef, ConversationTurn,
    DatabaseError,
};
use serde::Serialize;

use crate::{require_text, Onboarding, Result};

/// Turns returned for a single chat.
pub const CHAT_MESSAGE_LIMIT: i64 = 100;

/// A session together with its turns in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTranscript {
    pub session: ChatSession,
    pub messages: Vec<ConversationTurn>,
}

impl Onboarding {
    /// Append a turn, creating the session on first use.
    pub async fn append_turn(
        &self,
        session_id: &str,
        question: &str,
        answer: &str,
        context: &[ContextRef],
    ) -> Result<i64> {
        require_text(session_id, "sessionId is required")?;

        let mut tx = self.db.begin().await?;
        let turn_id =
            conversation::append_turn(&mut *tx, session_id, question, answer, context).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(turn_id)
    }

    /// Most recent turns of a session, newest first.
    pub async fn history(&self, session_id: &str, limit: i64) -> Result<Vec<ConversationTurn>> {
        Ok(conversation::recent_turns(self.db.pool(), session_id, limit).await?)
    }

    /// All sessions, most recently updated first.
    pub async fn list_sessions(&self) -> Result<Vec<ChatSessionSummary>> {
        Ok(chat_session::list_sessions(self.db.pool()).await?)
    }

    /// A session and its turns, oldest first.
    pub async fn get_chat(&self, session_id: &str) -> Result<ChatTranscript> {
        let session = self.require_session(session_id).await?;
        let messages =
            conversation::transcript(self.db.pool(), session_id, CHAT_MESSAGE_LIMIT).await?;

        Ok(ChatTranscript { session, messages })
    }

    /// Create a session if it does not exist yet.
    pub async fn ensure_session(&self, session_id: &str) -> Result<()> {
        require_text(session_id, "sessionId is required")?;

        let mut conn = self.db.pool().acquire().await.map_err(DatabaseError::from)?;
        chat_session::ensure_session(&mut conn, session_id).await?;
        Ok(())
    }

    /// Look up a session, failing with not-found if it does not exist.
    pub async fn require_session(&self, session_id: &str) -> Result<ChatSession> {
        Ok(chat_session::require_session(self.db.pool(), session_id).await?)
    }
}
