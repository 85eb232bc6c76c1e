//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A cached question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QaPair {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Question text as first asked.
    pub question: String,
    /// Answer text returned for the question.
    pub answer: String,
    /// Category label (e.g., "general").
    pub category: String,
    /// Free-form tags.
    pub tags: Json<Vec<String>>,
    /// Number of exact-match cache hits served from this pair.
    pub usage_count: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// A chat session identified by a client-generated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatSession {
    /// Opaque session id.
    pub id: String,
    /// Title derived from the first question, if any turn exists.
    pub title: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Timestamp of the latest turn.
    pub updated_at: String,
}

/// A chat session with derived listing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatSessionSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub session: ChatSession,
    /// Question of the earliest turn.
    pub first_question: Option<String>,
    /// Number of turns in the session.
    pub message_count: i64,
}

/// How a knowledge-base entry contributed to an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    /// The answer was served verbatim from this entry.
    Cached,
    /// The entry was passed to generation as related context.
    Similar,
}

/// A reference to a Q/A pair used while answering a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRef {
    #[serde(rename = "type")]
    pub kind: ContextKind,
    pub id: i64,
}

impl ContextRef {
    pub fn cached(id: i64) -> Self {
        Self {
            kind: ContextKind::Cached,
            id,
        }
    }

    pub fn similar(id: i64) -> Self {
        Self {
            kind: ContextKind::Similar,
            id,
        }
    }
}

/// A single question/answer exchange within a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationTurn {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning chat session.
    pub session_id: String,
    /// The user's question.
    pub user_question: String,
    /// The answer returned.
    pub agent_response: String,
    /// Knowledge-base entries consulted for this answer.
    pub context_used: Json<Vec<ContextRef>>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Feedback left on a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub conversation_id: i64,
    pub helpful: bool,
    pub comment: Option<String>,
    pub created_at: String,
}

/// Difficulty rating of a setup guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    #[serde(alias = "Beginner")]
    Beginner,
    #[serde(alias = "Intermediate")]
    Intermediate,
    #[serde(alias = "Advanced")]
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// A generated setup guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SetupGuide {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Markdown body.
    pub content: String,
    pub prerequisites: Json<Vec<String>>,
    pub difficulty: Difficulty,
    /// Human-readable estimate (e.g., "30 minutes").
    pub estimated_time: String,
    pub created_at: String,
}

/// Fields of a guide that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSetupGuide {
    pub title: String,
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub estimated_time: String,
}

/// An annotated code sample attached to an architecture doc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// A generated explanation of one component of the codebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureDoc {
    pub id: i64,
    pub component_name: String,
    pub description: String,
    pub dependencies: Json<Vec<String>>,
    pub tech_stack: Json<Vec<String>>,
    pub file_paths: Json<Vec<String>>,
    pub code_examples: Json<Vec<CodeExample>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields of an architecture doc that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArchitectureDoc {
    #[serde(default)]
    pub component_name: String,
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub file_paths: Vec<String>,
    #[serde(default)]
    pub code_examples: Vec<CodeExample>,
}

/// A quiz generated from a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    /// UUID.
    pub id: String,
    pub title: String,
    /// Chat session the quiz was derived from.
    pub source_chat_id: Option<String>,
    pub created_at: String,
}

/// A quiz listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuizSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub quiz: Quiz,
    pub question_count: i64,
    /// Title of the source chat session, if it still resolves.
    pub chat_title: Option<String>,
}

/// A pointer from a quiz question into a setup guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideRef {
    #[serde(alias = "guide_id")]
    pub guide_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// A true/false statement belonging to a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuizQuestion {
    /// UUID.
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    pub correct_answer: bool,
    pub explanation: String,
    /// Conversation turn the statement was derived from (weak reference).
    pub source_message_id: Option<i64>,
    pub guide_refs: Option<Json<Vec<GuideRef>>>,
    /// Question text of the referenced turn; null when it no longer resolves.
    pub source_question: Option<String>,
}

/// Fields of a quiz question that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuizQuestion {
    pub id: String,
    pub text: String,
    pub correct_answer: bool,
    pub explanation: String,
    pub source_message_id: Option<i64>,
    pub guide_refs: Option<Vec<GuideRef>>,
}

/// A quiz together with its questions in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizWithQuestions {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuizQuestion>,
}
