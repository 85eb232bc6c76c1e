//! Conversation turn persistence.
//!
//! Turns are insert-only. Within a session they are ordered by `created_at`
//! with ties broken by `id`.

use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::chat_session;
use crate::models::{ContextRef, ConversationTurn};
use crate::Result;

/// Maximum characters kept from the first question when deriving a title.
pub const TITLE_MAX_CHARS: usize = 60;

/// Derive a session title from a question.
pub fn derive_title(question: &str) -> String {
    question.chars().take(TITLE_MAX_CHARS).collect()
}

/// Append a turn to a session, creating the session if needed.
///
/// Bumps the session's `updated_at`. When the new turn is the first one in the
/// session, the session title is derived from its question. Run this inside a
/// transaction so the turn and session bookkeeping commit together.
pub async fn append_turn(
    conn: &mut SqliteConnection,
    session_id: &str,
    user_question: &str,
    agent_response: &str,
    context_used: &[ContextRef],
) -> Result<i64> {
    chat_session::ensure_session(&mut *conn, session_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO conversations (session_id, user_question, agent_response, context_used)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(session_id)
    .bind(user_question)
    .bind(agent_response)
    .bind(Json(context_used))
    .execute(&mut *conn)
    .await?;
    let turn_id = result.last_insert_rowid();

    chat_session::touch_session(&mut *conn, session_id).await?;

    if count_turns(&mut *conn, session_id).await? == 1 {
        let title = derive_title(user_question);
        chat_session::set_title_if_unset(&mut *conn, session_id, &title).await?;
        tracing::debug!(session_id, title = %title, "Session title set");
    }

    Ok(turn_id)
}

/// Count turns in a session.
pub async fn count_turns(conn: &mut SqliteConnection, session_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM conversations
        WHERE session_id = ?
        "#,
    )
    .bind(session_id)
    .fetch_one(conn)
    .await?;

    Ok(count)
}

/// Get the most recent turns of a session, newest first.
pub async fn recent_turns(
    pool: &SqlitePool,
    session_id: &str,
    limit: i64,
) -> Result<Vec<ConversationTurn>> {
    let rows = sqlx::query_as::<_, ConversationTurn>(
        r#"
        SELECT id, session_id, user_question, agent_response, context_used, created_at
        FROM conversations
        WHERE session_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(session_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get the most recent turns of a session, in chronological order.
pub async fn transcript(
    pool: &SqlitePool,
    session_id: &str,
    limit: i64,
) -> Result<Vec<ConversationTurn>> {
    let mut rows = recent_turns(pool, session_id, limit).await?;
    rows.reverse();
    Ok(rows)
}
