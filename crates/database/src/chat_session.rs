//! Chat session persistence.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{ChatSession, ChatSessionSummary};

/// Create a session if it does not exist yet.
///
/// Concurrent calls for the same id never produce duplicates.
pub async fn ensure_session(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_sessions (id)
        VALUES (?)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Get a session by ID, if present.
pub async fn find_session(pool: &SqlitePool, id: &str) -> Result<Option<ChatSession>> {
    let session = sqlx::query_as::<_, ChatSession>(
        r#"
        SELECT id, title, created_at, updated_at
        FROM chat_sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Get a session by ID, failing if it does not exist.
pub async fn require_session(pool: &SqlitePool, id: &str) -> Result<ChatSession> {
    find_session(pool, id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Chat session",
            id: id.to_string(),
        })
}

/// Bump a session's `updated_at`.
pub async fn touch_session(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE chat_sessions
        SET updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Set the session title if it has none. Returns whether the title was set.
pub async fn set_title_if_unset(conn: &mut SqliteConnection, id: &str, title: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE chat_sessions
        SET title = ?
        WHERE id = ? AND title IS NULL
        "#,
    )
    .bind(title)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List sessions with their first question and turn count, most recently updated first.
pub async fn list_sessions(pool: &SqlitePool) -> Result<Vec<ChatSessionSummary>> {
    let rows = sqlx::query_as::<_, ChatSessionSummary>(
        r#"
        SELECT
            cs.id,
            cs.title,
            cs.created_at,
            cs.updated_at,
            (
                SELECT user_question
                FROM conversations
                WHERE session_id = cs.id
                ORDER BY created_at ASC, id ASC
                LIMIT 1
            ) AS first_question,
            (
                SELECT COUNT(*)
                FROM conversations
                WHERE session_id = cs.id
            ) AS message_count
        FROM chat_sessions cs
        ORDER BY
            cs.updated_at DESC,
            (SELECT MAX(id) FROM conversations WHERE session_id = cs.id) DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
