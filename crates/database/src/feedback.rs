//! Feedback persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Feedback;

/// Record feedback for a conversation turn, returning the feedback ID.
pub async fn insert_feedback(
    pool: &SqlitePool,
    conversation_id: i64,
    helpful: bool,
    comment: Option<&str>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO feedback (conversation_id, helpful, comment)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(conversation_id)
    .bind(helpful)
    .bind(comment)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Conversation",
                    id: conversation_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(result.last_insert_rowid())
}

/// List feedback for a conversation turn, oldest first.
pub async fn list_feedback(pool: &SqlitePool, conversation_id: i64) -> Result<Vec<Feedback>> {
    let rows = sqlx::query_as::<_, Feedback>(
        r#"
        SELECT id, conversation_id, helpful, comment, created_at
        FROM feedback
        WHERE conversation_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
