//! Question/answer pair persistence.

use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::QaPair;

/// Category assigned to pairs created from generated answers.
pub const DEFAULT_CATEGORY: &str = "general";

/// Escape LIKE wildcards so the query matches as a literal substring.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Search pairs whose question or answer contains `query`, case-insensitively.
///
/// Results are ordered by descending usage count, then by insertion order.
pub async fn search(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<QaPair>> {
    let pattern = like_pattern(query);
    let rows = sqlx::query_as::<_, QaPair>(
        r#"
        SELECT id, question, answer, category, tags, usage_count, created_at
        FROM qa_pairs
        WHERE question LIKE ?1 ESCAPE '\' OR answer LIKE ?1 ESCAPE '\'
        ORDER BY usage_count DESC, id ASC
        LIMIT ?2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a pair by ID.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<QaPair> {
    sqlx::query_as::<_, QaPair>(
        r#"
        SELECT id, question, answer, category, tags, usage_count, created_at
        FROM qa_pairs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "QA pair",
        id: id.to_string(),
    })
}

/// Insert a new pair with a zero usage count, returning its ID.
pub async fn insert(
    conn: &mut SqliteConnection,
    question: &str,
    answer: &str,
    category: &str,
    tags: &[String],
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO qa_pairs (question, answer, category, tags)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(Json(tags))
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Atomically add one to a pair's usage count.
pub async fn increment_usage(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE qa_pairs
        SET usage_count = usage_count + 1
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "QA pair",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count stored pairs.
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM qa_pairs
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
