//! Setup guide persistence.

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewSetupGuide, SetupGuide};

/// Store a generated guide, returning the stored row.
pub async fn insert_guide(pool: &SqlitePool, guide: &NewSetupGuide) -> Result<SetupGuide> {
    let result = sqlx::query(
        r#"
        INSERT INTO setup_guides (title, description, content, prerequisites, difficulty, estimated_time)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guide.title)
    .bind(&guide.description)
    .bind(&guide.content)
    .bind(Json(&guide.prerequisites))
    .bind(guide.difficulty)
    .bind(&guide.estimated_time)
    .execute(pool)
    .await?;

    get_guide(pool, result.last_insert_rowid()).await
}

/// Get a guide by ID.
pub async fn get_guide(pool: &SqlitePool, id: i64) -> Result<SetupGuide> {
    sqlx::query_as::<_, SetupGuide>(
        r#"
        SELECT id, title, description, content, prerequisites, difficulty, estimated_time, created_at
        FROM setup_guides
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Guide",
        id: id.to_string(),
    })
}

/// List all guides, newest first.
pub async fn list_guides(pool: &SqlitePool) -> Result<Vec<SetupGuide>> {
    let rows = sqlx::query_as::<_, SetupGuide>(
        r#"
        SELECT id, title, description, content, prerequisites, difficulty, estimated_time, created_at
        FROM setup_guides
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
