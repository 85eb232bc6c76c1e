//! Architecture doc persistence.

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::{ArchitectureDoc, NewArchitectureDoc};
use crate::Result;

/// Create or replace the doc for a component, returning the stored row.
pub async fn upsert_doc(pool: &SqlitePool, doc: &NewArchitectureDoc) -> Result<ArchitectureDoc> {
    let stored = sqlx::query_as::<_, ArchitectureDoc>(
        r#"
        INSERT INTO architecture_docs
            (component_name, description, dependencies, tech_stack, file_paths, code_examples)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(component_name) DO UPDATE SET
            description = excluded.description,
            dependencies = excluded.dependencies,
            tech_stack = excluded.tech_stack,
            file_paths = excluded.file_paths,
            code_examples = excluded.code_examples,
            updated_at = datetime('now')
        RETURNING id, component_name, description, dependencies, tech_stack, file_paths,
                  code_examples, created_at, updated_at
        "#,
    )
    .bind(&doc.component_name)
    .bind(&doc.description)
    .bind(Json(&doc.dependencies))
    .bind(Json(&doc.tech_stack))
    .bind(Json(&doc.file_paths))
    .bind(Json(&doc.code_examples))
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

/// Get the doc for a component, if one has been generated.
pub async fn find_doc(pool: &SqlitePool, component_name: &str) -> Result<Option<ArchitectureDoc>> {
    let doc = sqlx::query_as::<_, ArchitectureDoc>(
        r#"
        SELECT id, component_name, description, dependencies, tech_stack, file_paths,
               code_examples, created_at, updated_at
        FROM architecture_docs
        WHERE component_name = ?
        "#,
    )
    .bind(component_name)
    .fetch_optional(pool)
    .await?;

    Ok(doc)
}

/// List all docs ordered by component name.
pub async fn list_docs(pool: &SqlitePool) -> Result<Vec<ArchitectureDoc>> {
    let rows = sqlx::query_as::<_, ArchitectureDoc>(
        r#"
        SELECT id, component_name, description, dependencies, tech_stack, file_paths,
               code_examples, created_at, updated_at
        FROM architecture_docs
        ORDER BY component_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
