//! Quiz persistence.
//!
//! A quiz and its questions are written together through [`create_quiz`],
//! which runs in a single transaction.

use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{NewQuizQuestion, Quiz, QuizQuestion, QuizSummary, QuizWithQuestions};

/// Store a quiz and all of its questions atomically.
///
/// If any insert fails the transaction is rolled back and nothing is visible.
pub async fn create_quiz(
    pool: &SqlitePool,
    quiz_id: &str,
    title: &str,
    source_chat_id: Option<&str>,
    questions: &[NewQuizQuestion],
) -> Result<QuizWithQuestions> {
    let mut tx = pool.begin().await?;

    insert_quiz(&mut *tx, quiz_id, title, source_chat_id).await?;
    for (position, question) in questions.iter().enumerate() {
        insert_question(&mut *tx, quiz_id, position as i64, question).await?;
    }

    tx.commit().await?;

    tracing::debug!(quiz_id, questions = questions.len(), "Quiz stored");

    get_quiz(pool, quiz_id).await
}

async fn insert_quiz(
    conn: &mut SqliteConnection,
    quiz_id: &str,
    title: &str,
    source_chat_id: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO quizzes (id, title, source_chat_id)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(quiz_id)
    .bind(title)
    .bind(source_chat_id)
    .execute(conn)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Quiz",
                    id: quiz_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

async fn insert_question(
    conn: &mut SqliteConnection,
    quiz_id: &str,
    position: i64,
    question: &NewQuizQuestion,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO quiz_questions
            (id, quiz_id, position, text, correct_answer, explanation, source_message_id, guide_refs)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&question.id)
    .bind(quiz_id)
    .bind(position)
    .bind(&question.text)
    .bind(question.correct_answer)
    .bind(&question.explanation)
    .bind(question.source_message_id)
    .bind(question.guide_refs.as_ref().map(Json))
    .execute(conn)
    .await?;

    Ok(())
}

/// Get a quiz with its questions in insertion order.
pub async fn get_quiz(pool: &SqlitePool, quiz_id: &str) -> Result<QuizWithQuestions> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, title, source_chat_id, created_at
        FROM quizzes
        WHERE id = ?
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Quiz",
        id: quiz_id.to_string(),
    })?;

    // The source turn is a weak reference; an unresolved one leaves
    // source_question null instead of failing the read.
    let questions = sqlx::query_as::<_, QuizQuestion>(
        r#"
        SELECT
            qq.id,
            qq.quiz_id,
            qq.text,
            qq.correct_answer,
            qq.explanation,
            qq.source_message_id,
            qq.guide_refs,
            c.user_question AS source_question
        FROM quiz_questions qq
        LEFT JOIN conversations c ON c.id = qq.source_message_id
        WHERE qq.quiz_id = ?
        ORDER BY qq.position ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;

    Ok(QuizWithQuestions { quiz, questions })
}

/// List quizzes with question counts and source chat titles, newest first.
pub async fn list_quizzes(pool: &SqlitePool) -> Result<Vec<QuizSummary>> {
    let rows = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT
            q.id,
            q.title,
            q.source_chat_id,
            q.created_at,
            (SELECT COUNT(*) FROM quiz_questions WHERE quiz_id = q.id) AS question_count,
            cs.title AS chat_title
        FROM quizzes q
        LEFT JOIN chat_sessions cs ON cs.id = q.source_chat_id
        ORDER BY q.created_at DESC, q.rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete a quiz and its questions.
pub async fn delete_quiz(pool: &SqlitePool, quiz_id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM quiz_questions
        WHERE quiz_id = ?
        "#,
    )
    .bind(quiz_id)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
        r#"
        DELETE FROM quizzes
        WHERE id = ?
        "#,
    )
    .bind(quiz_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(DatabaseError::NotFound {
            entity: "Quiz",
            id: quiz_id.to_string(),
        });
    }

    tx.commit().await?;
    Ok(())
}

/// Count stored quizzes.
pub async fn count_quizzes(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM quizzes
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
