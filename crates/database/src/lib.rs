//! SQLite persistence layer for Onboarding Buddy.
//!
//! This crate provides async database operations for the knowledge base
//! (question/answer pairs, setup guides, architecture docs), chat sessions and
//! their conversation turns, feedback, and quizzes, using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:onboarding.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Record a turn; the session is created on first use
//!     let mut tx = db.begin().await?;
//!     conversation::append_turn(&mut tx, "session-1", "How do I build?", "Run make.", &[]).await?;
//!     tx.commit().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod architecture;
pub mod chat_session;
pub mod conversation;
pub mod error;
pub mod feedback;
pub mod guide;
pub mod models;
pub mod qa_pair;
pub mod quiz;

pub use error::{DatabaseError, Result};
pub use models::{
    ArchitectureDoc, ChatSession, ChatSessionSummary, CodeExample, ContextKind, ContextRef,
    ConversationTurn, Difficulty, Feedback, GuideRef, NewArchitectureDoc, NewQuizQuestion,
    NewSetupGuide, QaPair, Quiz, QuizQuestion, QuizSummary, QuizWithQuestions, SetupGuide,
};

pub use sqlx::types::Json;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// A transaction on the database pool.
pub type Transaction = sqlx::Transaction<'static, sqlx::Sqlite>;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent request processing.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/onboarding.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        // Every connection to an in-memory database opens a separate database.
        let pool_size = if url.contains(":memory:") || url.contains("mode=memory") {
            1
        } else {
            Self::DEFAULT_POOL_SIZE
        };
        Self::connect_with_pool_size(url, pool_size).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Open a migrated in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect("sqlite::memory:").await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Begin a transaction.
    pub async fn begin(&self) -> Result<Transaction> {
        Ok(self.pool.begin().await?)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::in_memory().await.unwrap()
    }

    async fn append(db: &Database, session: &str, question: &str, answer: &str) -> i64 {
        let mut tx = db.begin().await.unwrap();
        let id = conversation::append_turn(&mut tx, session, question, answer, &[])
            .await
            .unwrap();
        tx.commit().await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_qa_pair_search_and_usage() {
        let db = test_db().await;

        let mut conn = db.pool().acquire().await.unwrap();
        let first = qa_pair::insert(&mut conn, "How do I run tests?", "Use cargo test.", "general", &[])
            .await
            .unwrap();
        let second = qa_pair::insert(&mut conn, "Where are the tests?", "Under tests/.", "general", &[])
            .await
            .unwrap();
        qa_pair::insert(&mut conn, "Deploy steps", "Push to main.", "general", &[])
            .await
            .unwrap();
        drop(conn);

        // Case-insensitive substring match on question or answer
        let hits = qa_pair::search(db.pool(), "TESTS", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, first);
        assert_eq!(hits[0].usage_count, 0);

        // Usage reorders results
        let mut conn = db.pool().acquire().await.unwrap();
        qa_pair::increment_usage(&mut conn, second).await.unwrap();
        drop(conn);
        let hits = qa_pair::search(db.pool(), "tests", 5).await.unwrap();
        assert_eq!(hits[0].id, second);
        assert_eq!(hits[0].usage_count, 1);

        // Wildcards are literal
        let hits = qa_pair::search(db.pool(), "%", 5).await.unwrap();
        assert!(hits.is_empty());

        let missing = qa_pair::get(db.pool(), 999).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_append_turn_creates_session_and_sets_title_once() {
        let db = test_db().await;

        assert!(chat_session::find_session(db.pool(), "s1").await.unwrap().is_none());

        let long_question = "x".repeat(80);
        let first = append(&db, "s1", &long_question, "a1").await;
        let second = append(&db, "s1", "Second question", "a2").await;
        assert!(second > first);

        let session = chat_session::require_session(db.pool(), "s1").await.unwrap();
        assert_eq!(session.title, Some("x".repeat(60)));

        let recent = conversation::recent_turns(db.pool(), "s1", 10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, second);

        let transcript = conversation::transcript(db.pool(), "s1", 10).await.unwrap();
        assert_eq!(transcript[0].id, first);
        assert_eq!(transcript[1].user_question, "Second question");
    }

    #[tokio::test]
    async fn test_list_sessions_counts_and_first_question() {
        let db = test_db().await;

        append(&db, "a", "first in a", "x").await;
        append(&db, "a", "second in a", "x").await;
        append(&db, "b", "only in b", "x").await;

        let sessions = chat_session::list_sessions(db.pool()).await.unwrap();
        assert_eq!(sessions.len(), 2);
        // b has the latest turn
        assert_eq!(sessions[0].session.id, "b");
        assert_eq!(sessions[0].message_count, 1);
        assert_eq!(sessions[1].first_question.as_deref(), Some("first in a"));
        assert_eq!(sessions[1].message_count, 2);
    }

    #[tokio::test]
    async fn test_require_unknown_session_is_not_found() {
        let db = test_db().await;
        let result = chat_session::require_session(db.pool(), "nope").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_feedback_requires_existing_turn() {
        let db = test_db().await;
        let turn = append(&db, "s1", "q", "a").await;

        let id = feedback::insert_feedback(db.pool(), turn, true, Some("nice"))
            .await
            .unwrap();
        feedback::insert_feedback(db.pool(), turn, false, None).await.unwrap();
        let entries = feedback::list_feedback(db.pool(), turn).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, id);
        assert!(entries[0].helpful);

        let result = feedback::insert_feedback(db.pool(), 4242, true, None).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_quiz_create_list_delete() {
        let db = test_db().await;
        let turn = append(&db, "s1", "What is X?", "X is a thing.").await;

        let questions = vec![
            NewQuizQuestion {
                id: "q-1".to_string(),
                text: "X is a thing.".to_string(),
                correct_answer: true,
                explanation: "Stated in chat.".to_string(),
                source_message_id: Some(turn),
                guide_refs: Some(vec![GuideRef {
                    guide_id: 1,
                    section: None,
                }]),
            },
            NewQuizQuestion {
                id: "q-2".to_string(),
                text: "X is not a thing.".to_string(),
                correct_answer: false,
                explanation: String::new(),
                source_message_id: Some(9999),
                guide_refs: None,
            },
        ];

        let quiz = quiz::create_quiz(db.pool(), "quiz-1", "Quiz", Some("s1"), &questions)
            .await
            .unwrap();
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].id, "q-1");
        assert_eq!(quiz.questions[0].source_question.as_deref(), Some("What is X?"));
        // Dangling weak reference degrades to null
        assert_eq!(quiz.questions[1].source_question, None);

        let summaries = quiz::list_quizzes(db.pool()).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].question_count, 2);
        assert_eq!(summaries[0].chat_title.as_deref(), Some("What is X?"));

        quiz::delete_quiz(db.pool(), "quiz-1").await.unwrap();
        assert_eq!(quiz::count_quizzes(db.pool()).await.unwrap(), 0);
        let orphans = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quiz_questions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);

        let result = quiz::get_quiz(db.pool(), "quiz-1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        let result = quiz::delete_quiz(db.pool(), "quiz-1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_quiz_create_rolls_back_on_failure() {
        let db = test_db().await;

        // Duplicate question ids violate the primary key on the second insert
        let question = NewQuizQuestion {
            id: "dup".to_string(),
            text: "t".to_string(),
            correct_answer: true,
            explanation: String::new(),
            source_message_id: None,
            guide_refs: None,
        };
        let result =
            quiz::create_quiz(db.pool(), "quiz-1", "Quiz", None, &[question.clone(), question]).await;
        assert!(result.is_err());
        assert_eq!(quiz::count_quizzes(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_guide_and_architecture_roundtrip() {
        let db = test_db().await;

        let guide = guide::insert_guide(
            db.pool(),
            &NewSetupGuide {
                title: "Local setup".to_string(),
                description: "Get running".to_string(),
                content: "# Steps".to_string(),
                prerequisites: vec!["git".to_string()],
                difficulty: Difficulty::Intermediate,
                estimated_time: "15 minutes".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(guide.difficulty, Difficulty::Intermediate);
        assert_eq!(guide.prerequisites.0, vec!["git".to_string()]);
        assert_eq!(guide::list_guides(db.pool()).await.unwrap().len(), 1);
        assert!(guide::get_guide(db.pool(), guide.id + 1).await.unwrap_err().is_not_found());

        let mut doc = NewArchitectureDoc {
            component_name: "api".to_string(),
            description: "HTTP layer".to_string(),
            dependencies: vec!["database".to_string()],
            tech_stack: vec!["axum".to_string()],
            file_paths: vec![],
            code_examples: vec![],
        };
        let first = architecture::upsert_doc(db.pool(), &doc).await.unwrap();
        doc.description = "HTTP routes".to_string();
        let second = architecture::upsert_doc(db.pool(), &doc).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.description, "HTTP routes");
        assert_eq!(architecture::list_docs(db.pool()).await.unwrap().len(), 1);
        assert!(architecture::find_doc(db.pool(), "web").await.unwrap().is_none());
    }
}
