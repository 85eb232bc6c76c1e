//! Question resolution against the Q/A cache.

use database::{conversation, feedback, qa_pair, ContextRef, DatabaseError, QaPair};
use serde::Serialize;
use tracing::info;

use crate::{prompts, require_text, Onboarding, Result};

/// Candidates fetched from the cache per question.
const SEARCH_LIMIT: i64 = 5;
/// Candidates passed to the generator as context on a miss.
const CONTEXT_LIMIT: usize = 3;
/// Candidates surfaced as related questions.
const RELATED_LIMIT: usize = 3;
/// Rows returned by the search endpoint.
pub const SEARCH_ENDPOINT_LIMIT: i64 = 10;

/// Result of resolving a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub answer: String,
    pub conversation_id: i64,
    #[serde(rename = "context")]
    pub context_used: Vec<ContextRef>,
    pub related_questions: Vec<String>,
}

enum Resolution {
    Cached { qa_id: i64, answer: String },
    Generated { answer: String, context: Vec<ContextRef> },
}

impl Resolution {
    fn answer(&self) -> &str {
        match self {
            Resolution::Cached { answer, .. } | Resolution::Generated { answer, .. } => answer,
        }
    }
}

/// Whether a cached pair is an exact case-insensitive match for a question.
fn is_exact_match(candidate: &QaPair, question: &str) -> bool {
    candidate.question.to_lowercase() == question.to_lowercase()
}

impl Onboarding {
    /// Answer a question within a session.
    ///
    /// An exact case-insensitive match on a cached question is served
    /// verbatim without calling the generator. Otherwise the answer is
    /// generated with up to three similar pairs as context and cached as a new
    /// pair. All writes commit together once the answer is known, so a failed
    /// generation leaves the store untouched.
    pub async fn ask(&self, question: &str, session_id: &str) -> Result<Answer> {
        let message = "Question and sessionId are required";
        require_text(question, message)?;
        require_text(session_id, message)?;

        let similar = qa_pair::search(self.db.pool(), question, SEARCH_LIMIT).await?;
        let related_questions: Vec<String> = similar
            .iter()
            .take(RELATED_LIMIT)
            .map(|qa| qa.question.clone())
            .collect();

        let resolution = match similar.first() {
            Some(top) if is_exact_match(top, question) => Resolution::Cached {
                qa_id: top.id,
                answer: top.answer.clone(),
            },
            _ => {
                let context = &similar[..similar.len().min(CONTEXT_LIMIT)];
                let answer = self
                    .generate_text(&prompts::answer_prompt(question, context))
                    .await?;
                Resolution::Generated {
                    answer,
                    context: context.iter().map(|qa| ContextRef::similar(qa.id)).collect(),
                }
            }
        };

        let mut tx = self.db.begin().await?;

        let context_used = match &resolution {
            Resolution::Cached { qa_id, .. } => {
                qa_pair::increment_usage(&mut *tx, *qa_id).await?;
                vec![ContextRef::cached(*qa_id)]
            }
            Resolution::Generated { answer, context } => {
                qa_pair::insert(&mut *tx, question, answer, qa_pair::DEFAULT_CATEGORY, &[]).await?;
                context.clone()
            }
        };

        let conversation_id = conversation::append_turn(
            &mut *tx,
            session_id,
            question,
            resolution.answer(),
            &context_used,
        )
        .await?;

        tx.commit().await.map_err(DatabaseError::from)?;

        info!(
            session_id,
            conversation_id,
            cached = matches!(resolution, Resolution::Cached { .. }),
            context = context_used.len(),
            "Question answered"
        );

        let answer = match resolution {
            Resolution::Cached { answer, .. } | Resolution::Generated { answer, .. } => answer,
        };

        Ok(Answer {
            answer,
            conversation_id,
            context_used,
            related_questions,
        })
    }

    /// Search cached Q/A pairs by literal substring.
    pub async fn search(&self, query: &str) -> Result<Vec<QaPair>> {
        require_text(query, "Search query is required")?;
        Ok(qa_pair::search(self.db.pool(), query, SEARCH_ENDPOINT_LIMIT).await?)
    }

    /// Record feedback on a conversation turn.
    pub async fn submit_feedback(
        &self,
        conversation_id: i64,
        helpful: bool,
        comment: Option<&str>,
    ) -> Result<i64> {
        let comment = comment.filter(|c| !c.trim().is_empty());
        let id = feedback::insert_feedback(self.db.pool(), conversation_id, helpful, comment).await?;
        info!(conversation_id, helpful, "Feedback recorded");
        Ok(id)
    }
}
