//! Question answering, search, feedback and chat history.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use database::{ChatSessionSummary, QaPair};
use onboarding::{Answer, ChatTranscript};
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub question: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub conversation_id: Option<i64>,
    pub helpful: Option<bool>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: i64,
    pub success: bool,
}

/// Answer a question, from cache when possible.
pub async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<Answer>> {
    state.authorize(&headers)?;
    let request = json_body(payload)?;

    let (Some(question), Some(session_id)) = (request.question, request.session_id) else {
        return Err(ApiError::validation("Question and sessionId are required"));
    };

    let answer = state.service.ask(&question, &session_id).await?;
    Ok(Json(answer))
}

/// Search cached question/answer pairs.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<QaPair>>> {
    let Some(q) = query.q else {
        return Err(ApiError::validation("Query parameter q is required"));
    };

    Ok(Json(state.service.search(&q).await?))
}

/// Record whether an answer helped.
pub async fn feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>> {
    state.authorize(&headers)?;
    let request = json_body(payload)?;

    let (Some(conversation_id), Some(helpful)) = (request.conversation_id, request.helpful) else {
        return Err(ApiError::validation("conversationId and helpful are required"));
    };

    let id = state
        .service
        .submit_feedback(conversation_id, helpful, request.comment.as_deref())
        .await?;

    Ok(Json(FeedbackResponse { id, success: true }))
}

/// List chat sessions, most recent first.
pub async fn list_chats(State(state): State<AppState>) -> Result<Json<Vec<ChatSessionSummary>>> {
    Ok(Json(state.service.list_sessions().await?))
}

/// A chat session with its messages.
pub async fn get_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatTranscript>> {
    Ok(Json(state.service.get_chat(&chat_id).await?))
}
