//! Quiz routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use database::{QuizSummary, QuizWithQuestions};
use onboarding::{GradeReport, SubmittedAnswer};
use serde::Deserialize;

use super::{json_body, success};
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub chat_id: Option<String>,
    pub question_count: Option<usize>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub answers: Option<Vec<SubmittedAnswer>>,
}

/// List quizzes, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<QuizSummary>>> {
    Ok(Json(state.service.list_quizzes().await?))
}

/// A quiz with its questions.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuizWithQuestions>> {
    Ok(Json(state.service.get_quiz(&id).await?))
}

/// Generate a quiz from a chat session.
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<QuizWithQuestions>> {
    state.authorize(&headers)?;
    let request = json_body(payload)?;

    let Some(chat_id) = request.chat_id else {
        return Err(ApiError::validation("chatId is required"));
    };

    let quiz = state
        .service
        .generate_quiz(&chat_id, request.question_count, request.title.as_deref())
        .await?;

    Ok(Json(quiz))
}

/// Grade submitted answers. Nothing is stored.
pub async fn grade(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: std::result::Result<Json<GradeRequest>, JsonRejection>,
) -> Result<Json<GradeReport>> {
    state.authorize(&headers)?;
    let request = json_body(payload)?;

    let Some(answers) = request.answers else {
        return Err(ApiError::validation("answers array is required"));
    };

    Ok(Json(state.service.grade_quiz(&id, &answers).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.authorize(&headers)?;
    state.service.delete_quiz(&id).await?;
    Ok(success())
}
