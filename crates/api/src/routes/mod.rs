//! Route handlers for the onboarding API.

pub mod architecture;
pub mod guides;
pub mod health;
pub mod questions;
pub mod quizzes;

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Questions and chat history
        .route("/api/questions/ask", post(questions::ask))
        .route("/api/questions/search", get(questions::search))
        .route("/api/questions/feedback", post(questions::feedback))
        .route("/api/questions/chats", get(questions::list_chats))
        .route("/api/questions/chats/:chat_id", get(questions::get_chat))
        // Setup guides
        .route("/api/guides", get(guides::list))
        .route("/api/guides/generate", post(guides::generate))
        .route("/api/guides/:id", get(guides::get))
        // Architecture explorer
        .route("/api/architecture", get(architecture::list))
        .route("/api/architecture/explain", post(architecture::explain))
        .route("/api/architecture/:name", get(architecture::get))
        // Quizzes
        .route("/api/quizzes", get(quizzes::list))
        .route("/api/quizzes/generate", post(quizzes::generate))
        .route("/api/quizzes/:id", get(quizzes::get).delete(quizzes::delete))
        .route("/api/quizzes/:id/grade", post(quizzes::grade))
        // Health check
        .route("/api/health", get(health::health))
}

/// Unwrap a JSON body, turning a rejection into a validation error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

/// A JSON success marker.
pub(crate) fn success() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true }))
}
