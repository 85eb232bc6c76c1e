//! Setup guide routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use database::SetupGuide;
use serde::Deserialize;

use super::json_body;
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub topic: Option<String>,
}

/// List guides, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SetupGuide>>> {
    Ok(Json(state.service.list_guides().await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<SetupGuide>> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::NotFound(format!("Guide not found: {id}")));
    };

    Ok(Json(state.service.get_guide(id).await?))
}

/// Generate and store a guide for a topic.
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<SetupGuide>> {
    state.authorize(&headers)?;
    let request = json_body(payload)?;

    let Some(topic) = request.topic else {
        return Err(ApiError::validation("Topic is required"));
    };

    Ok(Json(state.service.generate_guide(&topic).await?))
}
