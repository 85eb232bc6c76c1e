//! Architecture explorer routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use database::ArchitectureDoc;
use serde::Deserialize;

use super::json_body;
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub component: Option<String>,
}

/// List stored component docs by name.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ArchitectureDoc>>> {
    Ok(Json(state.service.list_architecture().await?))
}

/// The stored doc for one component.
pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ArchitectureDoc>> {
    Ok(Json(state.service.get_architecture(&name).await?))
}

/// Explain a component, generating the doc on first request.
pub async fn explain(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ArchitectureDoc>> {
    let request = json_body(payload)?;

    let Some(component) = request.component else {
        return Err(ApiError::validation("Component name is required"));
    };

    Ok(Json(state.service.explain_component(&component).await?))
}
