//! Onboarding Buddy HTTP API.
//!
//! Serves the question cache, chat history, setup guides, architecture
//! explorer and quizzes as JSON over HTTP.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::http::{header, Method};
use database::Database;
use grok_generator::GrokGenerator;
use onboarding::Onboarding;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting onboarding API");

    // Connect to database
    if let Some(dir) = config.database_dir() {
        std::fs::create_dir_all(&dir)?;
    }
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Generation backend
    let generator = GrokGenerator::from_env()?;

    let service = Onboarding::new(db, Arc::new(generator))
        .with_generation_timeout(config.generation_timeout);
    info!(
        generator = service.generator_name(),
        timeout_secs = config.generation_timeout.as_secs(),
        "Generation backend ready"
    );

    if config.api_token.is_none() {
        info!("ONBOARDING_API_TOKEN not set, mutating endpoints are open");
    }

    // Build application state
    let state = AppState::new(service, config.api_token.clone());

    let cors = CorsLayer::new()
        .allow_origin(config.client_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router
    let app = routes::router()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    info!(addr = %config.addr, "Onboarding API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
