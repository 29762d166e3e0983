mod analytics;
mod assistant;
mod auth;
mod config;
mod db;
mod drives;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod students;
mod users;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{bootstrap_admin, create_pool, run_migrations, BOOTSTRAP_ADMIN_USERNAME};
use crate::llm_client::LlmClient;
use crate::resume::scoring::KeywordResumeScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement Portal API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    if bootstrap_admin(&db, &config.admin_bootstrap_password).await? {
        info!("Created bootstrap account '{BOOTSTRAP_ADMIN_USERNAME}'");
    }

    let llm = LlmClient::new(
        config.llm_api_key.clone(),
        &config.llm_base_url,
        &config.llm_model,
    )?;
    if config.llm_api_key.is_none() {
        info!("OPENAI_API_KEY not set; assistant replies will carry an inline error");
    } else {
        info!("LLM client initialized (model: {})", config.llm_model);
    }

    let resume_scorer = Arc::new(KeywordResumeScorer);

    let state = AppState {
        db,
        llm,
        config: config.clone(),
        resume_scorer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
