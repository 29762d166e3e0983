// Role-aware chat endpoint over the LLM client.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::llm_client::prompts::Persona;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    /// Defaults to the persona of the caller's role.
    pub persona: Option<Persona>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub persona: Persona,
    pub answer: String,
}

/// POST /api/v1/assistant/chat
///
/// Assistant failures are returned as the answer text, not as an error status.
pub async fn handle_chat(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation("prompt must not be empty".to_string()));
    }
    let persona = req.persona.unwrap_or_else(|| Persona::from(ctx.role()));
    let answer = state.llm.ask(prompt, persona).await;
    Ok(Json(ChatResponse { persona, answer }))
}
