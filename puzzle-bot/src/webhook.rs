//! Slash-command webhook.
//!
//! The chat platform POSTs the command invocation here as a form payload; the
//! response body is the acknowledgment shown in the invoking channel. Command
//! registration on the platform side is out of scope.

use crate::commands::CommandHandler;
use axum::{extract::State, http::StatusCode, routing::post, Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub commands: Arc<CommandHandler>,
    /// When set, incoming requests must carry this token.
    pub command_token: Option<String>,
}

/// The fields of the platform's slash-command payload we act on.
#[derive(Debug, Deserialize)]
pub struct SlashCommandRequest {
    pub channel_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SlashCommandResponse {
    pub response_type: String,
    pub text: String,
}

/// Builds the webhook router.
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/commands/chesspuzzle", post(handle_command))
        .with_state(state)
}

async fn handle_command(
    State(state): State<WebhookState>,
    Form(request): Form<SlashCommandRequest>,
) -> Result<Json<SlashCommandResponse>, StatusCode> {
    if let Some(expected) = &state.command_token {
        if &request.token != expected {
            warn!(channel_id = %request.channel_id, "Rejected slash command with bad token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    info!(channel_id = %request.channel_id, text = %request.text, "Slash command received");

    let text = state.commands.handle(&request.channel_id, &request.text).await;
    Ok(Json(SlashCommandResponse {
        response_type: "ephemeral".to_string(),
        text,
    }))
}
