//! HTTP Routes
//!
//! - `GET /get-token?roomName=&participantName=` - mint a join token
//! - `GET /health/ping` - liveness check

use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::token::mint_token;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuery {
    #[serde(default)]
    room_name: Option<String>,
    #[serde(default)]
    participant_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub server_url: String,
    pub room_name: String,
    pub participant_name: String,
    pub participant_token: String,
}

/// GET /get-token - issue a join token for one participant in one room.
pub async fn get_token(
    State(config): State<Arc<TokenConfig>>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, TokenError> {
    let room_name = query
        .room_name
        .filter(|v| !v.is_empty())
        .ok_or(TokenError::MissingParam("roomName"))?;
    let participant_name = query
        .participant_name
        .filter(|v| !v.is_empty())
        .ok_or(TokenError::MissingParam("participantName"))?;

    let participant_token = mint_token(&config, &room_name, &participant_name)?;
    info!(room = %room_name, participant = %participant_name, "issued join token");

    Ok(Json(TokenResponse {
        server_url: config.server_url.clone(),
        room_name,
        participant_name,
        participant_token,
    }))
}

/// GET /health/ping - simple pong response.
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// Build the token server router.
pub fn create_router(config: TokenConfig) -> Router {
    Router::new()
        .route("/get-token", get(get_token))
        .route("/health/ping", get(ping))
        .with_state(Arc::new(config))
}
