//! Join Token Minting
//!
//! Produces HS256-signed credentials granting join access to one room for
//! one participant. The claim shape follows the realtime server's video
//! grant convention.

use crate::config::TokenConfig;
use crate::error::TokenError;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Room-scoped permissions embedded in the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoGrant {
    pub room: String,
    #[serde(rename = "roomJoin")]
    pub room_join: bool,
}

/// JWT claims for a participant join token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer: the API key
    pub iss: String,
    /// Subject: the participant identity
    pub sub: String,
    /// Display name shown to other participants
    pub name: String,
    pub nbf: i64,
    pub exp: i64,
    pub video: VideoGrant,
}

/// Mint a signed join token for `participant_name` in `room_name`.
pub fn mint_token(
    config: &TokenConfig,
    room_name: &str,
    participant_name: &str,
) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = TokenClaims {
        iss: config.api_key.clone(),
        sub: participant_name.to_string(),
        name: participant_name.to_string(),
        nbf: now.timestamp(),
        exp: (now + Duration::hours(config.token_ttl_hours)).timestamp(),
        video: VideoGrant {
            room: room_name.to_string(),
            room_join: true,
        },
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.api_secret.as_bytes()),
    )?;
    Ok(token)
}
