//! Error Types for the Token Server
//!
//! Errors serialize as `{ "error": "<message>" }` with the appropriate
//! HTTP status code, matching the boundary contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-level errors for the token endpoint.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A required query parameter was absent or empty (400).
    #[error("{0} is a required query parameter")]
    MissingParam(&'static str),

    /// Token signing failed (500).
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TokenError::MissingParam(_) => StatusCode::BAD_REQUEST,
            TokenError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "token request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TokenError::Signing(err.to_string())
    }
}
