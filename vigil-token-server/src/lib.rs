//! VIGIL Token Server
//!
//! Request/response glue over the realtime credentialing library: issues
//! signed join tokens for one room and one participant. Specified only as
//! a boundary contract; it never touches the live activity bridge.

pub mod config;
pub mod error;
pub mod routes;
pub mod token;

pub use config::{ConfigError, TokenConfig};
pub use error::TokenError;
pub use routes::{create_router, TokenResponse};
pub use token::{mint_token, TokenClaims, VideoGrant};
