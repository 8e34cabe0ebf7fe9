//! Error types for the VIGIL live activity bridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic reported by the OS activity service.
///
/// The text is surfaced verbatim to the caller inside `StartFailed`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct ServiceError {
    pub reason: String,
}

impl ServiceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors a bridge command can resolve with.
///
/// Each variant carries a short machine-readable wire code (see
/// [`BridgeError::code`]) and a human-readable message (`Display`).
/// None of these is fatal to the bridge; it stays usable for subsequent
/// commands after any failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// Platform version gate failed - permanent for this OS version.
    #[error("live activities are not supported on this OS version")]
    Unsupported,

    /// User/system policy gate failed - permanent until the user changes
    /// settings; not retried automatically.
    #[error("live activities are disabled by the user")]
    Disabled,

    /// Caller supplied a malformed or incomplete payload; caller must fix
    /// and resend.
    #[error("missing or invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    /// Caller invoked `update` with nothing active - a caller-logic error.
    #[error("no live activity is currently active")]
    NoActivity,

    /// The OS rejected activity creation; diagnostic surfaced, not retried.
    #[error("failed to start live activity: {reason}")]
    StartFailed { reason: String },

    /// Unknown command name.
    #[error("unknown command: {method}")]
    NotImplemented { method: String },
}

impl BridgeError {
    /// Create an InvalidArguments error.
    pub fn invalid_arguments(reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            reason: reason.into(),
        }
    }

    /// Create a StartFailed error.
    pub fn start_failed(reason: impl Into<String>) -> Self {
        Self::StartFailed {
            reason: reason.into(),
        }
    }

    /// Create a NotImplemented error.
    pub fn not_implemented(method: impl Into<String>) -> Self {
        Self::NotImplemented {
            method: method.into(),
        }
    }

    /// Short machine-readable code for the wire.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Unsupported => "UNSUPPORTED",
            BridgeError::Disabled => "DISABLED",
            BridgeError::InvalidArguments { .. } => "INVALID_ARGS",
            BridgeError::NoActivity => "NO_ACTIVITY",
            BridgeError::StartFailed { .. } => "START_FAILED",
            BridgeError::NotImplemented { .. } => "NOT_IMPLEMENTED",
        }
    }
}

/// Structured error shape delivered across the command channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Machine-readable code (e.g., "NO_ACTIVITY")
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl From<&BridgeError> for ErrorReply {
    fn from(err: &BridgeError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(BridgeError::Unsupported.code(), "UNSUPPORTED");
        assert_eq!(BridgeError::Disabled.code(), "DISABLED");
        assert_eq!(BridgeError::invalid_arguments("x").code(), "INVALID_ARGS");
        assert_eq!(BridgeError::NoActivity.code(), "NO_ACTIVITY");
        assert_eq!(BridgeError::start_failed("x").code(), "START_FAILED");
        assert_eq!(BridgeError::not_implemented("x").code(), "NOT_IMPLEMENTED");
    }

    #[test]
    fn test_start_failed_surfaces_diagnostic() {
        let err = BridgeError::start_failed("visibility budget exceeded");
        let msg = format!("{}", err);
        assert!(msg.contains("visibility budget exceeded"));
    }

    #[test]
    fn test_invalid_arguments_display() {
        let err = BridgeError::invalid_arguments("missing field `message`");
        assert!(format!("{}", err).contains("missing field `message`"));
    }

    #[test]
    fn test_error_reply_from_bridge_error() {
        let err = BridgeError::NoActivity;
        let reply = ErrorReply::from(&err);
        assert_eq!(reply.code, "NO_ACTIVITY");
        assert!(reply.message.contains("no live activity"));
    }

    #[test]
    fn test_error_reply_serialization() {
        let reply = ErrorReply::from(&BridgeError::Disabled);
        let json = serde_json::to_string(&reply).unwrap();
        assert!(json.contains("\"code\":\"DISABLED\""));
        assert!(json.contains("disabled by the user"));
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::new("process is in the background");
        assert_eq!(format!("{}", err), "process is in the background");
    }
}
