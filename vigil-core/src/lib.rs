//! VIGIL Core - Activity Data Types
//!
//! Pure data structures shared by the lifecycle bridge and its collaborators.
//! This crate contains ONLY data types and policy helpers - no I/O, no OS
//! calls, no channel plumbing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod error;

pub use error::{BridgeError, BridgeResult, ErrorReply, ServiceError};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// OS-issued identifier for one live activity.
///
/// Opaque to the bridge; surfaced to the caller once, at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ActivityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ActivityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// ACTIVITY DATA MODEL
// ============================================================================

/// Immutable identity data for one live activity, fixed at creation.
///
/// Identifies what kind of long-running agent task the activity represents;
/// never changes for the lifetime of one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAttributes {
    /// Type of agent (e.g., "build", "reviewer", "planner")
    pub agent_type: String,
    /// Emoji shown next to the agent in the activity surface
    pub agent_emoji: String,
    /// Display name of the agent
    pub agent_name: String,
}

impl ActivityAttributes {
    pub fn new(
        agent_type: impl Into<String>,
        agent_emoji: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            agent_type: agent_type.into(),
            agent_emoji: agent_emoji.into(),
            agent_name: agent_name.into(),
        }
    }
}

/// Mutable progress payload of a live activity, replaced wholesale on each
/// update.
///
/// The `timestamp` is set by the lifecycle manager at the moment of each
/// state transition, never supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityContentState {
    /// Latest observable progress or outcome message
    pub message: String,
    /// Whether the task has hit an error
    pub is_error: bool,
    /// Whether the task has finished
    pub is_complete: bool,
    /// When this state was produced (bridge-set)
    pub timestamp: Timestamp,
}

impl ActivityContentState {
    /// Build a content state stamped with the current time.
    pub fn new(message: impl Into<String>, is_error: bool, is_complete: bool) -> Self {
        Self {
            message: message.into(),
            is_error,
            is_complete,
            timestamp: Utc::now(),
        }
    }

    /// Build the initial in-progress state (both flags false).
    pub fn in_progress(message: impl Into<String>) -> Self {
        Self::new(message, false, false)
    }

    /// Derive the render phase for this state.
    ///
    /// `is_complete` is authoritative over `is_error` when both are set.
    pub fn phase(&self) -> ActivityPhase {
        if self.is_complete {
            ActivityPhase::Complete
        } else if self.is_error {
            ActivityPhase::Error
        } else {
            ActivityPhase::InProgress
        }
    }
}

// ============================================================================
// PRESENTATION INTERFACE (read-only)
// ============================================================================

/// Terminal-render phase derived from a content state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityPhase {
    /// Task is still running
    InProgress,
    /// Task finished successfully (wins over Error when both flags are set)
    Complete,
    /// Task hit an error
    Error,
}

/// The three visual variants a presentation layer must provide.
///
/// Rendering itself is out of scope; this enum only names the variants the
/// snapshot drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationVariant {
    /// Full lock-screen / banner layout
    Expanded,
    /// Compact status-bar-adjacent layout
    Compact,
    /// Minimal glyph-only layout
    Minimal,
}

/// Read-only view handed to the presentation layer per render.
///
/// The presentation layer has no write access to activity state; it renders
/// its variants solely from `is_complete` / `is_error` / `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnapshot {
    pub attributes: ActivityAttributes,
    pub state: ActivityContentState,
}

impl ActivitySnapshot {
    pub fn new(attributes: ActivityAttributes, state: ActivityContentState) -> Self {
        Self { attributes, state }
    }

    pub fn phase(&self) -> ActivityPhase {
        self.state.phase()
    }
}
