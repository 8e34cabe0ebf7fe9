//! OS Activity Service Seam
//!
//! Traits the lifecycle manager consumes to talk to the OS activity
//! service, plus a first-class no-op implementation for hosts without the
//! activity surface.
//!
//! The handle returned by [`ActivityService::request`] is deliberately
//! type-erased: the concrete OS handle type only exists above a minimum OS
//! version, so the bridge holds it behind `Box<dyn OsActivity>` and checks
//! capability at the single point of use.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;
use vigil_core::{ActivityAttributes, ActivityContentState, ServiceError, Timestamp};

// ============================================================================
// DISMISSAL POLICY
// ============================================================================

/// OS rule governing how long a terminated activity remains visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissalPolicy {
    /// OS default: the activity stays on the surface briefly after ending
    Default,
    /// Remove the activity as soon as it ends
    Immediate,
    /// Keep the activity visible until the given time
    After(Timestamp),
}

// ============================================================================
// TRAITS
// ============================================================================

/// Opaque reference to exactly one OS-tracked activity.
///
/// Exclusively owned by the lifecycle manager; never shared, never copied.
#[async_trait]
pub trait OsActivity: Send + Sync {
    /// OS-issued identifier string, surfaced to the caller at creation.
    fn id(&self) -> &str;

    /// Replace the activity's content state wholesale.
    ///
    /// Asynchronous with no return value; resolves once the OS confirms
    /// the update.
    async fn update(&self, state: ActivityContentState);

    /// Ask the OS to terminate the activity.
    ///
    /// The manager logs and ignores the error: termination is treated as
    /// always eventually succeeding from the bridge's point of view.
    async fn end(
        &self,
        final_state: Option<ActivityContentState>,
        policy: DismissalPolicy,
    ) -> Result<(), ServiceError>;
}

/// The OS activity service consumed by the lifecycle manager.
#[async_trait]
pub trait ActivityService: Send + Sync {
    /// Authorization query: has the user enabled the activity surface?
    fn activities_enabled(&self) -> bool;

    /// Create a new OS-tracked activity from attributes and an initial
    /// content state. Fails with the OS diagnostic text.
    async fn request(
        &self,
        attributes: ActivityAttributes,
        initial_state: ActivityContentState,
    ) -> Result<Box<dyn OsActivity>, ServiceError>;
}

// ============================================================================
// NO-OP SERVICE
// ============================================================================

/// Stand-in service for hosts without the activity surface.
///
/// Logs every transition and fabricates identifiers without ever touching
/// an OS. This is an explicit construction-time choice, never a silent
/// fallback for the real handle-owning service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActivityService;

#[async_trait]
impl ActivityService for NoopActivityService {
    fn activities_enabled(&self) -> bool {
        true
    }

    async fn request(
        &self,
        attributes: ActivityAttributes,
        initial_state: ActivityContentState,
    ) -> Result<Box<dyn OsActivity>, ServiceError> {
        let id = format!("activity_{}", Uuid::new_v4().simple());
        info!(
            id = %id,
            agent_name = %attributes.agent_name,
            message = %initial_state.message,
            "no-op live activity started"
        );
        Ok(Box::new(NoopActivity { id }))
    }
}

struct NoopActivity {
    id: String,
}

#[async_trait]
impl OsActivity for NoopActivity {
    fn id(&self) -> &str {
        &self.id
    }

    async fn update(&self, state: ActivityContentState) {
        info!(
            id = %self.id,
            message = %state.message,
            is_error = state.is_error,
            is_complete = state.is_complete,
            "no-op live activity updated"
        );
    }

    async fn end(
        &self,
        _final_state: Option<ActivityContentState>,
        _policy: DismissalPolicy,
    ) -> Result<(), ServiceError> {
        info!(id = %self.id, "no-op live activity ended");
        Ok(())
    }
}
