//! Lifecycle Manager
//!
//! The `Absent`/`Active` state machine that exclusively owns the opaque OS
//! activity handle. At most one handle is live at any time; it is set only
//! when `start` completes and cleared only by `end`.
//!
//! Commands are processed one at a time by the dispatcher, so the handle
//! slot sees no concurrent mutation on that path. The slot still lives
//! behind a `tokio::sync::Mutex` so that a host which delivers commands
//! concurrently cannot race two `start`s into two OS-level activities.
//! `is_supported` never touches the slot and therefore never contends.

use crate::platform::CapabilityGate;
use crate::service::{DismissalPolicy, OsActivity};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use vigil_core::{
    ActivityAttributes, ActivityContentState, ActivityId, BridgeError, BridgeResult,
};

/// Owns the zero-or-one live activity handle and drives its transitions.
pub struct LifecycleManager {
    gate: CapabilityGate,
    current: Mutex<Option<Box<dyn OsActivity>>>,
}

impl LifecycleManager {
    pub fn new(gate: CapabilityGate) -> Self {
        Self {
            gate,
            current: Mutex::new(None),
        }
    }

    /// Pure query, valid in any state: OS version gate AND user
    /// authorization. Never errors.
    pub fn is_supported(&self) -> bool {
        match self.gate.available() {
            Some(service) => service.activities_enabled(),
            None => false,
        }
    }

    /// `Absent -> Active`: gate check (version, then authorization), then
    /// ask the OS to create the activity.
    ///
    /// Rejected while `Active` - the bridge never creates a second
    /// OS-level activity. On OS failure the state stays `Absent` and the
    /// diagnostic is surfaced verbatim.
    pub async fn start(
        &self,
        attributes: ActivityAttributes,
        message: String,
    ) -> BridgeResult<ActivityId> {
        let service = self.gate.available().ok_or(BridgeError::Unsupported)?;
        if !service.activities_enabled() {
            return Err(BridgeError::Disabled);
        }

        // Held across the OS call so a concurrent start cannot slip in
        // between the emptiness check and the store.
        let mut slot = self.current.lock().await;
        if slot.is_some() {
            return Err(BridgeError::start_failed(
                "a live activity is already active",
            ));
        }

        let initial_state = ActivityContentState::in_progress(message);
        match service.request(attributes, initial_state).await {
            Ok(activity) => {
                let id = ActivityId::from(activity.id());
                info!(id = %id, "live activity started");
                *slot = Some(activity);
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "failed to start live activity");
                Err(BridgeError::start_failed(e.reason))
            }
        }
    }

    /// `Active -> Active`: replace the content state wholesale. Resolves
    /// once the OS confirms the update.
    pub async fn update(
        &self,
        message: String,
        is_error: bool,
        is_complete: bool,
    ) -> BridgeResult<()> {
        let slot = self.current.lock().await;
        let activity = slot.as_deref().ok_or(BridgeError::NoActivity)?;

        let state = ActivityContentState::new(message, is_error, is_complete);
        debug!(
            id = %activity.id(),
            message = %state.message,
            is_error = state.is_error,
            is_complete = state.is_complete,
            "live activity updated"
        );
        activity.update(state).await;
        Ok(())
    }

    /// `Active -> Absent`: terminate with the default dismissal policy and
    /// no final content state.
    ///
    /// Idempotent: a no-op success when nothing is active (the OS may have
    /// already cleared it). The owned handle is cleared regardless of the
    /// OS-reported outcome so the bridge never leaks a handle the
    /// application can no longer address.
    pub async fn end(&self) -> BridgeResult<()> {
        let mut slot = self.current.lock().await;
        let Some(activity) = slot.take() else {
            debug!("end with no live activity; nothing to do");
            return Ok(());
        };

        if let Err(e) = activity.end(None, DismissalPolicy::Default).await {
            warn!(
                id = %activity.id(),
                error = %e,
                "OS reported an error ending the live activity; clearing the handle anyway"
            );
        }
        info!(id = %activity.id(), "live activity ended");
        Ok(())
    }

    /// Whether a live activity is currently owned.
    pub async fn is_active(&self) -> bool {
        self.current.lock().await.is_some()
    }
}
