//! Test utilities for VIGIL
//!
//! Provides a recording fake of the OS activity service plus proptest
//! generators for activity payloads. The fake is shared-state: clone it,
//! hand one clone to the bridge, and inspect the other from the test.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use vigil_bridge::service::{ActivityService, DismissalPolicy, OsActivity};
use vigil_core::{ActivityAttributes, ActivityContentState, ServiceError};

// ============================================================================
// FAKE OS ACTIVITY SERVICE
// ============================================================================

#[derive(Default)]
struct Inner {
    enabled: AtomicBool,
    fail_next_start: Mutex<Option<String>>,
    fail_end: Mutex<Option<String>>,
    requests: Mutex<Vec<(ActivityAttributes, ActivityContentState)>>,
    updates: Mutex<Vec<ActivityContentState>>,
    ends: Mutex<Vec<(Option<ActivityContentState>, DismissalPolicy)>>,
}

/// In-memory stand-in for the OS activity service.
///
/// Records every creation, update, and termination it sees, and can be
/// told to report the surface as disabled or to fail the next creation or
/// any termination.
#[derive(Clone, Default)]
pub struct FakeActivityService {
    inner: Arc<Inner>,
}

impl FakeActivityService {
    /// A fake with the activity surface enabled.
    pub fn new() -> Self {
        let service = Self::default();
        service.inner.enabled.store(true, Ordering::SeqCst);
        service
    }

    /// A fake with the activity surface disabled by the user.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Make the next `request` fail with the given OS diagnostic.
    pub fn fail_next_start(&self, reason: impl Into<String>) {
        *self
            .inner
            .fail_next_start
            .lock()
            .expect("lock poisoned") = Some(reason.into());
    }

    /// Make every `end` report the given OS error.
    pub fn fail_end(&self, reason: impl Into<String>) {
        *self.inner.fail_end.lock().expect("lock poisoned") = Some(reason.into());
    }

    /// Every (attributes, initial state) pair the service created.
    pub fn requests(&self) -> Vec<(ActivityAttributes, ActivityContentState)> {
        self.inner.requests.lock().expect("lock poisoned").clone()
    }

    /// Every content state applied through `update`, in order.
    pub fn updates(&self) -> Vec<ActivityContentState> {
        self.inner.updates.lock().expect("lock poisoned").clone()
    }

    /// Every termination, with its final state and dismissal policy.
    pub fn ends(&self) -> Vec<(Option<ActivityContentState>, DismissalPolicy)> {
        self.inner.ends.lock().expect("lock poisoned").clone()
    }

    /// Activities created and not yet ended.
    pub fn live_count(&self) -> usize {
        let created = self.inner.requests.lock().expect("lock poisoned").len();
        let ended = self.inner.ends.lock().expect("lock poisoned").len();
        created.saturating_sub(ended)
    }
}

#[async_trait]
impl ActivityService for FakeActivityService {
    fn activities_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    async fn request(
        &self,
        attributes: ActivityAttributes,
        initial_state: ActivityContentState,
    ) -> Result<Box<dyn OsActivity>, ServiceError> {
        if let Some(reason) = self
            .inner
            .fail_next_start
            .lock()
            .expect("lock poisoned")
            .take()
        {
            return Err(ServiceError::new(reason));
        }

        self.inner
            .requests
            .lock()
            .expect("lock poisoned")
            .push((attributes, initial_state));

        Ok(Box::new(FakeOsActivity {
            id: format!("activity_{}", Uuid::new_v4().simple()),
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct FakeOsActivity {
    id: String,
    inner: Arc<Inner>,
}

#[async_trait]
impl OsActivity for FakeOsActivity {
    fn id(&self) -> &str {
        &self.id
    }

    async fn update(&self, state: ActivityContentState) {
        self.inner
            .updates
            .lock()
            .expect("lock poisoned")
            .push(state);
    }

    async fn end(
        &self,
        final_state: Option<ActivityContentState>,
        policy: DismissalPolicy,
    ) -> Result<(), ServiceError> {
        self.inner
            .ends
            .lock()
            .expect("lock poisoned")
            .push((final_state, policy));

        match self.inner.fail_end.lock().expect("lock poisoned").clone() {
            Some(reason) => Err(ServiceError::new(reason)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod strategies {
    use proptest::prelude::*;
    use vigil_core::{ActivityAttributes, ActivityContentState};

    /// Arbitrary activity attributes with a plausible agent shape.
    pub fn arb_attributes() -> impl Strategy<Value = ActivityAttributes> {
        (
            "[a-z]{3,12}",
            prop_oneof![Just("🛠"), Just("🤖"), Just("🔍"), Just("📝")],
            "[A-Z][a-z]{2,10}",
        )
            .prop_map(|(agent_type, emoji, name)| ActivityAttributes::new(agent_type, emoji, name))
    }

    /// Arbitrary content state (timestamp is always bridge-set).
    pub fn arb_content_state() -> impl Strategy<Value = ActivityContentState> {
        ("[ -~]{0,64}", any::<bool>(), any::<bool>())
            .prop_map(|(message, is_error, is_complete)| {
                ActivityContentState::new(message, is_error, is_complete)
            })
    }
}
