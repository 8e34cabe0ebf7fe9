//! Platform Capability Gate
//!
//! The activity surface only exists above a minimum OS version. Rather
//! than scattering version conditionals through the lifecycle logic, the
//! gate is evaluated at a single point per command: [`CapabilityGate::available`]
//! either yields the activity service or nothing.

use crate::service::ActivityService;
use std::fmt;
use std::sync::Arc;

/// OS version as reported by the host, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
}

impl OsVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Minimum OS version with the live activity surface.
pub const MIN_ACTIVITY_OS: OsVersion = OsVersion::new(16, 2);

/// Version-gated access to the OS activity service.
///
/// Owns the reported host version and the service; `available` is the
/// capability check - `None` below [`MIN_ACTIVITY_OS`], the service
/// otherwise.
pub struct CapabilityGate {
    os_version: OsVersion,
    service: Arc<dyn ActivityService>,
}

impl CapabilityGate {
    pub fn new(os_version: OsVersion, service: Arc<dyn ActivityService>) -> Self {
        Self {
            os_version,
            service,
        }
    }

    /// The single per-command evaluation point for the version gate.
    pub fn available(&self) -> Option<&dyn ActivityService> {
        if self.os_version >= MIN_ACTIVITY_OS {
            Some(self.service.as_ref())
        } else {
            None
        }
    }

    pub fn os_version(&self) -> OsVersion {
        self.os_version
    }
}
