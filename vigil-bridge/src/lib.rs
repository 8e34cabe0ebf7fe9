//! VIGIL Bridge - Live Activity Lifecycle Bridge
//!
//! Bridges an application layer to an OS-managed, persistent on-screen
//! status surface ("live activity"). The bridge accepts lifecycle commands
//! over an asynchronous call/response channel, validates platform and
//! authorization preconditions, owns exactly one opaque OS activity handle,
//! and reports outcomes back to the caller.
//!
//! ## Architecture
//!
//! - [`dispatch::CommandDispatcher`] - validates command payloads and routes
//!   them to the lifecycle manager; one command is processed at a time.
//! - [`lifecycle::LifecycleManager`] - the `Absent`/`Active` state machine
//!   that exclusively owns the OS handle.
//! - [`service::ActivityService`] / [`service::OsActivity`] - the seam to
//!   the OS activity service; swap in [`service::NoopActivityService`] on
//!   hosts without the activity surface.
//! - [`platform::CapabilityGate`] - the single per-command evaluation point
//!   for the platform version gate.

pub mod dispatch;
pub mod lifecycle;
pub mod platform;
pub mod service;

pub use dispatch::{BridgeHandle, ChannelClosed, CommandDispatcher, CommandReply, CommandRequest};
pub use lifecycle::LifecycleManager;
pub use platform::{CapabilityGate, OsVersion, MIN_ACTIVITY_OS};
pub use service::{ActivityService, DismissalPolicy, NoopActivityService, OsActivity};
