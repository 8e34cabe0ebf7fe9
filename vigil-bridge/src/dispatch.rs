//! Command Dispatcher
//!
//! Receives named commands with JSON argument payloads from the
//! application layer, validates argument shape synchronously, routes to
//! the lifecycle manager, and delivers the outcome back over a
//! call/response channel.
//!
//! ## Protocol
//!
//! | method        | required args                                      | success reply |
//! |---------------|----------------------------------------------------|---------------|
//! | `isSupported` | none                                               | boolean       |
//! | `start`       | `agentType`, `agentEmoji`, `agentName`, `message`  | identifier    |
//! | `update`      | the four strings + optional `isError`/`isComplete` | empty         |
//! | `end`         | none                                               | empty         |
//!
//! Anything else resolves with `NOT_IMPLEMENTED`. Argument validation
//! happens before the lifecycle manager is touched; every other outcome is
//! delivered once the OS call completes.

use crate::lifecycle::LifecycleManager;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use vigil_core::{ActivityAttributes, ActivityId, BridgeError, BridgeResult, ErrorReply};

// ============================================================================
// REPLY AND REQUEST TYPES
// ============================================================================

/// Success value of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    /// Identifier of the freshly created activity (`start`)
    Id(ActivityId),
    /// Support query answer (`isSupported`)
    Bool(bool),
    /// Commands that return no value (`update`, `end`)
    Empty,
}

impl CommandReply {
    /// Wire representation of the reply.
    pub fn into_value(self) -> JsonValue {
        match self {
            CommandReply::Id(id) => JsonValue::String(id.to_string()),
            CommandReply::Bool(b) => JsonValue::Bool(b),
            CommandReply::Empty => JsonValue::Null,
        }
    }
}

/// One in-flight command on the channel.
pub struct CommandRequest {
    pub method: String,
    pub args: JsonValue,
    /// Resolved exactly once, when the command completes.
    pub reply: oneshot::Sender<BridgeResult<CommandReply>>,
}

/// The caller's side of the command channel went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("command channel closed")]
pub struct ChannelClosed;

// ============================================================================
// ARGUMENT PAYLOADS
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartArgs {
    agent_type: String,
    agent_emoji: String,
    agent_name: String,
    message: String,
}

// Attribute fields are required for shape parity with `start`, but the
// attributes themselves are fixed at creation; only the dynamic fields
// feed the update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateArgs {
    #[allow(dead_code)]
    agent_type: String,
    #[allow(dead_code)]
    agent_emoji: String,
    #[allow(dead_code)]
    agent_name: String,
    message: String,
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    is_complete: bool,
}

fn parse_args<T: DeserializeOwned>(args: &JsonValue) -> BridgeResult<T> {
    serde_json::from_value(args.clone()).map_err(|e| BridgeError::invalid_arguments(e.to_string()))
}

// ============================================================================
// DISPATCHER
// ============================================================================

/// Routes validated commands to the lifecycle manager.
pub struct CommandDispatcher {
    manager: LifecycleManager,
}

impl CommandDispatcher {
    pub fn new(manager: LifecycleManager) -> Self {
        Self { manager }
    }

    /// Handle one command. Invoked once per incoming command; the reply is
    /// a success value or a structured error, never both.
    pub async fn handle(&self, method: &str, args: &JsonValue) -> BridgeResult<CommandReply> {
        match method {
            "isSupported" => Ok(CommandReply::Bool(self.manager.is_supported())),
            "start" => {
                let args: StartArgs = parse_args(args)?;
                let attributes = ActivityAttributes::new(
                    args.agent_type,
                    args.agent_emoji,
                    args.agent_name,
                );
                let id = self.manager.start(attributes, args.message).await?;
                Ok(CommandReply::Id(id))
            }
            "update" => {
                let args: UpdateArgs = parse_args(args)?;
                self.manager
                    .update(args.message, args.is_error, args.is_complete)
                    .await?;
                Ok(CommandReply::Empty)
            }
            "end" => {
                self.manager.end().await?;
                Ok(CommandReply::Empty)
            }
            other => Err(BridgeError::not_implemented(other)),
        }
    }

    /// Handle one command and fold the outcome into its wire shape: the
    /// success value, or a `{ code, message }` object.
    pub async fn handle_to_wire(&self, method: &str, args: &JsonValue) -> JsonValue {
        match self.handle(method, args).await {
            Ok(reply) => reply.into_value(),
            Err(e) => serde_json::to_value(ErrorReply::from(&e)).unwrap_or(JsonValue::Null),
        }
    }

    /// Spawn the dispatcher loop and hand back the caller's side of the
    /// channel.
    ///
    /// The loop processes one request at a time, which is what gives the
    /// lifecycle manager its no-concurrent-mutation guarantee on the
    /// normal path. The loop stops when every [`BridgeHandle`] is dropped.
    pub fn serve(self, capacity: usize) -> BridgeHandle {
        let (tx, mut rx) = mpsc::channel::<CommandRequest>(capacity);
        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let result = self.handle(&request.method, &request.args).await;
                if request.reply.send(result).is_err() {
                    warn!(method = %request.method, "caller dropped before receiving the reply");
                }
            }
            debug!("command channel closed; dispatcher stopping");
        });
        BridgeHandle { tx }
    }
}

/// Caller's side of the command channel.
#[derive(Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<CommandRequest>,
}

impl BridgeHandle {
    /// Issue one command and await its outcome.
    ///
    /// The outer error means the bridge itself is gone; the inner result
    /// is the command's own success or structured failure.
    pub async fn call(
        &self,
        method: impl Into<String>,
        args: JsonValue,
    ) -> Result<BridgeResult<CommandReply>, ChannelClosed> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CommandRequest {
                method: method.into(),
                args,
                reply,
            })
            .await
            .map_err(|_| ChannelClosed)?;
        rx.await.map_err(|_| ChannelClosed)
    }
}
