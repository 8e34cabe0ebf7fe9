//! Property tests for the command dispatcher: no command sequence may ever
//! leave more than one OS-level activity live or wedge the bridge.

use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use vigil_bridge::{CapabilityGate, CommandDispatcher, CommandReply, LifecycleManager, MIN_ACTIVITY_OS};
use vigil_test_utils::{strategies::arb_attributes, FakeActivityService};

#[derive(Debug, Clone)]
enum Cmd {
    Start,
    Update { is_error: bool, is_complete: bool },
    End,
    IsSupported,
    Unknown(String),
}

fn arb_cmd() -> impl Strategy<Value = Cmd> {
    prop_oneof![
        3 => Just(Cmd::Start),
        4 => (any::<bool>(), any::<bool>())
            .prop_map(|(is_error, is_complete)| Cmd::Update { is_error, is_complete }),
        3 => Just(Cmd::End),
        1 => Just(Cmd::IsSupported),
        1 => "[a-z]{3,10}".prop_map(Cmd::Unknown),
    ]
}

fn args_for(cmd: &Cmd, attrs: &vigil_core::ActivityAttributes, step: usize) -> (String, JsonValue) {
    let base = json!({
        "agentType": attrs.agent_type,
        "agentEmoji": attrs.agent_emoji,
        "agentName": attrs.agent_name,
        "message": format!("step {}", step),
    });
    match cmd {
        Cmd::Start => ("start".to_string(), base),
        Cmd::Update { is_error, is_complete } => {
            let mut args = base;
            args["isError"] = json!(is_error);
            args["isComplete"] = json!(is_complete);
            ("update".to_string(), args)
        }
        Cmd::End => ("end".to_string(), JsonValue::Null),
        Cmd::IsSupported => ("isSupported".to_string(), JsonValue::Null),
        Cmd::Unknown(method) => (method.clone(), JsonValue::Null),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_sequences_never_exceed_one_live_activity(
        attrs in arb_attributes(),
        cmds in proptest::collection::vec(arb_cmd(), 0..24),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let service = FakeActivityService::new();
            let dispatcher = CommandDispatcher::new(LifecycleManager::new(
                CapabilityGate::new(MIN_ACTIVITY_OS, Arc::new(service.clone())),
            ));

            for (step, cmd) in cmds.iter().enumerate() {
                let (method, args) = args_for(cmd, &attrs, step);
                let result = dispatcher.handle(&method, &args).await;

                match cmd {
                    Cmd::Unknown(name) if !matches!(
                        name.as_str(),
                        "start" | "update" | "end"
                    ) => {
                        let err = result.unwrap_err();
                        assert_eq!(err.code(), "NOT_IMPLEMENTED");
                    }
                    Cmd::IsSupported => {
                        assert_eq!(result.unwrap(), CommandReply::Bool(true));
                    }
                    Cmd::End => {
                        // End never fails, active or not.
                        result.unwrap();
                    }
                    _ => {
                        // Start and update may legitimately fail
                        // (already-active, no-activity); they must never
                        // panic or wedge.
                        let _ = result;
                    }
                }

                assert!(
                    service.live_count() <= 1,
                    "more than one OS activity live after step {}",
                    step
                );
            }

            // The bridge stays responsive after any sequence.
            let reply = dispatcher.handle("isSupported", &JsonValue::Null).await.unwrap();
            assert_eq!(reply, CommandReply::Bool(true));
        });
    }
}
