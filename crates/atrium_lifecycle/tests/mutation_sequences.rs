//! Property tests for attribute mutation sequences.
//!
//! Random sequences of put/remove operations against one session are checked
//! against a plain `HashMap` model: the host must emit exactly the
//! added/replaced/removed events the model predicts, in order, and the
//! session's final keys must match the model's.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use atrium_lifecycle::events::ScopeEvent;
use atrium_lifecycle::host::ScopeHost;
use atrium_lifecycle::schedule::{OnAttributeAdded, OnAttributeRemoved, OnAttributeReplaced};

/// Small key space so sequences hit add, replace, and remove paths often.
const KEYS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Debug, Clone)]
enum Op {
    Put { key: usize, value: i32 },
    Remove { key: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..KEYS.len(), any::<i32>()).prop_map(|(key, value)| Op::Put { key, value }),
        (0..KEYS.len()).prop_map(|key| Op::Remove { key }),
    ]
}

/// Expected event trace derived from a model map.
fn apply_to_model(model: &mut HashMap<&'static str, i32>, op: &Op) -> Option<String> {
    match op {
        Op::Put { key, value } => {
            let key = KEYS[*key];
            match model.insert(key, *value) {
                Some(old) => Some(format!("replace:{key}:{old}->{value}")),
                None => Some(format!("add:{key}:{value}")),
            }
        }
        Op::Remove { key } => {
            let key = KEYS[*key];
            model.remove(key).map(|old| format!("remove:{key}:{old}"))
        }
    }
}

fn render(event: &ScopeEvent) -> String {
    let int = |value: &atrium_scope::attributes::AttributeValue| {
        value.downcast_ref::<i32>().copied().expect("test values are i32")
    };
    match event {
        ScopeEvent::AttributeAdded { key, value, .. } => {
            format!("add:{key}:{}", int(value))
        }
        ScopeEvent::AttributeReplaced { key, old, new, .. } => {
            format!("replace:{key}:{}->{}", int(old), int(new))
        }
        ScopeEvent::AttributeRemoved { key, value, .. } => {
            format!("remove:{key}:{}", int(value))
        }
        other => panic!("unexpected event: {other}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn event_trace_matches_model(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let host = ScopeHost::new("app");
        let trace = Arc::new(Mutex::new(Vec::new()));

        let trace_clone = Arc::clone(&trace);
        host.listeners()
            .register::<(OnAttributeAdded, OnAttributeRemoved, OnAttributeReplaced), _>(
                "tracer",
                move |event: &ScopeEvent| {
                    trace_clone.lock().unwrap().push(render(event));
                },
            )
            .unwrap();

        host.start().unwrap();
        let session = host.create_session().unwrap();

        let mut model = HashMap::new();
        let mut expected = Vec::new();

        for op in &ops {
            if let Some(event) = apply_to_model(&mut model, op) {
                expected.push(event);
            }
            match op {
                Op::Put { key, value } => {
                    host.put_attribute(&session, KEYS[*key], *value).unwrap();
                }
                Op::Remove { key } => {
                    host.remove_attribute(&session, KEYS[*key]).unwrap();
                }
            }
        }

        prop_assert_eq!(&*trace.lock().unwrap(), &expected);

        let mut actual_keys = host.attribute_keys(&session).unwrap();
        actual_keys.sort_unstable();
        let mut model_keys: Vec<String> = model.keys().map(|k| (*k).to_owned()).collect();
        model_keys.sort_unstable();
        prop_assert_eq!(actual_keys, model_keys);
    }
}
