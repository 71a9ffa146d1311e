//! Static override table.
//!
//! An override pattern matches a descriptor when every key of the pattern is present in the
//! serialized descriptor with an equal value. The first matching entry wins.

use std::sync::LazyLock;

use serde_json::{Map, Value, json};

use crate::schema::{Descriptor, Optionality};

/// What to do with a matching descriptor.
#[derive(Debug, Clone, Copy)]
pub enum OverrideAction {
    /// Emit nothing.
    Skip,
    /// Replace the descriptor before classification.
    Reshape(fn(&Descriptor) -> Descriptor),
}

#[derive(Debug)]
struct StaticOverride {
    pattern: Map<String, Value>,
    action: OverrideAction,
}

fn pattern(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

static OVERRIDES: LazyLock<Vec<StaticOverride>> = LazyLock::new(|| {
    vec![
        // converted to a URL at run time, outside what a declaration can describe
        StaticOverride {
            pattern: pattern(json!({
                "id": "ImageData",
                "isInstanceOf": "ImageData",
                "postprocess": "convertImageDataToURL",
                "type": "object",
            })),
            action: OverrideAction::Skip,
        },
        StaticOverride {
            pattern: pattern(json!({"unsupported": true})),
            action: OverrideAction::Skip,
        },
        StaticOverride {
            pattern: pattern(json!({"name": "onMessageExternal", "type": "function"})),
            action: OverrideAction::Reshape(reshape_send_response),
        },
    ]
});

/// `sendResponse` takes a single optional `any` response.
fn reshape_send_response(desc: &Descriptor) -> Descriptor {
    let mut reshaped = desc.clone();
    if let Some(params) = reshaped.parameters.as_mut() {
        for param in params.iter_mut().filter(|p| p.name.as_deref() == Some("sendResponse")) {
            param.parameters = Some(vec![Descriptor {
                name: Some("response".to_string()),
                kind: Some("any".to_string()),
                optional: Some(Optionality::Flag(true)),
                ..Descriptor::default()
            }]);
        }
    }
    reshaped
}

fn matches_pattern(pattern: &Map<String, Value>, candidate: &Map<String, Value>) -> bool {
    pattern
        .iter()
        .all(|(key, expected)| candidate.get(key) == Some(expected))
}

/// Find the override for a descriptor, if any.
pub fn find_override(desc: &Descriptor) -> Option<OverrideAction> {
    // cheap exits before serializing
    if desc.is_unsupported() {
        return Some(OverrideAction::Skip);
    }
    if desc.id.is_none() && desc.name.is_none() {
        return None;
    }

    let Ok(Value::Object(candidate)) = serde_json::to_value(desc) else {
        return None;
    };
    OVERRIDES
        .iter()
        .find(|o| matches_pattern(&o.pattern, &candidate))
        .map(|o| o.action)
}
