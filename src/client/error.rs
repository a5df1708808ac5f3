//! Upstream error body parsing.

use serde_json::Value;

/// Extract a human-readable message from an upstream error body.
///
/// Handles:
/// - `{"message": "..."}` (the usual ThingsBoard shape)
/// - `{"error": "..."}`
/// - `{"error": {"message": "..."}}`
///
/// Returns `None` for empty, non-JSON, or unrecognized bodies.
#[must_use]
pub fn upstream_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body.trim()).ok()?;
    extract_error_message(&json)
}

fn extract_error_message(json: &Value) -> Option<String> {
    if let Some(msg) = json.get("message").and_then(Value::as_str)
        && !msg.is_empty()
    {
        return Some(msg.to_string());
    }

    match json.get("error") {
        Some(Value::String(msg)) if !msg.is_empty() => Some(msg.clone()),
        Some(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        None => None,
    }
}
