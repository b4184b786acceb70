use serde_json::Value;

/// Text of the first assistant message in a thread message listing.
///
/// Accepts `{"data": [...]}` or a bare array. Content is flattened from the
/// shapes the service uses: plain strings, `{"type":"text","text":{"value":…}}`,
/// and nested `text` / `value` / `content` fields or arrays.
pub(super) fn first_assistant_text(listing: &Value) -> Option<String> {
    let messages = listing
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| listing.as_array())?;

    messages
        .iter()
        .filter(|m| m.get("role").and_then(Value::as_str) == Some("assistant"))
        .map(|m| flatten(m.get("content").unwrap_or(&Value::Null)))
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
}

fn flatten(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(flatten)
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => ["text", "value", "content"]
            .iter()
            .find_map(|key| map.get(*key))
            .map(flatten)
            .unwrap_or_default(),
        _ => String::new(),
    }
}
