use serde_json::Value;

/// Pull a JSON object out of free-form assistant text.
///
/// Tries, in order: the whole text, the first fenced code block (with or
/// without a `json` tag), then the outermost `{ … }` span. Anything that is
/// not an object is rejected.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    parse_object(text)
        .or_else(|| fenced_block(text).and_then(parse_object))
        .or_else(|| outer_braces(text).and_then(parse_object))
}

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // Skip the info string (`json`, `JSON`, …) up to the end of that line.
    let body_start = after_fence.find('\n').map_or(0, |i| i + 1);
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
