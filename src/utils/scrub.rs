use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Markers after which a credential value follows (token endpoint, agent and
/// gateway error bodies echo these back).
const MARKER_PATTERNS: [&str; 10] = [
    "Bearer ",
    "bearer ",
    "access_token=",
    "client_secret=",
    "\"access_token\":\"",
    "\"access_token\": \"",
    "\"client_secret\":\"",
    "\"auth_token\":\"",
    "\"token\":\"",
    "AccountSid=",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '+' | '/' | '=')
}

fn scrub_after_marker(scrubbed: &mut String, marker: &str) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let value_start = search_from + rel + marker.len();
        let value_len: usize = scrubbed[value_start..]
            .chars()
            .take_while(|c| is_secret_char(*c))
            .map(char::len_utf8)
            .sum();

        if value_len == 0 {
            search_from = value_start;
            continue;
        }

        scrubbed.replace_range(value_start..value_start + value_len, REDACTED);
        search_from = value_start + REDACTED.len();
    }
}

/// Redact bearer tokens and credential fields from remote error text.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !MARKER_PATTERNS.iter().any(|m| input.contains(m)) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in MARKER_PATTERNS {
        scrub_after_marker(&mut scrubbed, marker);
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets and cap length so remote bodies are safe to log.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    let trimmed = scrubbed.trim();
    if trimmed.chars().count() <= MAX_API_ERROR_CHARS {
        return trimmed.to_string();
    }
    let end = trimmed
        .char_indices()
        .nth(MAX_API_ERROR_CHARS)
        .map_or(trimmed.len(), |(idx, _)| idx);
    format!("{}...", &trimmed[..end])
}

/// Read and sanitize the body of a failed response.
pub async fn error_body(response: reqwest::Response) -> String {
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
    sanitize_api_error(&body)
}
