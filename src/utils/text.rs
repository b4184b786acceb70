/// Marker appended when text is cut to fit a character budget.
pub const ELLIPSIS: char = '…';

/// Number of Unicode scalar values in `s` (what the SMS cap counts).
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut `s` so the result, ellipsis included, is at most `max_chars` long.
///
/// Text that already fits is returned unchanged. Trailing whitespace before
/// the marker is dropped so lines do not end in `" …"`.
#[must_use]
pub fn fit_with_ellipsis(s: &str, max_chars: usize) -> String {
    if char_len(s) <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let keep = max_chars - 1;
    let end = s.char_indices().nth(keep).map_or(s.len(), |(idx, _)| idx);
    let mut out = s[..end].trim_end().to_string();
    out.push(ELLIPSIS);
    out
}
