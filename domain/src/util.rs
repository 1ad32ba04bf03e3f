//! Shared utility functions.

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Condense free-form agent output into a single-line summary.
///
/// Runs of whitespace (including newlines) collapse to one space. When the
/// result is longer than `max_bytes` it is cut on a character boundary and
/// suffixed with `...`; the suffix counts towards `max_bytes`.
pub fn summarize(text: &str, max_bytes: usize) -> String {
    const ELLIPSIS: &str = "...";

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() <= max_bytes {
        return collapsed;
    }
    if max_bytes < ELLIPSIS.len() {
        return truncate_str(&collapsed, max_bytes).to_string();
    }
    let kept = truncate_str(&collapsed, max_bytes - ELLIPSIS.len()).trim_end();
    format!("{}{}", kept, ELLIPSIS)
}
