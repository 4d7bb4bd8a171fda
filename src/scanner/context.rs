//! Reflection context heuristics for strict mode

/// Characters inspected on each side of the marker
const CONTEXT_WINDOW: usize = 100;

/// Returns false when the first occurrence of `marker` sits near an href/src
/// attribute, a script or meta tag, or an HTML comment. A missing marker is
/// never a valid context.
pub fn is_valid_reflection_context(content: &str, marker: &str) -> bool {
    let Some(idx) = content.find(marker) else {
        return false;
    };

    let start = content[..idx]
        .char_indices()
        .rev()
        .nth(CONTEXT_WINDOW - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let after = idx + marker.len();
    let end = content[after..]
        .char_indices()
        .nth(CONTEXT_WINDOW)
        .map(|(i, _)| after + i)
        .unwrap_or(content.len());

    let window = &content[start..end];
    if window.contains("href=") || window.contains("src=") {
        return false;
    }

    let lower = window.to_lowercase();
    if lower.contains("<script") || lower.contains("<meta") {
        return false;
    }

    !(window.contains("<!--") || window.contains("-->"))
}
