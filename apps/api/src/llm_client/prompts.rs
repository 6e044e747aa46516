// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting pieces.

/// Rendered in place of any optional field the caller left empty.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Instruction line preceding every section-format contract.
pub const EXACT_FORMAT_INSTRUCTION: &str = "Respond in this EXACT format:";

/// Returns the value, or `NOT_SPECIFIED` when absent or blank.
pub fn or_not_specified(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

/// Returns the first `max_chars` characters of `text`. Never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
