//! Token estimation for retrieval budget planning
//!
//! Hosts consume documents against a context budget measured in tokens.
//! Exact tokenizers are host-specific, so estimation here is a simple
//! character-count heuristic: tokens ~= chars / 4.

/// Characters per token assumed by the heuristic
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of a text
#[inline]
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(CHARS_PER_TOKEN)
}
