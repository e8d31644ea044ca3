//! Snippet extraction for search excerpts
//!
//! Picks the first prose paragraph of a document that contains a
//! matched query word, skipping frontmatter, headings, and fenced
//! code.

use skillpack_doc::split_frontmatter;

/// Pick the leading matched paragraph of a raw document
///
/// Falls back to the first paragraph when no word matches, and to an
/// empty string for documents with no prose at all. Matching is
/// case-insensitive; `words` are expected lowercase, as the keyword
/// index reports them.
#[must_use]
pub fn leading_matched_paragraph(raw: &str, words: &[String], max_chars: usize) -> String {
    let body = split_frontmatter(raw).map_or(raw, |(_, body)| body);
    let paragraphs = prose_paragraphs(body);

    let chosen = paragraphs
        .iter()
        .find(|p| {
            let lower = p.to_lowercase();
            words.iter().any(|w| lower.contains(w.as_str()))
        })
        .or_else(|| paragraphs.first());

    chosen.map_or_else(String::new, |p| truncate_at_word(p, max_chars))
}

/// Split markdown into prose paragraphs
///
/// Heading lines and fenced code blocks are dropped; consecutive prose
/// lines join into one paragraph.
fn prose_paragraphs(body: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_fence = false;

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(trimmed);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

/// Truncate to at most `max_chars` characters, preferring a word
/// boundary for the cut
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let hard: String = text.chars().take(max_chars).collect();
    match hard.rfind(char::is_whitespace) {
        Some(cut) if cut > 0 => format!("{}...", hard[..cut].trim_end()),
        _ => format!("{hard}..."),
    }
}
