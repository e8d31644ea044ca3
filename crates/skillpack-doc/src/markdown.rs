//! Markdown document body parser
//!
//! Uses pulldown-cmark to turn raw document text into a structured
//! [`DocBody`]: title, heading outline, prose text, and code blocks.
//! Frontmatter is optional; malformed frontmatter is treated as body.

use std::collections::BTreeMap;

use pulldown_cmark::{CodeBlockKind, Event, Parser as MdParser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// Parsed document body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocBody {
    /// Document title (first H1)
    pub title: Option<String>,
    /// Frontmatter metadata (if any)
    pub frontmatter: Option<DocFrontmatter>,
    /// Heading outline in document order
    pub headings: Vec<Heading>,
    /// Code blocks extracted from the document
    pub code_blocks: Vec<CodeBlock>,
    /// Prose text with markup and code blocks stripped
    pub text: String,
}

/// Heading within a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text
    pub text: String,
}

/// Code block extracted from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language identifier (e.g., "ts", "json")
    pub language: Option<String>,
    /// Code content
    pub code: String,
    /// Nearest preceding heading
    pub context: Option<String>,
}

/// YAML frontmatter recognized at the top of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocFrontmatter {
    /// Declared title
    pub title: Option<String>,
    /// One-line description
    pub description: Option<String>,
    /// Any further keys, kept as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl DocBody {
    /// Parse raw markdown into a structured body
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        // Lenient: malformed frontmatter is treated as ordinary body text
        let (frontmatter, body) = match split_frontmatter(raw) {
            Some((yaml, rest)) => match serde_yaml::from_str(yaml) {
                Ok(parsed) => (Some(parsed), rest),
                Err(_) => (None, raw),
            },
            None => (None, raw),
        };

        let parser = MdParser::new(body);

        let mut headings: Vec<Heading> = Vec::new();
        let mut code_blocks: Vec<CodeBlock> = Vec::new();
        let mut text = String::new();
        let mut current_heading: Option<Heading> = None;
        let mut current_code: Option<(Option<String>, String)> = None;
        let mut last_heading_text: Option<String> = None;

        for event in parser {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current_heading = Some(Heading {
                        level: level as u8,
                        text: String::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(heading) = current_heading.take() {
                        last_heading_text = Some(heading.text.clone());
                        headings.push(heading);
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang.to_string())
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    current_code = Some((language, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, code)) = current_code.take() {
                        code_blocks.push(CodeBlock {
                            language,
                            code,
                            context: last_heading_text.clone(),
                        });
                    }
                }
                Event::Text(chunk) => {
                    if let Some((_, ref mut code)) = current_code {
                        code.push_str(&chunk);
                    } else if let Some(ref mut heading) = current_heading {
                        heading.text.push_str(&chunk);
                    } else {
                        push_word(&mut text, &chunk);
                    }
                }
                Event::Code(code) => {
                    if let Some(ref mut heading) = current_heading {
                        heading.text.push_str(&code);
                    } else {
                        push_word(&mut text, &code);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some(ref mut heading) = current_heading {
                        heading.text.push(' ');
                    }
                }
                _ => {}
            }
        }

        let title = headings
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.clone());

        Self {
            title,
            frontmatter,
            headings,
            code_blocks,
            text,
        }
    }

    /// Title to show for this document: first H1, else frontmatter title
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or_else(|| self.frontmatter.as_ref().and_then(|f| f.title.as_deref()))
    }

    /// Number of whitespace-separated words in the prose text
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Append a text chunk with a separating space
fn push_word(buf: &mut String, chunk: &str) {
    if !buf.is_empty() && !buf.ends_with(' ') {
        buf.push(' ');
    }
    buf.push_str(chunk.trim());
}

/// Split a document into its raw YAML frontmatter and body
///
/// Returns `Some((yaml, body))` when the document opens with a `---`
/// fence closed by a matching fence on its own line, `None` otherwise.
/// The YAML is returned unvalidated so callers can deserialize into
/// their own frontmatter shape.
#[must_use]
pub fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))?;

    let mut search_from = 0;
    while let Some(found) = rest[search_from..].find("\n---") {
        let at = search_from + found;
        let after = &rest[at + 4..];
        // Closing fence must occupy its own line
        if after.is_empty() || after.starts_with('\n') || after.starts_with('\r') {
            let yaml = &rest[..at];
            let body = after.trim_start_matches(['\r', '\n']);
            return Some((yaml, body));
        }
        search_from = at + 1;
    }
    None
}
