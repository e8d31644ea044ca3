//! Inverted keyword index over document text
//!
//! Extracts keywords from document titles, headings, and prose, and
//! answers free-text queries with scored hits. Matches in a title count
//! more than matches in a heading, which count more than matches in
//! body text.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use skillpack_doc::{Document, TopicPath};

/// Score contribution of a query word found in the title
const TITLE_WEIGHT: f32 = 3.0;
/// Score contribution of a query word found in a heading
const HEADING_WEIGHT: f32 = 2.0;
/// Score contribution of a query word found in body text
const BODY_WEIGHT: f32 = 1.0;
/// Maximum score contribution per query word
const MAX_WEIGHT: f32 = TITLE_WEIGHT + HEADING_WEIGHT + BODY_WEIGHT;

/// Cap on stored body keywords per document
const BODY_KEYWORD_LIMIT: usize = 128;

/// A document as seen by the keyword index: keywords only, no body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDoc {
    /// Topic path of the source document
    pub path: TopicPath,
    /// Document title
    pub title: String,
    /// Keywords from the title
    pub title_keywords: Vec<String>,
    /// Keywords from headings
    pub heading_keywords: Vec<String>,
    /// Keywords from prose and code
    pub body_keywords: Vec<String>,
}

impl IndexedDoc {
    /// Extract an indexable view from a loaded document
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        let body = doc.body();
        let title = doc.title();

        let headings = body
            .headings
            .iter()
            .map(|h| h.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let mut body_text = body.text.clone();
        if let Some(description) = body
            .frontmatter
            .as_ref()
            .and_then(|f| f.description.as_deref())
        {
            body_text.push(' ');
            body_text.push_str(description);
        }
        for block in &body.code_blocks {
            body_text.push(' ');
            body_text.push_str(&block.code);
        }

        let mut body_keywords = extract_keywords(&body_text);
        body_keywords.truncate(BODY_KEYWORD_LIMIT);

        Self {
            path: doc.path().clone(),
            title: title.clone(),
            title_keywords: extract_keywords(&title),
            heading_keywords: extract_keywords(&headings),
            body_keywords,
        }
    }

    /// All keywords across fields (for inverted index construction)
    fn all_keywords(&self) -> impl Iterator<Item = &String> {
        self.title_keywords
            .iter()
            .chain(self.heading_keywords.iter())
            .chain(self.body_keywords.iter())
    }

    /// Score this document against query words, weighted by field
    fn matches_query(&self, query_words: &[String]) -> f32 {
        if query_words.is_empty() {
            return 0.0;
        }

        let mut score = 0.0;
        for word in query_words {
            if self.title_keywords.iter().any(|k| k.contains(word)) {
                score += TITLE_WEIGHT;
            }
            if self.heading_keywords.iter().any(|k| k.contains(word)) {
                score += HEADING_WEIGHT;
            }
            if self.body_keywords.iter().any(|k| k.contains(word)) {
                score += BODY_WEIGHT;
            }
        }

        score / (query_words.len() as f32 * MAX_WEIGHT)
    }
}

/// A scored search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Topic path of the matched document
    pub path: TopicPath,
    /// Document title
    pub title: String,
    /// Match score in `0.0..=1.0`
    pub score: f32,
    /// Query words that matched a keyword
    pub matched_keywords: Vec<String>,
}

/// Inverted keyword index
pub struct KeywordIndex {
    docs: Vec<IndexedDoc>,
    keyword_index: HashMap<String, Vec<usize>>,
}

impl Default for KeywordIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordIndex {
    /// Create empty index
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs: Vec::new(),
            keyword_index: HashMap::new(),
        }
    }

    /// Add a document to the index
    pub fn add(&mut self, doc: IndexedDoc) -> usize {
        let idx = self.docs.len();

        for keyword in doc.all_keywords() {
            self.keyword_index
                .entry(keyword.clone())
                .or_default()
                .push(idx);
        }

        debug!(path = %doc.path, idx, "indexed document keywords");
        self.docs.push(doc);
        idx
    }

    /// Search for documents matching a free-text query
    ///
    /// Returns at most `limit` hits sorted by descending score.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let query_lower = query.to_lowercase();
        let query_words: Vec<String> = query_lower
            .split_whitespace()
            .map(String::from)
            .collect();
        if query_words.is_empty() {
            return Vec::new();
        }

        let mut candidates: HashMap<usize, usize> = HashMap::new();
        for word in &query_words {
            if let Some(indices) = self.keyword_index.get(word.as_str()) {
                for &idx in indices {
                    *candidates.entry(idx).or_default() += 1;
                }
            }

            for (keyword, indices) in &self.keyword_index {
                if keyword.contains(word.as_str()) {
                    for &idx in indices {
                        *candidates.entry(idx).or_default() += 1;
                    }
                }
            }
        }

        let mut hits: Vec<SearchHit> = candidates
            .into_keys()
            .filter_map(|idx| {
                let doc = &self.docs[idx];
                let score = doc.matches_query(&query_words);
                if score > 0.0 {
                    let matched_keywords: Vec<String> = query_words
                        .iter()
                        .filter(|w| {
                            doc.all_keywords().any(|k| k.contains(w.as_str()))
                        })
                        .cloned()
                        .collect();

                    Some(SearchHit {
                        path: doc.path.clone(),
                        title: doc.title.clone(),
                        score,
                        matched_keywords,
                    })
                } else {
                    None
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.path.cmp(&b.path))
        });
        hits.truncate(limit);

        debug!(query, hits = hits.len(), "keyword search");
        hits
    }

    /// Number of indexed documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of distinct keywords
    #[must_use]
    pub fn unique_keywords(&self) -> usize {
        self.keyword_index.len()
    }
}

/// Extract keywords from text
///
/// Lowercases, splits on non-alphanumeric boundaries, drops stopwords
/// and tokens shorter than three characters, and dedupes keeping
/// first-occurrence order. Order matters: body keywords are capped, so
/// truncation must drop the words a document mentions last, not the
/// ones that sort last.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|w| is_valid_keyword(w))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Split text into lowercase tokens on non-alphanumeric boundaries
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == '_' {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Check if a token is a valid keyword
fn is_valid_keyword(token: &str) -> bool {
    const STOPWORDS: &[&str] = &[
        "the", "and", "but", "for", "with", "from", "was", "are", "were", "been",
        "have", "has", "had", "does", "did", "will", "would", "could", "should",
        "may", "might", "must", "shall", "can", "need", "this", "that", "these",
        "those", "its", "which", "what", "who", "whom", "whose", "when", "where",
        "why", "how", "not", "yes", "all", "some", "none", "each", "every", "both",
        "few", "more", "most", "other", "such", "you", "your", "they", "them",
    ];

    token.len() >= 3 && !STOPWORDS.contains(&token)
}
