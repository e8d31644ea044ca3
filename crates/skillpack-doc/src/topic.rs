//! Topic paths for addressing documents within a bundle
//!
//! A [`TopicPath`] names a document by its section directory and topic
//! slug, e.g. `02-handbook/everyday-types`. Paths are slash-separated,
//! validated, and map one-to-one onto markdown files in the bundle.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical file extension for documents in a bundle
pub const DOC_EXTENSION: &str = "md";

/// File extensions recognized as documents
pub const DOC_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Hierarchical topic path (e.g., `02-handbook/everyday-types`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicPath(Vec<String>);

impl TopicPath {
    /// Create path from segments
    #[inline]
    #[must_use]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path has no segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First segment, which is the section directory name
    #[inline]
    #[must_use]
    pub fn section_dir(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Final segment, which is the topic slug
    #[inline]
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Parent path (all segments except the last)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Append a segment, returning a new path
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Check if this path is a prefix of another
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }

    /// Derive a topic path from a file path relative to the bundle root
    ///
    /// Strips the markdown extension from the final component and
    /// validates every segment.
    ///
    /// # Errors
    /// Returns error if the file is not markdown or a segment is invalid
    pub fn from_rel_file(path: &Path) -> Result<Self, TopicPathError> {
        let extension = path.extension().and_then(|e| e.to_str());
        if !extension.is_some_and(|e| DOC_EXTENSIONS.contains(&e)) {
            return Err(TopicPathError::NotMarkdown(path.to_path_buf()));
        }
        let stem = path
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        stem.parse()
    }

    /// File path of this topic relative to the bundle root
    #[must_use]
    pub fn to_rel_file(&self) -> PathBuf {
        let mut path: PathBuf = self.0.iter().collect();
        path.set_extension(DOC_EXTENSION);
        path
    }
}

impl Display for TopicPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl FromStr for TopicPath {
    type Err = TopicPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TopicPathError::Empty);
        }
        let segments: Vec<String> = s.split('/').map(String::from).collect();
        for segment in &segments {
            if segment.is_empty() {
                return Err(TopicPathError::EmptySegment);
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'))
            {
                return Err(TopicPathError::InvalidSegment(segment.clone()));
            }
        }
        Ok(Self(segments))
    }
}

/// Errors that can occur when constructing topic paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicPathError {
    /// Path string was empty
    #[error("topic path is empty")]
    Empty,

    /// Path contains an empty segment (leading, trailing, or doubled slash)
    #[error("topic path contains empty segment")]
    EmptySegment,

    /// Segment contains characters outside the slug alphabet
    #[error("invalid path segment: {0}")]
    InvalidSegment(String),

    /// File does not carry the markdown extension
    #[error("not a markdown file: {0}")]
    NotMarkdown(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_and_display_roundtrip() {
        let path: TopicPath = "02-handbook/everyday-types".parse().unwrap();
        assert_eq!(path.to_string(), "02-handbook/everyday-types");
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn section_dir_and_topic() {
        let path: TopicPath = "05-tutorials/migrating-from-javascript".parse().unwrap();
        assert_eq!(path.section_dir(), Some("05-tutorials"));
        assert_eq!(path.topic(), Some("migrating-from-javascript"));
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!("".parse::<TopicPath>(), Err(TopicPathError::Empty));
    }

    #[test]
    fn parse_rejects_empty_segment() {
        assert_eq!(
            "02-handbook//narrowing".parse::<TopicPath>(),
            Err(TopicPathError::EmptySegment)
        );
        assert_eq!(
            "/02-handbook".parse::<TopicPath>(),
            Err(TopicPathError::EmptySegment)
        );
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        let result = "02-handbook/Everyday Types".parse::<TopicPath>();
        assert_eq!(
            result,
            Err(TopicPathError::InvalidSegment("Everyday Types".to_string()))
        );
    }

    #[test]
    fn from_rel_file_strips_extension() {
        let path = Path::new("03-reference/utility-types.md");
        let topic = TopicPath::from_rel_file(path).unwrap();
        assert_eq!(topic.to_string(), "03-reference/utility-types");
    }

    #[test]
    fn from_rel_file_accepts_long_extension() {
        let path = Path::new("03-reference/utility-types.markdown");
        let topic = TopicPath::from_rel_file(path).unwrap();
        assert_eq!(topic.to_string(), "03-reference/utility-types");
    }

    #[test]
    fn from_rel_file_rejects_non_markdown() {
        let path = Path::new("03-reference/utility-types.txt");
        assert!(matches!(
            TopicPath::from_rel_file(path),
            Err(TopicPathError::NotMarkdown(_))
        ));
    }

    #[test]
    fn to_rel_file_appends_extension() {
        let topic: TopicPath = "01-getting-started/ts-for-js-programmers".parse().unwrap();
        assert_eq!(
            topic.to_rel_file(),
            PathBuf::from("01-getting-started/ts-for-js-programmers.md")
        );
    }

    #[test]
    fn prefix_relationships() {
        let section: TopicPath = "04-modules".parse().unwrap();
        let topic: TopicPath = "04-modules/esm-and-commonjs".parse().unwrap();
        assert!(section.is_prefix_of(&topic));
        assert!(!topic.is_prefix_of(&section));
        assert!(topic.is_prefix_of(&topic));
    }

    #[test]
    fn parent_walks_up() {
        let topic: TopicPath = "06-declaration-files/publishing".parse().unwrap();
        let parent = topic.parent().unwrap();
        assert_eq!(parent.to_string(), "06-declaration-files");
        assert!(parent.parent().unwrap().is_empty());
    }

    #[test]
    fn child_appends() {
        let section: TopicPath = "07-javascript-interop".parse().unwrap();
        let topic = section.child("jsdoc-reference");
        assert_eq!(topic.to_string(), "07-javascript-interop/jsdoc-reference");
    }

    fn slug_strategy() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9_-]{0,24}"
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_paths(segments in prop::collection::vec(slug_strategy(), 1..4)) {
            let path = TopicPath::from_segments(segments);
            let parsed: TopicPath = path.to_string().parse().unwrap();
            prop_assert_eq!(path, parsed);
        }

        #[test]
        fn file_roundtrip(segments in prop::collection::vec(slug_strategy(), 1..4)) {
            let path = TopicPath::from_segments(segments);
            let file = path.to_rel_file();
            let back = TopicPath::from_rel_file(&file).unwrap();
            prop_assert_eq!(path, back);
        }
    }
}
