//! Sections: ordered, numbered groupings of documents
//!
//! A bundle arranges its documents into numbered section directories
//! named `NN-slug` (e.g. `01-getting-started`). Numbering starts at 01
//! and is contiguous, and every document belongs to exactly one section.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::topic::TopicPath;

/// Section slugs of the canonical bundle layout, in order
pub const CANONICAL_SECTION_SLUGS: [&str; 8] = [
    "getting-started",
    "handbook",
    "reference",
    "modules",
    "tutorials",
    "declaration-files",
    "javascript-interop",
    "project-configuration",
];

/// Two-digit section number (01 through 99)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SectionNumber(u8);

impl SectionNumber {
    /// Create a section number
    ///
    /// # Errors
    /// Returns error if the number is zero or above 99
    pub fn new(n: u8) -> Result<Self, SectionError> {
        if n == 0 || n > 99 {
            return Err(SectionError::NumberOutOfRange(n));
        }
        Ok(Self(n))
    }

    /// Numeric value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The number that follows this one, if still in range
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }
}

impl Display for SectionNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A section directory name of the form `NN-slug`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionName {
    number: SectionNumber,
    slug: String,
}

impl SectionName {
    /// Create a section name from parts
    ///
    /// # Errors
    /// Returns error if the slug is empty or not a valid slug
    pub fn new(number: SectionNumber, slug: impl Into<String>) -> Result<Self, SectionError> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err(SectionError::EmptySlug);
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'))
        {
            return Err(SectionError::InvalidSlug(slug));
        }
        Ok(Self { number, slug })
    }

    /// Section number
    #[inline]
    #[must_use]
    pub const fn number(&self) -> SectionNumber {
        self.number
    }

    /// Section slug (name without the numeric prefix)
    #[inline]
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl Display for SectionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.number, self.slug)
    }
}

impl FromStr for SectionName {
    type Err = SectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, slug) = s
            .split_once('-')
            .ok_or_else(|| SectionError::MalformedName(s.to_string()))?;
        if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(SectionError::MalformedName(s.to_string()));
        }
        let n: u8 = digits
            .parse()
            .map_err(|_| SectionError::MalformedName(s.to_string()))?;
        let number = SectionNumber::new(n)?;
        Self::new(number, slug)
    }
}

impl TryFrom<String> for SectionName {
    type Error = SectionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SectionName> for String {
    fn from(name: SectionName) -> Self {
        name.to_string()
    }
}

/// Section directory names of the canonical layout, in order
#[must_use]
pub fn canonical_sections() -> Vec<SectionName> {
    CANONICAL_SECTION_SLUGS
        .iter()
        .enumerate()
        .filter_map(|(i, slug)| {
            let number = SectionNumber::new(u8::try_from(i + 1).ok()?).ok()?;
            SectionName::new(number, *slug).ok()
        })
        .collect()
}

/// A named section holding an ordered list of topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    name: SectionName,
    topics: Vec<TopicPath>,
}

impl Section {
    /// Create an empty section
    #[inline]
    #[must_use]
    pub const fn new(name: SectionName) -> Self {
        Self {
            name,
            topics: Vec::new(),
        }
    }

    /// Create a section with topics
    #[inline]
    #[must_use]
    pub fn with_topics(name: SectionName, topics: Vec<TopicPath>) -> Self {
        Self { name, topics }
    }

    /// Section directory name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &SectionName {
        &self.name
    }

    /// Section number
    #[inline]
    #[must_use]
    pub const fn number(&self) -> SectionNumber {
        self.name.number()
    }

    /// Topics in order
    #[inline]
    #[must_use]
    pub fn topics(&self) -> &[TopicPath] {
        &self.topics
    }

    /// Number of topics
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Check if section has no topics
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Append a topic
    pub fn push_topic(&mut self, topic: TopicPath) {
        self.topics.push(topic);
    }

    /// Check if the section holds the given topic
    #[must_use]
    pub fn contains(&self, topic: &TopicPath) -> bool {
        self.topics.iter().any(|t| t == topic)
    }
}

/// Errors that can occur when working with sections
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// Section number outside 01..=99
    #[error("section number out of range: {0}")]
    NumberOutOfRange(u8),

    /// Directory name does not match the `NN-slug` form
    #[error("malformed section name: {0}")]
    MalformedName(String),

    /// Slug part was empty
    #[error("section slug is empty")]
    EmptySlug,

    /// Slug contains characters outside the slug alphabet
    #[error("invalid section slug: {0}")]
    InvalidSlug(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_number_range() {
        assert!(SectionNumber::new(1).is_ok());
        assert!(SectionNumber::new(99).is_ok());
        assert!(matches!(
            SectionNumber::new(0),
            Err(SectionError::NumberOutOfRange(0))
        ));
        assert!(matches!(
            SectionNumber::new(100),
            Err(SectionError::NumberOutOfRange(100))
        ));
    }

    #[test]
    fn section_number_display_two_digits() {
        let n = SectionNumber::new(3).unwrap();
        assert_eq!(n.to_string(), "03");
    }

    #[test]
    fn section_number_next() {
        let n = SectionNumber::new(7).unwrap();
        assert_eq!(n.next().unwrap().get(), 8);
        let last = SectionNumber::new(99).unwrap();
        assert!(last.next().is_none());
    }

    #[test]
    fn section_name_parse() {
        let name: SectionName = "02-handbook".parse().unwrap();
        assert_eq!(name.number().get(), 2);
        assert_eq!(name.slug(), "handbook");
        assert_eq!(name.to_string(), "02-handbook");
    }

    #[test]
    fn section_name_rejects_single_digit() {
        assert!(matches!(
            "2-handbook".parse::<SectionName>(),
            Err(SectionError::MalformedName(_))
        ));
    }

    #[test]
    fn section_name_rejects_zero() {
        assert!(matches!(
            "00-handbook".parse::<SectionName>(),
            Err(SectionError::NumberOutOfRange(0))
        ));
    }

    #[test]
    fn section_name_rejects_missing_slug() {
        assert!(matches!(
            "02-".parse::<SectionName>(),
            Err(SectionError::EmptySlug)
        ));
        assert!(matches!(
            "02".parse::<SectionName>(),
            Err(SectionError::MalformedName(_))
        ));
    }

    #[test]
    fn section_name_rejects_bad_slug() {
        assert!(matches!(
            "02-Hand Book".parse::<SectionName>(),
            Err(SectionError::InvalidSlug(_))
        ));
    }

    #[test]
    fn section_names_order_by_number() {
        let a: SectionName = "01-getting-started".parse().unwrap();
        let b: SectionName = "02-handbook".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn canonical_layout_is_contiguous() {
        let sections = canonical_sections();
        assert_eq!(sections.len(), 8);
        for (i, name) in sections.iter().enumerate() {
            assert_eq!(usize::from(name.number().get()), i + 1);
        }
        assert_eq!(sections[0].to_string(), "01-getting-started");
        assert_eq!(sections[7].to_string(), "08-project-configuration");
    }

    #[test]
    fn section_holds_topics_in_order() {
        let name: SectionName = "02-handbook".parse().unwrap();
        let mut section = Section::new(name);
        assert!(section.is_empty());

        let basics: TopicPath = "02-handbook/the-basics".parse().unwrap();
        let narrowing: TopicPath = "02-handbook/narrowing".parse().unwrap();
        section.push_topic(basics.clone());
        section.push_topic(narrowing.clone());

        assert_eq!(section.len(), 2);
        assert_eq!(section.topics(), &[basics.clone(), narrowing]);
        assert!(section.contains(&basics));

        let missing: TopicPath = "02-handbook/generics".parse().unwrap();
        assert!(!section.contains(&missing));
    }
}
