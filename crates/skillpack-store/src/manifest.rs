//! Bundle manifest and expected layout
//!
//! `SKILL.md` at the bundle root carries YAML frontmatter naming the
//! bundle and, optionally, claiming the documents each section holds.
//! The body after the frontmatter is free prose for the host and is
//! kept verbatim.

use serde::{Deserialize, Serialize};

use skillpack_doc::{canonical_sections, split_frontmatter, SectionName};

/// Manifest file name at the bundle root
pub const MANIFEST_FILE: &str = "SKILL.md";

/// One section claim from the manifest frontmatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionClaim {
    /// Section directory name (`NN-slug`)
    pub dir: String,
    /// Claimed topics, as stems or `dir/stem` paths
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Parsed bundle manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillManifest {
    /// Bundle name (kebab-case)
    pub name: String,
    /// One-line description for the host
    pub description: String,
    /// Per-section document claims, when declared
    pub sections: Option<Vec<SectionClaim>>,
    /// Prose body after the frontmatter
    pub body: String,
}

#[derive(Deserialize)]
struct ManifestFrontmatter {
    name: String,
    description: String,
    #[serde(default)]
    sections: Option<Vec<SectionClaim>>,
}

impl SkillManifest {
    /// Parse a manifest from raw `SKILL.md` text
    ///
    /// # Errors
    /// Returns an error when the frontmatter is missing, is not valid
    /// YAML, or names the bundle outside kebab-case.
    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        let (yaml, body) = split_frontmatter(raw).ok_or(ManifestError::MissingFrontmatter)?;
        let frontmatter: ManifestFrontmatter = serde_yaml::from_str(yaml)?;
        validate_name(&frontmatter.name)?;
        Ok(Self {
            name: frontmatter.name,
            description: frontmatter.description,
            sections: frontmatter.sections,
            body: body.to_string(),
        })
    }

    /// Claimed sections, empty when the manifest declares none
    #[inline]
    #[must_use]
    pub fn claims(&self) -> &[SectionClaim] {
        self.sections.as_deref().unwrap_or(&[])
    }

    /// Whether the manifest declares a claim list
    #[inline]
    #[must_use]
    pub fn has_claims(&self) -> bool {
        self.sections.is_some()
    }
}

/// Kebab-case: lowercase ascii segments joined by single dashes
fn validate_name(name: &str) -> Result<(), ManifestError> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ManifestError::InvalidName(name.to_string()))
    }
}

/// Errors during manifest parsing
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No YAML frontmatter at the top of SKILL.md
    #[error("manifest has no YAML frontmatter")]
    MissingFrontmatter,

    /// Frontmatter is not valid YAML for the manifest shape
    #[error("manifest frontmatter is not valid: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Bundle name is not kebab-case
    #[error("bundle name must be kebab-case: '{0}'")]
    InvalidName(String),
}

/// Expected section set for a bundle
///
/// Validation compares discovered sections against this layout. The
/// default is the canonical eight reference sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
    sections: Vec<SectionName>,
}

impl BundleLayout {
    /// Layout with the canonical eight reference sections
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            sections: canonical_sections(),
        }
    }

    /// Layout with an explicit section set
    #[must_use]
    pub fn new(mut sections: Vec<SectionName>) -> Self {
        sections.sort();
        Self { sections }
    }

    /// Expected sections in order
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[SectionName] {
        &self.sections
    }

    /// Whether the layout expects the given section
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &SectionName) -> bool {
        self.sections.contains(name)
    }

    /// Number of expected sections
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the layout expects no sections at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Default for BundleLayout {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"---
name: typescript-tutorial
description: TypeScript documentation for coding assistants
sections:
  - dir: 01-getting-started
    topics:
      - ts-for-js-programmers
  - dir: 02-handbook
    topics:
      - narrowing
      - everyday-types
---

Use the references tree to answer TypeScript questions.
"#;

    #[test]
    fn manifest_parses_claims() {
        let manifest = SkillManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.name, "typescript-tutorial");
        assert!(manifest.has_claims());
        assert_eq!(manifest.claims().len(), 2);
        assert_eq!(manifest.claims()[1].dir, "02-handbook");
        assert_eq!(manifest.claims()[1].topics, vec!["narrowing", "everyday-types"]);
        assert!(manifest.body.contains("references tree"));
    }

    #[test]
    fn manifest_without_claims() {
        let raw = "---\nname: bare\ndescription: no claims\n---\n\nBody.\n";
        let manifest = SkillManifest::parse(raw).unwrap();
        assert!(!manifest.has_claims());
        assert!(manifest.claims().is_empty());
    }

    #[test]
    fn manifest_rejects_missing_frontmatter() {
        let result = SkillManifest::parse("# Just a readme\n");
        assert!(matches!(result, Err(ManifestError::MissingFrontmatter)));
    }

    #[test]
    fn manifest_rejects_bad_yaml() {
        let raw = "---\nname: [unclosed\n---\n\nBody.\n";
        assert!(matches!(
            SkillManifest::parse(raw),
            Err(ManifestError::Yaml(_))
        ));
    }

    #[test]
    fn manifest_rejects_non_kebab_name() {
        for name in ["Has Spaces", "CamelCase", "-leading", "trailing-", "dou--ble", ""] {
            let raw = format!("---\nname: \"{name}\"\ndescription: d\n---\n\nBody.\n");
            assert!(
                matches!(
                    SkillManifest::parse(&raw),
                    Err(ManifestError::InvalidName(_))
                ),
                "accepted '{name}'"
            );
        }
    }

    #[test]
    fn layout_canonical_has_eight_sections() {
        let layout = BundleLayout::canonical();
        assert_eq!(layout.len(), 8);
        assert_eq!(layout.sections()[0].to_string(), "01-getting-started");
        assert_eq!(layout.sections()[7].to_string(), "08-project-configuration");
    }

    #[test]
    fn layout_contains() {
        let layout = BundleLayout::default();
        let handbook: SectionName = "02-handbook".parse().unwrap();
        let other: SectionName = "02-intro".parse().unwrap();
        assert!(layout.contains(&handbook));
        assert!(!layout.contains(&other));
    }

    #[test]
    fn layout_custom_sorted() {
        let layout = BundleLayout::new(vec![
            "02-handbook".parse().unwrap(),
            "01-getting-started".parse().unwrap(),
        ]);
        assert_eq!(layout.sections()[0].to_string(), "01-getting-started");
    }
}
