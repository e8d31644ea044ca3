//! Structural integrity checks over a loaded bundle
//!
//! [`DocumentStore::verify`](crate::DocumentStore::verify) runs every
//! check and returns an [`IntegrityReport`] of typed findings. Checks
//! never panic; broken bundles produce findings, not failures.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use skillpack_doc::{ContentHash, SectionName, TopicPath};

use crate::catalog::Catalog;
use crate::loader::LoadIssue;
use crate::manifest::{BundleLayout, SkillManifest};
use crate::store::DocumentStore;

/// A finding that makes the bundle unusable as claimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityError {
    /// A manifest claim points at a document that does not exist
    #[error("claimed document missing: {topic} (claimed by {dir})")]
    MissingClaimedDocument {
        /// Claiming section directory
        dir: String,
        /// Resolved topic path of the claim
        topic: String,
    },

    /// Document file is empty or whitespace-only
    #[error("document is empty: {path}")]
    EmptyDocument {
        /// Offending file
        path: PathBuf,
    },

    /// Document file exceeds the configured size limit
    #[error("document too large: {path} ({size} bytes, limit {limit})")]
    OversizedDocument {
        /// Offending file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Two section directories share a number
    #[error("duplicate section number {number:02}: {first} and {second}")]
    DuplicateSectionNumber {
        /// Duplicated ordinal
        number: u8,
        /// First directory with the number
        first: String,
        /// Second directory with the number
        second: String,
    },

    /// Section numbering is not contiguous from 01
    #[error("section numbering gap: expected {expected:02}, found {found:02}")]
    NumberingGap {
        /// Number the sequence required next
        expected: u8,
        /// Number actually found
        found: u8,
    },

    /// The same document path is claimed by more than one section
    #[error("document claimed twice: {topic} (by {first} and {second})")]
    DuplicateClaim {
        /// Resolved topic path of the claim
        topic: String,
        /// First claiming directory
        first: String,
        /// Second claiming directory
        second: String,
    },

    /// Two document files resolve to the same topic
    #[error("duplicate topic on disk: {topic} shadows {path}")]
    DuplicateTopicFile {
        /// Topic both files resolve to
        topic: String,
        /// File that was shadowed
        path: PathBuf,
    },

    /// Document content no longer matches the cataloged hash
    #[error("content hash mismatch for {path}: cataloged {expected}, found {actual}")]
    HashMismatch {
        /// References-relative document path
        path: PathBuf,
        /// Hash recorded at load time
        expected: ContentHash,
        /// Hash of the bytes on disk now
        actual: ContentHash,
    },

    /// The references directory is missing
    #[error("references directory missing under {root}")]
    MissingReferences {
        /// Bundle root
        root: PathBuf,
    },

    /// Section directory name does not parse as `NN-slug`
    #[error("malformed section directory name: {name}")]
    MalformedSectionDir {
        /// Name as found on disk or in the manifest
        name: String,
    },

    /// A path could not be read
    #[error("cannot read {path}: {message}")]
    Unreadable {
        /// Offending path
        path: PathBuf,
        /// IO error text
        message: String,
    },
}

/// A finding worth surfacing but not fatal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// Section on disk that the expected layout does not name
    #[error("section not in expected layout: {name}")]
    UnexpectedSection {
        /// Section directory name
        name: String,
    },

    /// Expected section with no directory on disk
    #[error("expected section missing from disk: {name}")]
    MissingSection {
        /// Section directory name
        name: String,
    },

    /// Document has no top-level heading
    #[error("document has no top-level heading: {path}")]
    MissingTitle {
        /// Offending file
        path: PathBuf,
    },

    /// Manifest declares no section claims
    #[error("manifest declares no section claims")]
    NoClaims,

    /// SKILL.md is missing or malformed
    #[error("manifest unavailable: {message}")]
    ManifestUnavailable {
        /// Why the manifest is unusable
        message: String,
    },

    /// Non-document file inside a section directory
    #[error("non-document file in section: {path}")]
    NonDocumentFile {
        /// Offending file
        path: PathBuf,
    },

    /// Document file name does not form a valid topic path
    #[error("file name is not a valid topic: {path}")]
    InvalidTopicName {
        /// Offending file
        path: PathBuf,
    },
}

/// Outcome of a full integrity pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Findings that make the bundle unusable as claimed
    pub errors: Vec<IntegrityError>,
    /// Findings worth surfacing but not fatal
    pub warnings: Vec<IntegrityWarning>,
}

impl IntegrityReport {
    /// Whether the bundle passed every error-level check
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of error findings
    #[inline]
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of warning findings
    #[inline]
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Render the report as plain text, one finding per line
    #[must_use]
    pub fn render_text(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return "integrity: ok\n".to_string();
        }
        let mut out = String::new();
        for error in &self.errors {
            out.push_str(&format!("error: {error}\n"));
        }
        for warning in &self.warnings {
            out.push_str(&format!("warning: {warning}\n"));
        }
        out.push_str(&format!(
            "integrity: {} error(s), {} warning(s)\n",
            self.errors.len(),
            self.warnings.len()
        ));
        out
    }
}

/// Run every integrity check over an opened store
pub(crate) async fn check_store(store: &DocumentStore) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    classify_issues(store.load_issues(), store.root(), &mut report);
    check_numbering(store.catalog(), &mut report.errors);
    check_layout(store.catalog(), store.layout(), &mut report.warnings);
    check_claims(store.manifest(), store.catalog(), store.load_issues(), &mut report);
    check_drift(store, &mut report.errors).await;

    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "integrity pass complete"
    );
    report
}

/// Map load-time issues onto report findings
fn classify_issues(issues: &[LoadIssue], root: &Path, report: &mut IntegrityReport) {
    for issue in issues {
        match issue {
            LoadIssue::EmptyDocument { path } => {
                report.errors.push(IntegrityError::EmptyDocument { path: path.clone() });
            }
            LoadIssue::OversizedDocument { path, size, limit } => {
                report.errors.push(IntegrityError::OversizedDocument {
                    path: path.clone(),
                    size: *size,
                    limit: *limit,
                });
            }
            LoadIssue::MalformedSectionDir { name } => {
                report
                    .errors
                    .push(IntegrityError::MalformedSectionDir { name: name.clone() });
            }
            LoadIssue::DuplicateTopic { topic, path } => {
                report.errors.push(IntegrityError::DuplicateTopicFile {
                    topic: topic.to_string(),
                    path: path.clone(),
                });
            }
            LoadIssue::Unreadable { path, message } => {
                report.errors.push(IntegrityError::Unreadable {
                    path: path.clone(),
                    message: message.clone(),
                });
            }
            LoadIssue::MissingReferences => {
                report.errors.push(IntegrityError::MissingReferences {
                    root: root.to_path_buf(),
                });
            }
            LoadIssue::InvalidTopicName { path } => {
                report
                    .warnings
                    .push(IntegrityWarning::InvalidTopicName { path: path.clone() });
            }
            LoadIssue::NonDocumentFile { path } => {
                report
                    .warnings
                    .push(IntegrityWarning::NonDocumentFile { path: path.clone() });
            }
            LoadIssue::MissingTitle { path } => {
                report
                    .warnings
                    .push(IntegrityWarning::MissingTitle { path: path.clone() });
            }
            LoadIssue::ManifestUnavailable { message } => {
                report.warnings.push(IntegrityWarning::ManifestUnavailable {
                    message: message.clone(),
                });
            }
        }
    }
}

/// Numbering must run 01 upward with every ordinal used once
fn check_numbering(catalog: &Catalog, errors: &mut Vec<IntegrityError>) {
    let mut by_number: BTreeMap<u8, Vec<&SectionName>> = BTreeMap::new();
    for name in catalog.section_names() {
        by_number.entry(name.number().get()).or_default().push(name);
    }

    for (number, group) in &by_number {
        if group.len() > 1 {
            errors.push(IntegrityError::DuplicateSectionNumber {
                number: *number,
                first: group[0].to_string(),
                second: group[1].to_string(),
            });
        }
    }

    let mut expected = 1u8;
    for number in by_number.keys() {
        if *number != expected {
            errors.push(IntegrityError::NumberingGap {
                expected,
                found: *number,
            });
        }
        expected = number.saturating_add(1);
    }
}

/// Compare discovered sections against the expected layout
fn check_layout(catalog: &Catalog, layout: &BundleLayout, warnings: &mut Vec<IntegrityWarning>) {
    for name in catalog.section_names() {
        if !layout.contains(name) {
            warnings.push(IntegrityWarning::UnexpectedSection {
                name: name.to_string(),
            });
        }
    }

    let on_disk: HashSet<&SectionName> = catalog.section_names().collect();
    for expected in layout.sections() {
        if !on_disk.contains(expected) {
            warnings.push(IntegrityWarning::MissingSection {
                name: expected.to_string(),
            });
        }
    }
}

/// Every claim must resolve to exactly one cataloged document
fn check_claims(
    manifest: Option<&SkillManifest>,
    catalog: &Catalog,
    issues: &[LoadIssue],
    report: &mut IntegrityReport,
) {
    let Some(manifest) = manifest else {
        // absence is already a ManifestUnavailable warning
        return;
    };
    if !manifest.has_claims() {
        report.warnings.push(IntegrityWarning::NoClaims);
        return;
    }

    // Topics whose files were rejected at load already carry an error;
    // do not double-report them as missing claims.
    let problem_topics: HashSet<String> = issues
        .iter()
        .filter_map(|issue| match issue {
            LoadIssue::EmptyDocument { path }
            | LoadIssue::OversizedDocument { path, .. }
            | LoadIssue::Unreadable { path, .. }
            | LoadIssue::InvalidTopicName { path }
            | LoadIssue::DuplicateTopic { path, .. } => topic_string_of(path),
            _ => None,
        })
        .collect();

    let mut seen: HashMap<String, String> = HashMap::new();
    for claim in manifest.claims() {
        if claim.dir.parse::<SectionName>().is_err() {
            report.errors.push(IntegrityError::MalformedSectionDir {
                name: claim.dir.clone(),
            });
            continue;
        }
        for raw in &claim.topics {
            let stem = strip_doc_extension(raw);
            let resolved = if stem.contains('/') {
                stem.to_string()
            } else {
                format!("{}/{stem}", claim.dir)
            };

            if let Some(first) = seen.get(&resolved) {
                report.errors.push(IntegrityError::DuplicateClaim {
                    topic: resolved.clone(),
                    first: first.clone(),
                    second: claim.dir.clone(),
                });
                continue;
            }
            seen.insert(resolved.clone(), claim.dir.clone());

            let cataloged = resolved
                .parse::<TopicPath>()
                .ok()
                .is_some_and(|topic| catalog.record(&topic).is_some());
            if !cataloged && !problem_topics.contains(&resolved) {
                report.errors.push(IntegrityError::MissingClaimedDocument {
                    dir: claim.dir.clone(),
                    topic: resolved,
                });
            }
        }
    }
}

/// Re-read every cataloged file and compare hashes
async fn check_drift(store: &DocumentStore, errors: &mut Vec<IntegrityError>) {
    for record in store.catalog().records() {
        let abs = store.doc_path(&record.rel_path);
        match tokio::fs::read_to_string(&abs).await {
            Ok(text) => {
                let actual = ContentHash::compute(text.as_bytes());
                if actual != record.hash {
                    errors.push(IntegrityError::HashMismatch {
                        path: record.rel_path.clone(),
                        expected: record.hash,
                        actual,
                    });
                }
            }
            Err(e) => {
                errors.push(IntegrityError::Unreadable {
                    path: record.rel_path.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Strip a `.md`/`.markdown` extension off a claim entry
fn strip_doc_extension(raw: &str) -> &str {
    raw.strip_suffix(".md")
        .or_else(|| raw.strip_suffix(".markdown"))
        .unwrap_or(raw)
}

/// Topic path string for a references-relative file path
fn topic_string_of(path: &Path) -> Option<String> {
    TopicPath::from_rel_file(path).ok().map(|t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use skillpack_test_utils::{doc_text, typescript_bundle, BundleBuilder};

    async fn open(bundle: &skillpack_test_utils::FixtureBundle) -> DocumentStore {
        DocumentStore::open(bundle.root(), StoreConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn clean_bundle_passes() {
        let bundle = typescript_bundle().unwrap();
        let report = open(&bundle).await.verify().await;

        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert_eq!(report.warning_count(), 0, "warnings: {:?}", report.warnings);
        assert_eq!(report.render_text(), "integrity: ok\n");
    }

    #[tokio::test]
    async fn missing_claimed_document_is_error() {
        let bundle = typescript_bundle().unwrap();
        bundle.remove_doc("02-handbook/narrowing.md").unwrap();

        let report = open(&bundle).await.verify().await;
        assert!(report.errors.iter().any(|e| matches!(
            e,
            IntegrityError::MissingClaimedDocument { topic, .. } if topic == "02-handbook/narrowing"
        )));
    }

    #[tokio::test]
    async fn empty_claimed_document_reports_once() {
        let bundle = typescript_bundle().unwrap();
        bundle.write_doc("02-handbook/narrowing.md", "").unwrap();

        let report = open(&bundle).await.verify().await;
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, IntegrityError::EmptyDocument { .. })));
        // empty beats missing; no double report for the same file
        assert!(!report
            .errors
            .iter()
            .any(|e| matches!(e, IntegrityError::MissingClaimedDocument { .. })));
    }

    #[tokio::test]
    async fn removed_section_leaves_gap_and_layout_warning() {
        let bundle = typescript_bundle().unwrap();
        bundle.remove_section("04-modules").unwrap();

        let report = open(&bundle).await.verify().await;
        assert!(report.errors.iter().any(|e| matches!(
            e,
            IntegrityError::NumberingGap { expected: 4, found: 5 }
        )));
        assert!(report.warnings.iter().any(|w| matches!(
            w,
            IntegrityWarning::MissingSection { name } if name == "04-modules"
        )));
    }

    #[tokio::test]
    async fn duplicate_section_number_is_error() {
        let bundle = typescript_bundle().unwrap();
        bundle
            .write_doc("02-intro/extra.md", &doc_text("Extra", "Text.", None))
            .unwrap();

        let report = open(&bundle).await.verify().await;
        assert!(report.errors.iter().any(|e| matches!(
            e,
            IntegrityError::DuplicateSectionNumber { number: 2, .. }
        )));
    }

    #[tokio::test]
    async fn extra_section_beyond_layout_is_warning() {
        let bundle = typescript_bundle().unwrap();
        bundle
            .write_doc("09-extras/bonus.md", &doc_text("Bonus", "Text.", None))
            .unwrap();

        let report = open(&bundle).await.verify().await;
        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert!(report.warnings.iter().any(|w| matches!(
            w,
            IntegrityWarning::UnexpectedSection { name } if name == "09-extras"
        )));
    }

    #[tokio::test]
    async fn manifest_without_claims_is_warning() {
        let bundle = BundleBuilder::new("bare")
            .doc("01-getting-started", "intro.md", &doc_text("Intro", "Hi.", None))
            .without_claims()
            .build()
            .unwrap();

        let store = DocumentStore::open(bundle.root(), StoreConfig::default())
            .await
            .unwrap();
        let report = store.verify().await;
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, IntegrityWarning::NoClaims)));
    }

    #[tokio::test]
    async fn drifted_content_is_error() {
        let bundle = typescript_bundle().unwrap();
        let store = open(&bundle).await;
        bundle
            .write_doc(
                "02-handbook/narrowing.md",
                &doc_text("Narrowing", "Edited after open.", None),
            )
            .unwrap();

        let report = store.verify().await;
        assert!(report.errors.iter().any(|e| matches!(
            e,
            IntegrityError::HashMismatch { path, .. } if path.ends_with("narrowing.md")
        )));
    }

    #[tokio::test]
    async fn duplicate_claim_is_error() {
        let bundle = BundleBuilder::new("dup-claims")
            .doc("01-getting-started", "intro.md", &doc_text("Intro", "Hi.", None))
            .build()
            .unwrap();
        bundle
            .write_root_file(
                "SKILL.md",
                "---\nname: dup-claims\ndescription: d\nsections:\n  - dir: 01-getting-started\n    topics: [intro, intro]\n---\n\nBody.\n",
            )
            .unwrap();

        let store = DocumentStore::open(bundle.root(), StoreConfig::default())
            .await
            .unwrap();
        let report = store.verify().await;
        assert!(report.errors.iter().any(|e| matches!(
            e,
            IntegrityError::DuplicateClaim { topic, .. } if topic == "01-getting-started/intro"
        )));
    }

    #[tokio::test]
    async fn report_groups_render_lines() {
        let bundle = typescript_bundle().unwrap();
        bundle.remove_doc("02-handbook/narrowing.md").unwrap();

        let report = open(&bundle).await.verify().await;
        let text = report.render_text();
        assert!(text.contains("error: claimed document missing"));
        assert!(text.lines().last().unwrap().starts_with("integrity:"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = IntegrityReport {
            errors: vec![IntegrityError::NumberingGap {
                expected: 3,
                found: 5,
            }],
            warnings: vec![IntegrityWarning::NoClaims],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"kind\":\"numbering_gap\""));
        assert!(json.contains("\"kind\":\"no_claims\""));
    }
}
