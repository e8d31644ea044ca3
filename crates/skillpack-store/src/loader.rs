//! Bundle loading
//!
//! Scans `references/` once, parses every document, and builds the
//! catalog. Load is resilient: per-file problems become [`LoadIssue`]s
//! and the catalog is built from the rest.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use skillpack_doc::{Document, DocumentError, Section, SectionName, TopicPath, DOC_EXTENSIONS};

use crate::catalog::{Catalog, DocumentRecord};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::manifest::{SkillManifest, MANIFEST_FILE};

/// Directory under the bundle root that holds section directories
pub const REFERENCES_DIR: &str = "references";

/// Per-file problem recorded while loading a bundle
///
/// Paths are relative to the references root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadIssue {
    /// Document file is empty or whitespace-only
    EmptyDocument {
        /// Offending file
        path: PathBuf,
    },
    /// Document file exceeds the configured size limit
    OversizedDocument {
        /// Offending file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },
    /// Section directory name does not parse as `NN-slug`
    MalformedSectionDir {
        /// Directory name as found on disk
        name: String,
    },
    /// Document file name does not form a valid topic path
    InvalidTopicName {
        /// Offending file
        path: PathBuf,
    },
    /// Two document files resolve to the same topic
    DuplicateTopic {
        /// Topic both files resolve to
        topic: TopicPath,
        /// File that was skipped
        path: PathBuf,
    },
    /// Non-document file inside a section directory
    NonDocumentFile {
        /// Offending file
        path: PathBuf,
    },
    /// Document has no top-level heading
    MissingTitle {
        /// Offending file
        path: PathBuf,
    },
    /// File or directory could not be read
    Unreadable {
        /// Offending path
        path: PathBuf,
        /// IO error text
        message: String,
    },
    /// The references directory is missing
    MissingReferences,
    /// SKILL.md is missing or malformed
    ManifestUnavailable {
        /// Why the manifest is unusable
        message: String,
    },
}

/// Everything loading a bundle produced
#[derive(Debug)]
pub(crate) struct LoadOutcome {
    pub(crate) manifest: Option<SkillManifest>,
    pub(crate) catalog: Catalog,
    pub(crate) issues: Vec<LoadIssue>,
}

/// Load a bundle from its root directory
///
/// Hard-fails only when `references/` exists but cannot be listed;
/// everything else is recorded as an issue.
pub(crate) async fn load_bundle(root: &Path, config: &StoreConfig) -> StoreResult<LoadOutcome> {
    let mut issues = Vec::new();

    let manifest = load_manifest(root, &mut issues).await;

    let references = root.join(REFERENCES_DIR);
    let Some(mut section_dirs) = list_section_dirs(&references, &mut issues).await? else {
        return Ok(LoadOutcome {
            manifest,
            catalog: Catalog::empty(),
            issues,
        });
    };
    section_dirs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut records: IndexMap<TopicPath, DocumentRecord> = IndexMap::new();
    let mut sections: IndexMap<SectionName, Section> = IndexMap::new();

    for (name, dir) in section_dirs {
        let section = sections
            .entry(name.clone())
            .or_insert_with(|| Section::new(name.clone()));
        load_section(&name, &dir, config, &mut records, section, &mut issues).await;
    }

    Ok(LoadOutcome {
        manifest,
        catalog: Catalog::new(records, sections),
        issues,
    })
}

/// Read and parse SKILL.md; absence or parse failure becomes an issue
async fn load_manifest(root: &Path, issues: &mut Vec<LoadIssue>) -> Option<SkillManifest> {
    let path = root.join(MANIFEST_FILE);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no manifest file");
            issues.push(LoadIssue::ManifestUnavailable {
                message: format!("{MANIFEST_FILE} not found"),
            });
            return None;
        }
        Err(e) => {
            issues.push(LoadIssue::ManifestUnavailable {
                message: e.to_string(),
            });
            return None;
        }
    };
    match SkillManifest::parse(&raw) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!(error = %e, "manifest rejected");
            issues.push(LoadIssue::ManifestUnavailable {
                message: e.to_string(),
            });
            None
        }
    }
}

/// List section directories under references/
///
/// Returns `None` when references/ itself is missing (recorded as an
/// issue); errors only when the directory exists but cannot be listed.
async fn list_section_dirs(
    references: &Path,
    issues: &mut Vec<LoadIssue>,
) -> StoreResult<Option<Vec<(SectionName, PathBuf)>>> {
    let mut read_dir = match tokio::fs::read_dir(references).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            issues.push(LoadIssue::MissingReferences);
            return Ok(None);
        }
        Err(e) => return Err(StoreError::io_error(references, e)),
    };

    let mut dirs = Vec::new();
    loop {
        let entry = match read_dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => return Err(StoreError::io_error(references, e)),
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            debug!(name = %name, "skipping hidden entry");
            continue;
        }
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if !is_dir {
            debug!(name = %name, "ignoring non-directory entry in references");
            continue;
        }
        match name.parse::<SectionName>() {
            Ok(section) => dirs.push((section, entry.path())),
            Err(e) => {
                warn!(name = %name, error = %e, "malformed section directory name");
                issues.push(LoadIssue::MalformedSectionDir { name });
            }
        }
    }
    Ok(Some(dirs))
}

/// Load every document file in one section directory
async fn load_section(
    name: &SectionName,
    dir: &Path,
    config: &StoreConfig,
    records: &mut IndexMap<TopicPath, DocumentRecord>,
    section: &mut Section,
    issues: &mut Vec<LoadIssue>,
) {
    let section_rel = PathBuf::from(name.to_string());

    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) => {
            issues.push(LoadIssue::Unreadable {
                path: section_rel,
                message: e.to_string(),
            });
            return;
        }
    };

    // Collect then sort so the catalog order is stable across platforms
    let mut files: Vec<String> = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                if file_name.starts_with('.') {
                    debug!(section = %name, file = %file_name, "skipping hidden entry");
                    continue;
                }
                let is_dir = entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false);
                if is_dir {
                    debug!(section = %name, dir = %file_name, "skipping nested directory");
                    continue;
                }
                files.push(file_name);
            }
            Ok(None) => break,
            Err(e) => {
                issues.push(LoadIssue::Unreadable {
                    path: section_rel.clone(),
                    message: e.to_string(),
                });
                break;
            }
        }
    }
    files.sort();

    for file_name in files {
        let rel = section_rel.join(&file_name);
        let is_document = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| DOC_EXTENSIONS.contains(&e));
        if !is_document {
            debug!(path = %rel.display(), "ignoring non-document file");
            issues.push(LoadIssue::NonDocumentFile { path: rel });
            continue;
        }

        let abs = dir.join(&file_name);
        let size = match tokio::fs::metadata(&abs).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                issues.push(LoadIssue::Unreadable {
                    path: rel,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if size == 0 {
            issues.push(LoadIssue::EmptyDocument { path: rel });
            continue;
        }
        if size > config.max_file_size {
            issues.push(LoadIssue::OversizedDocument {
                path: rel,
                size,
                limit: config.max_file_size,
            });
            continue;
        }

        let Ok(topic) = TopicPath::from_rel_file(&rel) else {
            issues.push(LoadIssue::InvalidTopicName { path: rel });
            continue;
        };
        if records.contains_key(&topic) {
            issues.push(LoadIssue::DuplicateTopic { topic, path: rel });
            continue;
        }

        let text = match tokio::fs::read_to_string(&abs).await {
            Ok(text) => text,
            Err(e) => {
                issues.push(LoadIssue::Unreadable {
                    path: rel,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let document = match Document::new(topic.clone(), name.clone(), text) {
            Ok(document) => document,
            Err(DocumentError::EmptyDocument(_)) => {
                issues.push(LoadIssue::EmptyDocument { path: rel });
                continue;
            }
            Err(DocumentError::SectionMismatch { .. }) => {
                issues.push(LoadIssue::InvalidTopicName { path: rel });
                continue;
            }
        };

        if document.body().title.is_none() {
            issues.push(LoadIssue::MissingTitle { path: rel.clone() });
        }

        debug!(topic = %topic, path = %rel.display(), "cataloged document");
        let record = DocumentRecord {
            rel_path: rel,
            topic: topic.clone(),
            section: name.clone(),
            title: document.title(),
            hash: *document.hash(),
            tokens: document.token_estimate(),
        };
        section.push_topic(topic.clone());
        records.insert(topic, record);
    }
}
