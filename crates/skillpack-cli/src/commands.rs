//! Command implementations behind the `skillpack` binary
//!
//! Each command opens the bundle, runs one operation, and returns its
//! rendered output; the binary prints the string and sets the exit
//! code. Keeping the logic here lets tests drive commands directly
//! instead of spawning processes.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use skillpack_retrieval::{RetrievalConfig, RetrievalService};
use skillpack_store::DocumentStore;

/// Overrides for the search command
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Replace the configured hit limit
    pub limit: Option<usize>,
    /// Replace the configured token budget
    pub budget: Option<usize>,
    /// Render results as JSON
    pub json: bool,
}

/// Outcome of the validate command
#[derive(Debug, Clone)]
pub struct Validation {
    /// Rendered report, text or JSON
    pub rendered: String,
    /// Whether the bundle passed every error-level check
    pub ok: bool,
}

/// Run integrity checks over a bundle and render the report
///
/// # Errors
/// Fails when the bundle cannot be opened; findings inside an opened
/// bundle land in the report instead.
pub async fn validate(bundle: &Path, json: bool) -> Result<Validation> {
    let config = RetrievalConfig::load(bundle).await?;
    let store = DocumentStore::open(bundle, config.store).await?;
    let report = store.verify().await;
    debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "integrity checks finished"
    );

    let rendered = if json {
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        out
    } else {
        report.render_text()
    };
    Ok(Validation {
        rendered,
        ok: report.is_ok(),
    })
}

/// List the bundle's sections and their topics
///
/// # Errors
/// Fails when the bundle cannot be opened.
pub async fn sections(bundle: &Path) -> Result<String> {
    let service = open_service(bundle).await?;

    let mut out = String::new();
    for summary in service.sections() {
        out.push_str(&format!(
            "{:02}-{} ({} doc(s))\n",
            summary.number, summary.slug, summary.doc_count
        ));
        for topic in &summary.topics {
            out.push_str(&format!("  {topic}\n"));
        }
    }
    Ok(out)
}

/// Resolve a topic term to document paths, one per line
///
/// # Errors
/// Fails when the bundle cannot be opened or the term matches nothing.
pub async fn lookup(bundle: &Path, term: &str) -> Result<String> {
    let service = open_service(bundle).await?;

    let mut out = String::new();
    for path in service.lookup(term)? {
        out.push_str(&format!("{path}\n"));
    }
    Ok(out)
}

/// Search document text and render ranked excerpts
///
/// # Errors
/// Fails when the bundle cannot be opened or the query is empty.
pub async fn search(bundle: &Path, query: &str, options: SearchOptions) -> Result<String> {
    let mut config = RetrievalConfig::load(bundle).await?;
    if let Some(limit) = options.limit {
        config = config.with_max_hits(limit);
    }
    if let Some(budget) = options.budget {
        config = config.with_token_budget(budget);
    }
    let service = RetrievalService::open(bundle, config).await?;
    let excerpts = service.search(query).await?;

    if options.json {
        let mut out = serde_json::to_string_pretty(&excerpts)?;
        out.push('\n');
        return Ok(out);
    }
    if excerpts.is_empty() {
        return Ok("no matches\n".to_string());
    }

    let mut out = String::new();
    for excerpt in &excerpts {
        out.push_str(&format!(
            "{} ({:.2}) {}\n",
            excerpt.path, excerpt.score, excerpt.title
        ));
        out.push_str(&format!("    {}\n", excerpt.snippet));
    }
    out.push_str(&format!("{} match(es)\n", excerpts.len()));
    Ok(out)
}

/// Print the raw markdown of one document
///
/// # Errors
/// Fails when the bundle cannot be opened or the path is unknown.
pub async fn show(bundle: &Path, path: &str) -> Result<String> {
    let service = open_service(bundle).await?;
    let doc = service.fetch_str(path).await?;
    Ok(doc.text().to_string())
}

/// Print the bundle's Merkle root as hex
///
/// # Errors
/// Fails when the bundle cannot be opened.
pub async fn fingerprint(bundle: &Path) -> Result<String> {
    let config = RetrievalConfig::load(bundle).await?;
    let store = DocumentStore::open(bundle, config.store).await?;
    Ok(format!("{}\n", store.fingerprint().root()))
}

/// Open a retrieval service with the bundle's own configuration
async fn open_service(bundle: &Path) -> Result<RetrievalService> {
    debug!(bundle = %bundle.display(), "opening bundle");
    let config = RetrievalConfig::load(bundle).await?;
    Ok(RetrievalService::open(bundle, config).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillpack_test_utils::{minimal_bundle, typescript_bundle};

    #[tokio::test]
    async fn validate_renders_clean_report() {
        let bundle = typescript_bundle().unwrap();
        let validation = validate(bundle.root(), false).await.unwrap();
        assert!(validation.ok);
        assert_eq!(validation.rendered, "integrity: ok\n");
    }

    #[tokio::test]
    async fn validate_renders_json() {
        let bundle = typescript_bundle().unwrap();
        let validation = validate(bundle.root(), true).await.unwrap();
        assert!(validation.ok);
        assert!(validation.rendered.contains("\"errors\": []"));
        assert!(validation.rendered.ends_with('\n'));
    }

    #[tokio::test]
    async fn sections_renders_listing() {
        let bundle = minimal_bundle().unwrap();
        let out = sections(bundle.root()).await.unwrap();
        assert!(out.contains("01-getting-started (1 doc(s))"));
        assert!(out.contains("  02-handbook/narrowing\n"));
    }

    #[tokio::test]
    async fn lookup_renders_paths() {
        let bundle = minimal_bundle().unwrap();
        let out = lookup(bundle.root(), "generics").await.unwrap();
        assert_eq!(out, "02-handbook/generics\n");
    }

    #[tokio::test]
    async fn search_renders_scored_lines() {
        let bundle = minimal_bundle().unwrap();
        let out = search(bundle.root(), "narrowing", SearchOptions::default())
            .await
            .unwrap();
        assert!(out.contains("02-handbook/narrowing (0."));
        assert!(out.trim_end().ends_with("match(es)"));
    }

    #[tokio::test]
    async fn search_renders_json_array() {
        let bundle = minimal_bundle().unwrap();
        let options = SearchOptions {
            json: true,
            ..SearchOptions::default()
        };
        let out = search(bundle.root(), "narrowing", options).await.unwrap();
        assert!(out.starts_with('['));
        assert!(out.contains("\"snippet\""));
    }

    #[tokio::test]
    async fn search_reports_no_matches() {
        let bundle = minimal_bundle().unwrap();
        let out = search(bundle.root(), "quaternions", SearchOptions::default())
            .await
            .unwrap();
        assert_eq!(out, "no matches\n");
    }

    #[tokio::test]
    async fn show_prints_raw_markdown() {
        let bundle = minimal_bundle().unwrap();
        let out = show(bundle.root(), "02-handbook/narrowing").await.unwrap();
        assert!(out.starts_with("# Narrowing"));
    }

    #[tokio::test]
    async fn fingerprint_prints_hex_root() {
        let bundle = minimal_bundle().unwrap();
        let out = fingerprint(bundle.root()).await.unwrap();
        let hex = out.trim_end();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
