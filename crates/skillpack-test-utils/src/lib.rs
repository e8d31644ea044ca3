//! Fixture bundle builders for skillpack tests
//!
//! Writes realistic skill bundles into temp directories so store,
//! retrieval, and CLI tests can exercise real filesystem layouts.
//! [`BundleBuilder`] composes arbitrary bundles; [`typescript_bundle`]
//! returns the canonical eight-section TypeScript tutorial fixture.

#![warn(unreachable_pub)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;

use skillpack_doc::canonical_sections;

/// Directory under the bundle root that holds section directories
pub const REFERENCES_DIR: &str = "references";

/// Manifest file name at the bundle root
pub const MANIFEST_FILE: &str = "SKILL.md";

/// A bundle written into a temp directory
///
/// The directory lives as long as this value. Mutation helpers exist so
/// tests can break a valid bundle in targeted ways.
#[derive(Debug)]
pub struct FixtureBundle {
    dir: TempDir,
}

impl FixtureBundle {
    /// Bundle root path
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the references directory
    #[must_use]
    pub fn references_dir(&self) -> PathBuf {
        self.dir.path().join(REFERENCES_DIR)
    }

    /// Absolute path of a document given its references-relative path
    #[must_use]
    pub fn doc_path(&self, rel: &str) -> PathBuf {
        self.references_dir().join(rel)
    }

    /// Write (or overwrite) a document under `references/`
    ///
    /// # Errors
    /// Returns an error when directories or the file cannot be written.
    pub fn write_doc(&self, rel: &str, content: &str) -> io::Result<()> {
        let path = self.doc_path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    /// Remove a document under `references/`
    ///
    /// # Errors
    /// Returns an error when the file does not exist or cannot be removed.
    pub fn remove_doc(&self, rel: &str) -> io::Result<()> {
        fs::remove_file(self.doc_path(rel))
    }

    /// Remove a whole section directory under `references/`
    ///
    /// # Errors
    /// Returns an error when the directory cannot be removed.
    pub fn remove_section(&self, dir: &str) -> io::Result<()> {
        fs::remove_dir_all(self.references_dir().join(dir))
    }

    /// Write (or overwrite) a file at the bundle root
    ///
    /// # Errors
    /// Returns an error when the file cannot be written.
    pub fn write_root_file(&self, name: &str, content: &str) -> io::Result<()> {
        fs::write(self.dir.path().join(name), content)
    }
}

/// One section directory queued in a [`BundleBuilder`]
#[derive(Debug, Clone)]
struct FixtureSection {
    dir: String,
    docs: Vec<(String, String)>,
}

/// Builder for fixture bundles
///
/// Sections keep insertion order; claims in the generated `SKILL.md`
/// mirror the docs added, unless [`BundleBuilder::without_claims`].
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    name: String,
    description: String,
    sections: Vec<FixtureSection>,
    root_files: Vec<(String, String)>,
    with_manifest: bool,
    with_claims: bool,
}

#[derive(Serialize)]
struct FrontmatterOut<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sections: Option<Vec<ClaimOut<'a>>>,
}

#[derive(Serialize)]
struct ClaimOut<'a> {
    dir: &'a str,
    topics: Vec<&'a str>,
}

impl BundleBuilder {
    /// Start a builder for a bundle with the given manifest name
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("Test bundle {name}"),
            sections: Vec::new(),
            root_files: Vec::new(),
            with_manifest: true,
            with_claims: true,
        }
    }

    /// Set the manifest description
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Add an empty section directory
    #[must_use]
    pub fn section(mut self, dir: &str) -> Self {
        self.ensure_section(dir);
        self
    }

    /// Add a document file to a section (creates the section if needed)
    #[must_use]
    pub fn doc(mut self, dir: &str, file: &str, content: &str) -> Self {
        let idx = self.ensure_section(dir);
        self.sections[idx]
            .docs
            .push((file.to_string(), content.to_string()));
        self
    }

    /// Add a file at the bundle root (readme, license, strays)
    #[must_use]
    pub fn root_file(mut self, name: &str, content: &str) -> Self {
        self.root_files.push((name.to_string(), content.to_string()));
        self
    }

    /// Skip writing `SKILL.md` entirely
    #[must_use]
    pub fn without_manifest(mut self) -> Self {
        self.with_manifest = false;
        self
    }

    /// Write `SKILL.md` without a `sections` claim list
    #[must_use]
    pub fn without_claims(mut self) -> Self {
        self.with_claims = false;
        self
    }

    /// Write the bundle into a fresh temp directory
    ///
    /// # Errors
    /// Returns an error when any directory or file cannot be written.
    pub fn build(self) -> io::Result<FixtureBundle> {
        let dir = TempDir::new()?;
        let root = dir.path();

        if self.with_manifest {
            fs::write(root.join(MANIFEST_FILE), self.render_manifest())?;
        }
        for (name, content) in &self.root_files {
            fs::write(root.join(name), content)?;
        }

        let references = root.join(REFERENCES_DIR);
        fs::create_dir_all(&references)?;
        for section in &self.sections {
            let section_dir = references.join(&section.dir);
            fs::create_dir_all(&section_dir)?;
            for (file, content) in &section.docs {
                fs::write(section_dir.join(file), content)?;
            }
        }

        Ok(FixtureBundle { dir })
    }

    fn ensure_section(&mut self, dir: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.dir == dir) {
            return idx;
        }
        self.sections.push(FixtureSection {
            dir: dir.to_string(),
            docs: Vec::new(),
        });
        self.sections.len() - 1
    }

    fn render_manifest(&self) -> String {
        let claims = self.with_claims.then(|| {
            self.sections
                .iter()
                .map(|section| ClaimOut {
                    dir: &section.dir,
                    topics: section
                        .docs
                        .iter()
                        .map(|(file, _)| file_stem(file))
                        .collect(),
                })
                .collect()
        });
        let frontmatter = FrontmatterOut {
            name: &self.name,
            description: &self.description,
            sections: claims,
        };
        // serde_yaml never fails on this shape: strings and sequences only
        let yaml = serde_yaml::to_string(&frontmatter).unwrap_or_default();
        format!(
            "---\n{yaml}---\n\nUse the references tree to answer questions about {}.\n",
            self.name
        )
    }
}

/// Strip a `.md`/`.markdown` extension off a file name
fn file_stem(file: &str) -> &str {
    file.strip_suffix(".md")
        .or_else(|| file.strip_suffix(".markdown"))
        .unwrap_or(file)
}

/// Render a document body with a title, prose, and an optional code fence
#[must_use]
pub fn doc_text(title: &str, prose: &str, code: Option<&str>) -> String {
    match code {
        Some(code) => format!("# {title}\n\n{prose}\n\n```ts\n{code}\n```\n"),
        None => format!("# {title}\n\n{prose}\n"),
    }
}

/// Canonical eight-section TypeScript tutorial bundle
///
/// Every canonical section holds at least one document, the manifest
/// claims every document, and a readme sits at the root.
///
/// # Errors
/// Returns an error when the fixture cannot be written.
pub fn typescript_bundle() -> io::Result<FixtureBundle> {
    let sections = canonical_sections();
    let mut builder = BundleBuilder::new("typescript-tutorial")
        .description("TypeScript documentation for coding assistants")
        .root_file("README.md", "# TypeScript Tutorial Bundle\n");
    for section in &sections {
        builder = builder.section(&section.to_string());
    }
    builder = builder
        .doc(
            "01-getting-started",
            "ts-for-js-programmers.md",
            &doc_text(
                "TypeScript for JavaScript Programmers",
                "TypeScript adds static types on top of JavaScript. \
                 Types can often be inferred from values.",
                Some("let helloWorld = \"Hello World\";"),
            ),
        )
        .doc(
            "01-getting-started",
            "ts-from-scratch.md",
            &doc_text(
                "TypeScript for the New Programmer",
                "Start with JavaScript fundamentals, then layer types on top.",
                None,
            ),
        )
        .doc(
            "02-handbook",
            "the-basics.md",
            &doc_text(
                "The Basics",
                "Every value has behaviors observable by invoking operations on it. \
                 Static type checking catches errors before the code runs.",
                Some("const message = \"hello!\";\nmessage();"),
            ),
        )
        .doc(
            "02-handbook",
            "everyday-types.md",
            &doc_text(
                "Everyday Types",
                "The most common types found in JavaScript code: string, number, \
                 boolean, arrays, and object types.",
                Some("function greet(name: string, date: Date) {}"),
            ),
        )
        .doc(
            "02-handbook",
            "narrowing.md",
            &doc_text(
                "Narrowing",
                "TypeScript narrows union types using typeof guards, truthiness \
                 checks, and equality checks.",
                Some("function padLeft(padding: number | string, input: string) {\n  if (typeof padding === \"number\") {\n    return \" \".repeat(padding) + input;\n  }\n  return padding + input;\n}"),
            ),
        )
        .doc(
            "02-handbook",
            "functions.md",
            &doc_text(
                "More on Functions",
                "Function type expressions, call signatures, generic functions, \
                 and overloads.",
                Some("function firstElement<Type>(arr: Type[]): Type | undefined {\n  return arr[0];\n}"),
            ),
        )
        .doc(
            "03-reference",
            "utility-types.md",
            &doc_text(
                "Utility Types",
                "Global utility types facilitate common type transformations: \
                 Partial, Required, Readonly, Record, Pick, and Omit.",
                Some("type TodoPreview = Pick<Todo, \"title\" | \"completed\">;"),
            ),
        )
        .doc(
            "03-reference",
            "decorators.md",
            &doc_text(
                "Decorators",
                "A decorator is a special kind of declaration attached to classes, \
                 methods, accessors, properties, or parameters.",
                None,
            ),
        )
        .doc(
            "04-modules",
            "module-syntax.md",
            &doc_text(
                "Modules",
                "Any file containing a top-level import or export is considered a \
                 module. Modules have their own scope.",
                Some("import { pi } from \"./maths\";"),
            ),
        )
        .doc(
            "05-tutorials",
            "dom-manipulation.md",
            &doc_text(
                "DOM Manipulation",
                "Use the HTMLElement type hierarchy to work with the Document \
                 Object Model safely.",
                None,
            ),
        )
        .doc(
            "05-tutorials",
            "migrating-from-js.md",
            &doc_text(
                "Migrating from JavaScript",
                "Rename files to .ts, fix the errors the compiler reports, and \
                 tighten compiler options over time.",
                None,
            ),
        )
        .doc(
            "06-declaration-files",
            "declaration-intro.md",
            &doc_text(
                "Declaration Files Introduction",
                "Declaration files describe the shape of existing JavaScript code \
                 to the type checker.",
                None,
            ),
        )
        .doc(
            "06-declaration-files",
            "by-example.md",
            &doc_text(
                "Declaration Files by Example",
                "Common patterns for authoring .d.ts files, shown by example.",
                Some("declare function greet(setting: GreetingSettings): void;"),
            ),
        )
        .doc(
            "07-javascript-interop",
            "jsdoc-reference.md",
            &doc_text(
                "JSDoc Reference",
                "The checker understands a large set of JSDoc annotations on \
                 plain JavaScript files.",
                None,
            ),
        )
        .doc(
            "08-project-configuration",
            "tsconfig-basics.md",
            &doc_text(
                "What is a tsconfig.json",
                "The tsconfig.json file marks the root of a TypeScript project and \
                 carries the compiler options.",
                Some("{\n  \"compilerOptions\": {\n    \"strict\": true\n  }\n}"),
            ),
        )
        .doc(
            "08-project-configuration",
            "compiler-options.md",
            &doc_text(
                "Compiler Options",
                "Reference for the tsc command line and the options available in \
                 tsconfig.json.",
                None,
            ),
        );
    builder.build()
}

/// Small two-section bundle for focused tests
///
/// # Errors
/// Returns an error when the fixture cannot be written.
pub fn minimal_bundle() -> io::Result<FixtureBundle> {
    BundleBuilder::new("mini-ts")
        .doc(
            "01-getting-started",
            "intro.md",
            &doc_text("Introduction", "Start here.", None),
        )
        .doc(
            "02-handbook",
            "narrowing.md",
            &doc_text("Narrowing", "Guards narrow unions.", None),
        )
        .doc(
            "02-handbook",
            "generics.md",
            &doc_text("Generics", "Type parameters relate inputs to outputs.", None),
        )
        .build()
}
