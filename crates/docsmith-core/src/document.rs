//! Data model shared across the pipeline.

use std::path::PathBuf;

use crate::frontmatter::FrontmatterMap;

/// Fallback title when nothing else resolves.
pub const DEFAULT_TITLE: &str = "Document";

/// A parsed Markdown source file. Immutable after parse.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Absolute path to the source file.
    pub path: PathBuf,

    /// Path relative to the input root.
    pub relative_path: PathBuf,

    /// Frontmatter metadata.
    pub frontmatter: FrontmatterMap,

    /// Document body with frontmatter removed.
    pub body: String,
}

impl SourceDocument {
    /// Resolve the document title.
    ///
    /// Priority: explicit override > frontmatter `title` > first level-1
    /// heading > fixed fallback.
    #[must_use]
    pub fn resolve_title(&self, title_override: Option<&str>) -> String {
        if let Some(title) = title_override {
            return title.to_string();
        }
        if let Some(title) = crate::frontmatter::string_field(&self.frontmatter, "title") {
            return title.to_string();
        }
        if let Some(h1) = first_h1(&self.body) {
            return h1.to_string();
        }
        DEFAULT_TITLE.to_string()
    }
}

/// First level-1 ATX heading in a Markdown body, if any.
#[must_use]
pub fn first_h1(body: &str) -> Option<&str> {
    body.lines().find_map(|line| {
        let rest = line.strip_prefix("# ")?;
        let text = rest.trim();
        (!text.is_empty()).then_some(text)
    })
}

/// A converted page, alive for the duration of one run.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Path relative to the input root.
    pub relative_path: PathBuf,

    /// Absolute output path of the written HTML file.
    pub output_path: PathBuf,

    /// The full rendered HTML document.
    pub html: String,

    /// Resolved page title.
    pub title: String,

    /// Frontmatter carried over from the source.
    pub frontmatter: FrontmatterMap,
}

/// A node of the index-page tree, mirroring the input directory tree.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// File or directory name.
    pub name: String,

    /// Relative link target (`.html` for files, `<dir>/index.html` for dirs).
    pub path: String,

    /// Display title.
    pub title: String,

    /// Whether this entry is a directory.
    pub is_directory: bool,

    /// Ordered children (directories only).
    pub children: Vec<IndexEntry>,
}

/// A heading extracted from assembled HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, 1-6.
    pub level: u8,

    /// Text with inline markup stripped.
    pub text: String,

    /// Synthetic anchor id (`heading-<n>`, assigned in document order).
    pub id: String,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateResult {
    /// Emitted HTML file paths, in processing order.
    pub html_files: Vec<PathBuf>,

    /// Path of the combined PDF, when one was produced.
    pub pdf_file: Option<PathBuf>,

    /// Number of Markdown source documents processed.
    pub document_count: usize,
}
