//! Input discovery and ordering.
//!
//! A single Markdown file or a directory tree becomes an ordered list of
//! source paths. Ordering is natural: a leading `<digits>-` prefix compares
//! numerically before the lexical fallback, so `02-intro.md` precedes
//! `10-appendix.md`.

use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::generate::{GenerateError, Result};

static NUMERIC_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-").expect("numeric prefix regex"));

/// The discovered input set, in processing order.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Base directory that relative paths are computed against.
    pub base: PathBuf,

    /// Source files paired with their relative paths, sorted.
    pub documents: Vec<(PathBuf, PathBuf)>,

    /// Whether the input root was a directory.
    pub is_directory: bool,
}

/// Discover the Markdown sources under `input`.
///
/// A single file must have a `.md` extension (case-insensitive); its parent
/// directory is the relative-path base. A directory is scanned recursively,
/// skipping hidden entries.
pub fn discover(input: &Path) -> Result<Discovery> {
    let metadata = std::fs::metadata(input).map_err(|source| GenerateError::InputRoot {
        path: input.to_path_buf(),
        source,
    })?;

    if metadata.is_file() {
        if !is_markdown(input) {
            return Err(GenerateError::UnsupportedInput {
                path: input.to_path_buf(),
            });
        }
        let base = input.parent().unwrap_or(Path::new(".")).to_path_buf();
        let relative = input
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| GenerateError::UnsupportedInput {
                path: input.to_path_buf(),
            })?;
        return Ok(Discovery {
            base,
            documents: vec![(input.to_path_buf(), relative)],
            is_directory: false,
        });
    }

    let mut documents = Vec::new();
    // The root's own name is exempt from the hidden filter; only entries
    // below it are skipped.
    for entry in WalkDir::new(input)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = entry.map_err(|e| GenerateError::InputRoot {
            path: input.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(input)
            .unwrap_or(entry.path())
            .to_path_buf();
        documents.push((entry.path().to_path_buf(), relative));
    }

    documents.sort_by(|(_, a), (_, b)| natural_basename_cmp(a, b));
    debug!(count = documents.len(), root = %input.display(), "discovered sources");

    Ok(Discovery {
        base: input.to_path_buf(),
        documents,
        is_directory: true,
    })
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.') && n != "." && n != "..")
}

/// Compare two paths by base filename only, naturally. Directory components
/// do not participate in the ordering.
pub fn natural_basename_cmp(a: &Path, b: &Path) -> Ordering {
    let a_name = a.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let b_name = b.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    natural_cmp(&a_name, &b_name)
}

/// Numeric `<digits>-` prefixes compare numerically; everything else falls
/// back to case-sensitive lexical order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_num = numeric_prefix(a);
    let b_num = numeric_prefix(b);
    match (a_num, b_num) {
        (Some(x), Some(y)) if x != y => x.cmp(&y),
        _ => a.cmp(b),
    }
}

fn numeric_prefix(name: &str) -> Option<u64> {
    NUMERIC_PREFIX_RE
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
