//! Frontmatter parsing for source documents.
//!
//! Frontmatter is a YAML block delimited by `---` lines at the top of a
//! document. It is kept as a free-form map rather than a typed struct so that
//! arbitrary user metadata survives the pipeline.

use std::{collections::BTreeMap, path::Path};

use crate::error::{CoreError, Result};

/// Free-form frontmatter metadata.
pub type FrontmatterMap = BTreeMap<String, serde_yaml::Value>;

/// Split content into a raw frontmatter block and the body.
///
/// Returns `None` when the document carries no frontmatter.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    // The opening delimiter must be a full line.
    if !rest.starts_with('\n') && !rest.starts_with("\r\n") {
        return None;
    }

    let closing = rest.find("\n---")?;
    let frontmatter = rest[..closing].trim();
    let after = &rest[closing + "\n---".len()..];
    let body = after.trim_start_matches(['\r']).trim_start_matches('\n');
    Some((frontmatter, body))
}

/// Parse frontmatter from a document.
///
/// A document without frontmatter yields an empty map and the full content.
/// Malformed YAML is an error carrying the document path.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(FrontmatterMap, String)> {
    let Some((fm_str, body)) = split_frontmatter(content) else {
        return Ok((FrontmatterMap::new(), content.to_string()));
    };

    if fm_str.is_empty() {
        return Ok((FrontmatterMap::new(), body.to_string()));
    }

    let map: FrontmatterMap =
        serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    Ok((map, body.to_string()))
}

/// Check whether a document starts with a frontmatter block.
#[must_use]
pub fn has_frontmatter(content: &str) -> bool {
    split_frontmatter(content).is_some()
}

/// Return the document body with any frontmatter removed.
pub fn strip_frontmatter(content: &str) -> &str {
    match split_frontmatter(content) {
        Some((_, body)) => body,
        None => content,
    }
}

/// Look up a string-valued frontmatter field.
#[must_use]
pub fn string_field<'a>(map: &'a FrontmatterMap, key: &str) -> Option<&'a str> {
    map.get(key).and_then(serde_yaml::Value::as_str)
}
