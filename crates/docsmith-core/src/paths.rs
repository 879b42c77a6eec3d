//! Path security for user-supplied image references.
//!
//! Only bare filenames inside one trusted image root are ever embeddable.
//! Directory components in a reference are discarded wholesale, which is a
//! deliberate policy rather than a normalization step: a reference like
//! `../../etc/passwd` resolves to `<root>/passwd` or nothing at all.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Validate an image reference against the trusted root.
///
/// Strips leading slashes and a redundant `<root-dirname>/` prefix, keeps only
/// the base filename, resolves it against `root`, and rejects any result that
/// is not a direct child of `root`.
pub fn validate_image_path(reference: &str, root: &Path) -> Result<PathBuf> {
    let mut sanitized = reference.trim_start_matches('/');

    // References are often written as `images/foo.png` with the root's own
    // directory name as a prefix; accept and strip that spelling.
    if let Some(root_name) = root.file_name().and_then(|n| n.to_str()) {
        if let Some(rest) = sanitized.strip_prefix(root_name) {
            if let Some(rest) = rest.strip_prefix('/') {
                sanitized = rest;
            }
        }
    }

    let filename = Path::new(sanitized)
        .file_name()
        .ok_or_else(|| CoreError::unsafe_image_path(reference))?;

    let resolved = root.join(filename);
    if !resolved.starts_with(root) {
        return Err(CoreError::unsafe_image_path(reference));
    }

    Ok(resolved)
}
