//! Span-edit rewriting.
//!
//! Diagram and image substitutions are collected as `(span, replacement)`
//! edits against the original string and applied once, right-to-left, so that
//! earlier replacements never shift the byte offsets of later ones.

use std::ops::Range;

/// A single pending replacement of a byte span.
#[derive(Debug, Clone)]
pub struct Edit {
    /// Byte range in the original string.
    pub span: Range<usize>,

    /// Replacement text.
    pub replacement: String,
}

impl Edit {
    /// Create an edit for the given span.
    #[must_use]
    pub fn new(span: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// Apply a set of non-overlapping edits to `input`.
///
/// Edits are sorted by start offset and applied from the end of the string
/// backwards. Overlapping edits are a logic error; the later-starting one wins
/// and the overlapped one is dropped.
#[must_use]
pub fn apply_edits(input: &str, mut edits: Vec<Edit>) -> String {
    if edits.is_empty() {
        return input.to_string();
    }

    edits.sort_by_key(|e| e.span.start);

    let mut result = input.to_string();
    let mut last_start = result.len();

    for edit in edits.into_iter().rev() {
        if edit.span.end > last_start {
            continue;
        }
        result.replace_range(edit.span.clone(), &edit.replacement);
        last_start = edit.span.start;
    }

    result
}
