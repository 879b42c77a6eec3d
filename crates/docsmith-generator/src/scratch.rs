//! Scratch directory for PDF-only runs.
//!
//! When HTML emission is skipped but a PDF is requested, pages are written to
//! a throwaway directory under the OS temp root and only the finished PDF is
//! copied back out.

use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::generate::Result;

/// A run-scoped scratch directory under the OS temp root.
///
/// [`remove`](Self::remove) is the intended teardown; `Drop` is a best-effort
/// backstop when the run unwinds without reaching it.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
}

impl ScratchDir {
    /// Create a fresh scratch directory with a collision-resistant name.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("docsmith-").tempdir()?;
        debug!(path = %dir.path().display(), "created scratch directory");
        Ok(Self { dir: Some(dir) })
    }

    /// Path of the scratch directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir
            .as_ref()
            .map(TempDir::path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Remove the directory.
    ///
    /// The path is re-validated against the OS temp root before deletion; a
    /// path that no longer sits under it is leaked rather than deleted.
    /// Failures are logged, never surfaced.
    pub fn remove(mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let temp_root = std::env::temp_dir();
        if !dir.path().starts_with(&temp_root) {
            warn!(
                path = %dir.path().display(),
                "scratch path escaped the temp root, refusing to delete"
            );
            let _ = dir.keep();
            return;
        }
        let path = dir.path().to_path_buf();
        if let Err(e) = dir.close() {
            warn!(path = %path.display(), error = %e, "failed to remove scratch directory");
        } else {
            debug!(path = %path.display(), "removed scratch directory");
        }
    }
}
