//! Error types for the docsmith core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for docsmith.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration validation error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Frontmatter parsing error with file location.
    #[error("Frontmatter error in {}: {message}", path.display())]
    Frontmatter { path: PathBuf, message: String },

    /// Image reference that escapes or cannot resolve inside the trusted root.
    #[error("Unsafe image reference: {reference}")]
    UnsafeImagePath { reference: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new frontmatter error.
    pub fn frontmatter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new unsafe image path error.
    pub fn unsafe_image_path(reference: impl Into<String>) -> Self {
        Self::UnsafeImagePath {
            reference: reference.into(),
        }
    }
}
