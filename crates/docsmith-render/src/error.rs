//! Error types for browser-backed rendering.

use thiserror::Error;

/// Result type alias using `RenderError`.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Rendering errors.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Browser launch configuration was rejected.
    #[error("browser configuration error: {0}")]
    BrowserConfig(String),

    /// Browser process or protocol error.
    #[error("browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// A browser operation exceeded its hard timeout.
    #[error("browser operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The diagram library produced no SVG output.
    #[error("diagram produced no output")]
    MissingDiagramOutput,

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
