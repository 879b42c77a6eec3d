//! Docsmith Render Library
//!
//! Browser-backed rendering: the shared Chromium session, mermaid diagram
//! rendering, local image embedding, heading indexing with TOC generation,
//! and combined-PDF composition.

pub mod browser;
pub mod diagram;
pub mod error;
pub mod image;
pub mod pdf;
pub mod text;
pub mod toc;

pub use browser::BrowserSession;
pub use diagram::DiagramRenderer;
pub use error::{RenderError, Result};
pub use image::ImageEmbedder;
pub use pdf::{PdfComposer, PDF_FILENAME};
pub use toc::{index_headings, toc_html};
