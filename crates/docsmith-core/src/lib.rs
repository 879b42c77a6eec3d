//! Docsmith Core Library
//!
//! Core types, configuration, path security, and error handling for the
//! docsmith documentation pipeline.

pub mod config;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod paths;
pub mod rewrite;

pub use config::{Config, DiagramTheme, PaperFormat};
pub use document::{GenerateResult, Heading, IndexEntry, RenderedPage, SourceDocument};
pub use error::{CoreError, Result};
pub use frontmatter::FrontmatterMap;
