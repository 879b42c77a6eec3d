//! Docsmith Generator Library
//!
//! Orchestrates the documentation pipeline: input discovery, per-document
//! Markdown conversion, page templating, index generation, and combined-PDF
//! composition through the shared browser session.

pub mod discover;
pub mod generate;
pub mod index;
pub mod scratch;
pub mod template;

pub use discover::{discover, Discovery};
pub use generate::{GenerateError, GenerateOptions, Generator, Result};
pub use scratch::ScratchDir;
pub use template::{Template, TemplateContext, TemplateError};
