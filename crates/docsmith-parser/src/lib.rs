//! Docsmith Parser Library
//!
//! Markdown to HTML fragment rendering: headings, lists, tables, highlighted
//! fenced code, and admonition containers. Diagram fences (` ```mermaid `) are
//! preserved as class-tagged code blocks for later substitution.

pub mod admonition;
pub mod markdown;
pub mod syntax;

pub use markdown::MarkdownRenderer;
pub use syntax::SyntaxHighlighter;
