//! Syntax highlighting for fenced code blocks.
//!
//! Highlighting emits classed spans rather than inline styles so the produced
//! markup stays entity-escaped text underneath. The diagram replacer depends
//! on that: stripping tags from a highlighted fence must recover the literal
//! source.

use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

/// Syntax highlighter using syntect with classed-span output.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Create a highlighter with the default syntax definitions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Highlight code, returning the inner HTML for a `<code>` element.
    ///
    /// Unknown or missing languages fall back to first-line auto-detection;
    /// if that also fails, the code is returned plainly escaped.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang
            .and_then(|l| self.syntax_set.find_syntax_by_token(l))
            .or_else(|| self.syntax_set.find_syntax_by_first_line(code));

        match syntax {
            Some(syntax) => self
                .classed_spans(code, syntax)
                .unwrap_or_else(|| escape_html(code)),
            None => escape_html(code),
        }
    }

    fn classed_spans(&self, code: &str, syntax: &SyntaxReference) -> Option<String> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .ok()?;
        }
        Some(generator.finalize())
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
