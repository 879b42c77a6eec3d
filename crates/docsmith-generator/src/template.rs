//! Page templating.
//!
//! Lightweight string interpolation rather than a full template engine.
//! Placeholders are `{{ VAR }}`, with `{{ VAR? }}` for optional variables
//! that render as empty when absent. The built-in page template wraps content
//! in a single `<article>` element, which the PDF composition step depends
//! on; custom templates must preserve that wrapper.

use std::{collections::HashMap, path::Path};

use docsmith_core::Config;
use thiserror::Error;
use tracing::debug;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),

    /// Custom template file could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available during interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with an initial variable.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// An interpolation template.
#[derive(Debug, Clone)]
pub struct Template {
    content: String,
}

impl Template {
    /// Create a template from raw content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The built-in page template.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(DEFAULT_PAGE_TEMPLATE)
    }

    /// Load the template configured in `config.html.template`, or the
    /// built-in default when none is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.html.template {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
                        path: path.clone(),
                        source,
                    })?;
                debug!(path = %path.display(), "loaded custom page template");
                Ok(Self::new(content))
            }
            None => Ok(Self::builtin()),
        }
    }

    /// Render the template with the given context.
    ///
    /// Replaces all `{{ VAR }}` placeholders with values from the context;
    /// a missing required variable is an error, a missing optional one
    /// (`{{ VAR? }}`) renders as the empty string.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = self.content.clone();
        let mut pos = 0;

        while let Some(start) = result[pos..].find("{{") {
            let start = pos + start;
            let end = result[start..]
                .find("}}")
                .ok_or_else(|| TemplateError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;
            let end = start + end + 2;

            let var_name = result[start + 2..end - 2].trim();
            let (var_name, optional) = match var_name.strip_suffix('?') {
                Some(stripped) => (stripped.trim_end(), true),
                None => (var_name, false),
            };

            let value = match context.get(var_name) {
                Some(v) => v.to_string(),
                None if optional => String::new(),
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            };

            result.replace_range(start..end, &value);
            pos = start + value.len();
        }

        Ok(result)
    }
}

/// Breadcrumb trail for a page at `relative_path`.
///
/// The root links to the top-level index; each intermediate directory links
/// to its own `index.html` with the right number of `../` hops; the final
/// segment is the unlinked page title.
#[must_use]
pub fn breadcrumb_html(relative_path: &Path, title: &str) -> String {
    let components: Vec<String> = relative_path
        .parent()
        .map(|p| {
            p.iter()
                .map(|c| c.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    let depth = components.len();

    let mut out = String::from("<nav class=\"breadcrumbs\">");
    out.push_str(&format!(
        "<a href=\"{}index.html\">Home</a>",
        "../".repeat(depth)
    ));
    for (i, name) in components.iter().enumerate() {
        out.push_str(" / ");
        out.push_str(&format!(
            "<a href=\"{}index.html\">{}</a>",
            "../".repeat(depth - 1 - i),
            escape_html(name)
        ));
    }
    out.push_str(" / <span>");
    out.push_str(&escape_html(title));
    out.push_str("</span></nav>\n");
    out
}

/// Footer block. `None` omits the block entirely; empty text still emits an
/// empty block.
#[must_use]
pub fn footer_html(text: Option<&str>) -> Option<String> {
    text.map(|t| format!("<footer><p>{}</p></footer>\n", escape_html(t)))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Default page template. Content lives inside a single `<article>` wrapper.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ TITLE }}</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            line-height: 1.7;
            color: #1E293B;
            max-width: 780px;
            margin: 0 auto;
            padding: 2rem 1.5rem;
        }
        h1 { font-size: 2rem; border-bottom: 2px solid #E2E8F0; padding-bottom: 0.3rem; }
        h2 { font-size: 1.5rem; border-bottom: 1px solid #E2E8F0; padding-bottom: 0.2rem; }
        a { color: #3B82F6; text-decoration: none; }
        a:hover { text-decoration: underline; }
        pre {
            background: #F1F5F9;
            padding: 1rem;
            border-radius: 0.5rem;
            overflow-x: auto;
        }
        code { font-family: ui-monospace, Menlo, Consolas, monospace; font-size: 0.875em; }
        table { border-collapse: collapse; width: 100%; margin: 1.5rem 0; }
        th, td { border: 1px solid #E2E8F0; padding: 0.5rem 0.75rem; text-align: left; }
        th { background: #F8FAFC; }
        blockquote { border-left: 3px solid #3B82F6; padding-left: 1rem; margin-left: 0; color: #475569; }
        img { max-width: 100%; height: auto; }
        .breadcrumbs { font-size: 0.875rem; color: #64748B; margin-bottom: 1.5rem; }
        .admonition { border-left: 4px solid #888; background: #F8FAFC; padding: 0.5rem 1rem; margin: 1rem 0; border-radius: 0 0.25rem 0.25rem 0; }
        .admonition-title { font-weight: 600; margin: 0 0 0.25rem; }
        .admonition.warning { border-color: #e6a23c; background: #fdf6ec; }
        .admonition.danger { border-color: #f56c6c; background: #fef0f0; }
        .admonition.info { border-color: #409eff; background: #ecf5ff; }
        .admonition.tip, .admonition.success { border-color: #67c23a; background: #f0f9eb; }
        .index-tree { list-style: none; padding-left: 1rem; }
        .index-tree > li { margin: 0.25rem 0; }
        footer { border-top: 1px solid #E2E8F0; margin-top: 3rem; padding-top: 1rem; font-size: 0.875rem; color: #64748B; }
    </style>
</head>
<body>
{{ BREADCRUMBS? }}<article>
{{ CONTENT }}
</article>
{{ FOOTER? }}</body>
</html>"#;
