//! Generation orchestration.
//!
//! Drives the full pipeline: discovery, per-document conversion, index page,
//! PDF composition, and guaranteed cleanup of the scratch directory and any
//! browser process this run started.

use std::path::{Path, PathBuf};

use docsmith_core::{Config, CoreError, GenerateResult, SourceDocument};
use docsmith_core::frontmatter::parse_frontmatter;
use docsmith_parser::MarkdownRenderer;
use docsmith_render::{BrowserSession, PdfComposer, RenderError, PDF_FILENAME};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    discover::discover,
    index::{build_tree, index_page},
    scratch::ScratchDir,
    template::{breadcrumb_html, footer_html, Template, TemplateContext, TemplateError},
};

/// Generation errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core error (configuration, frontmatter, path security).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Render error (browser, diagram, PDF).
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The input root could not be read.
    #[error("failed to read input root {}: {source}", path.display())]
    InputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single-file input that is not a Markdown document.
    #[error("unsupported input file (expected .md): {}", path.display())]
    UnsupportedInput { path: PathBuf },

    /// PDF output was requested but is disabled in the configuration.
    #[error("PDF output requested while pdf.enabled is false")]
    PdfDisabled,
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Per-run flags alongside the configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Skip HTML emission; pages are staged in a scratch directory and only
    /// the combined PDF lands in the output directory.
    pub skip_html: bool,

    /// Skip PDF composition even when `pdf.enabled` is set.
    pub skip_pdf: bool,

    /// Title override applied to every page, ahead of frontmatter.
    pub title_override: Option<String>,
}

/// Pipeline orchestrator for one configuration.
#[derive(Debug)]
pub struct Generator {
    config: Config,
}

impl Generator {
    /// Create a generator after validating the configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the pipeline.
    ///
    /// Cleanup is a guaranteed finalizer: the scratch directory is always
    /// removed and the browser is released if this run started it, whatever
    /// the outcome upstream.
    pub async fn generate(
        &self,
        options: &GenerateOptions,
        session: &BrowserSession,
    ) -> Result<GenerateResult> {
        let emit_html = !options.skip_html;
        let emit_pdf = !options.skip_pdf && self.config.pdf.enabled;
        if !emit_html && !emit_pdf {
            return Err(GenerateError::PdfDisabled);
        }

        let scratch = if emit_html {
            None
        } else {
            Some(ScratchDir::new()?)
        };
        let html_root = scratch
            .as_ref()
            .map(|s| s.path().to_path_buf())
            .unwrap_or_else(|| self.config.output_dir.clone());

        let session_was_active = session.is_active().await;

        let result = self
            .run(options, session, &html_root, emit_html, emit_pdf)
            .await;

        if let Some(scratch) = scratch {
            scratch.remove();
        }
        if !session_was_active && session.is_active().await {
            session.release().await;
        }

        result
    }

    async fn run(
        &self,
        options: &GenerateOptions,
        session: &BrowserSession,
        html_root: &Path,
        emit_html: bool,
        emit_pdf: bool,
    ) -> Result<GenerateResult> {
        info!(
            input = %self.config.input_dir.display(),
            output = %self.config.output_dir.display(),
            pdf = emit_pdf,
            "starting generation"
        );

        let discovery = discover(&self.config.input_dir)?;
        let template = Template::from_config(&self.config)?;
        let renderer = MarkdownRenderer::new();

        tokio::fs::create_dir_all(html_root).await?;

        let mut html_files = Vec::new();
        let mut page_titles = Vec::new();
        for (path, relative) in &discovery.documents {
            let (output_path, title) = self
                .convert_document(&renderer, &template, options, path, relative, html_root)
                .await?;
            html_files.push(output_path);
            page_titles.push((relative.clone(), title));
        }

        if discovery.is_directory && emit_html {
            self.write_index(&template, &page_titles, html_root).await?;
        }

        let mut pdf_file = None;
        if emit_pdf {
            pdf_file = Some(
                self.compose_pdf(session, &html_files, html_root, emit_html)
                    .await?,
            );
        }

        info!(
            pages = html_files.len(),
            pdf = pdf_file.is_some(),
            "generation complete"
        );

        Ok(GenerateResult {
            html_files: if emit_html { html_files } else { Vec::new() },
            pdf_file,
            document_count: discovery.documents.len(),
        })
    }

    async fn convert_document(
        &self,
        renderer: &MarkdownRenderer,
        template: &Template,
        options: &GenerateOptions,
        path: &Path,
        relative: &Path,
        html_root: &Path,
    ) -> Result<(PathBuf, String)> {
        let raw = tokio::fs::read_to_string(path).await?;
        let (frontmatter, body) = parse_frontmatter(&raw, path)?;
        let document = SourceDocument {
            path: path.to_path_buf(),
            relative_path: relative.to_path_buf(),
            frontmatter,
            body,
        };
        let title = document.resolve_title(options.title_override.as_deref());
        let content = renderer.render(&document.body);

        let mut ctx = TemplateContext::new()
            .with_var("TITLE", &title)
            .with_var("CONTENT", content);
        if self.config.html.breadcrumbs {
            ctx.insert("BREADCRUMBS", breadcrumb_html(relative, &title));
        }
        if let Some(footer) = footer_html(self.config.html.footer_text.as_deref()) {
            ctx.insert("FOOTER", footer);
        }
        let html = template.render(&ctx)?;

        let output_path = html_root.join(relative.with_extension("html"));
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&output_path, &html).await?;
        debug!(path = %output_path.display(), title = %title, "wrote page");

        Ok((output_path, title))
    }

    async fn write_index(
        &self,
        template: &Template,
        page_titles: &[(PathBuf, String)],
        html_root: &Path,
    ) -> Result<()> {
        let tree = build_tree(page_titles);
        let html = index_page(template, &tree, self.config.html.footer_text.as_deref())?;
        let index_path = html_root.join("index.html");
        tokio::fs::write(&index_path, html).await?;
        info!(path = %index_path.display(), "wrote index page");
        Ok(())
    }

    async fn compose_pdf(
        &self,
        session: &BrowserSession,
        html_files: &[PathBuf],
        html_root: &Path,
        emit_html: bool,
    ) -> Result<PathBuf> {
        let composer = PdfComposer::new(&self.config, session);
        let produced = composer.compose(html_files, html_root).await?;

        if emit_html {
            return Ok(produced);
        }

        // Scratch mode: only the finished PDF leaves the staging area.
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let target = self.config.output_dir.join(PDF_FILENAME);
        tokio::fs::copy(&produced, &target).await?;
        info!(path = %target.display(), "copied pdf to output directory");
        Ok(target)
    }
}
