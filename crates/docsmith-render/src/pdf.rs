//! Combined-PDF composition.
//!
//! Emitted HTML pages are reduced to their `<article>` regions, joined into a
//! single print document, run through the image/diagram/TOC passes, and
//! printed by the shared browser at the configured paper size. The combined
//! HTML is written beside the output as a temporary artifact so the browser
//! can resolve it over `file://`; it is removed again whatever the print
//! outcome.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
    time::Duration,
};

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use docsmith_core::Config;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    browser::BrowserSession,
    diagram::DiagramRenderer,
    error::{RenderError, Result},
    image::ImageEmbedder,
    text::escape_html,
    toc::{index_headings, toc_html},
};

/// Name of the combined PDF inside the output directory.
pub const PDF_FILENAME: &str = "document.pdf";

/// Name of the temporary combined-HTML artifact.
pub const ARTIFACT_FILENAME: &str = "temp-combined.html";

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// 25 mm top/bottom and 20 mm left/right, in inches.
const MARGIN_VERTICAL_IN: f64 = 0.98;
const MARGIN_HORIZONTAL_IN: f64 = 0.79;

static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<article>(.*?)</article>").expect("article regex"));

/// Composes the emitted pages into one printed PDF.
#[derive(Debug)]
pub struct PdfComposer<'a> {
    config: &'a Config,
    session: &'a BrowserSession,
}

impl<'a> PdfComposer<'a> {
    /// Create a composer over the run's configuration and browser session.
    #[must_use]
    pub fn new(config: &'a Config, session: &'a BrowserSession) -> Self {
        Self { config, session }
    }

    /// Combine `html_files` in order and write `document.pdf` under
    /// `output_dir`, returning its path.
    pub async fn compose(&self, html_files: &[PathBuf], output_dir: &Path) -> Result<PathBuf> {
        let mut body = String::new();
        for path in html_files {
            let html = tokio::fs::read_to_string(path).await?;
            match ARTICLE_RE.captures(&html).and_then(|c| c.get(1)) {
                Some(article) => {
                    body.push_str("<section class=\"document-section\">\n");
                    body.push_str(article.as_str());
                    body.push_str("\n</section>\n<div class=\"page-break\"></div>\n");
                }
                None => {
                    warn!(path = %path.display(), "page has no <article> region, skipping");
                }
            }
        }

        if self.config.images.embed {
            if let Some(images_dir) = &self.config.images_dir {
                body = ImageEmbedder::new(images_dir).embed(&body).await;
            }
        }

        if self.config.diagram.enabled {
            let renderer = DiagramRenderer::new(self.session, self.config.diagram.theme);
            body = renderer.replace_diagrams(&body).await;
        }

        if self.config.pdf.include_toc {
            let (indexed, headings) = index_headings(&body, self.config.pdf.toc_level);
            let toc = toc_html(&headings, "Table of Contents");
            body = format!("{toc}{indexed}");
        }

        let document = self.print_document(&body);

        let artifact = output_dir.join(ARTIFACT_FILENAME);
        tokio::fs::write(&artifact, &document).await?;
        debug!(path = %artifact.display(), "wrote combined artifact");

        let pdf_path = output_dir.join(PDF_FILENAME);
        let outcome = self.print(&artifact, &pdf_path).await;

        if let Err(e) = tokio::fs::remove_file(&artifact).await {
            warn!(path = %artifact.display(), error = %e, "failed to remove combined artifact");
        }

        outcome?;
        info!(path = %pdf_path.display(), "wrote combined pdf");
        Ok(pdf_path)
    }

    async fn print(&self, artifact: &Path, pdf_path: &Path) -> Result<()> {
        let canonical = artifact.canonicalize()?;
        let url = format!("file://{}", canonical.display());

        let page = self.session.page().await?;
        let outcome = tokio::time::timeout(NAVIGATION_TIMEOUT, async {
            page.goto(url.as_str()).await?;
            page.wait_for_navigation().await?;
            Ok::<_, RenderError>(())
        })
        .await;
        match outcome {
            Ok(result) => result?,
            Err(_) => {
                let _ = page.close().await;
                return Err(RenderError::Timeout {
                    seconds: NAVIGATION_TIMEOUT.as_secs(),
                });
            }
        }

        let (width, height) = self.config.pdf.format.dimensions_inches();
        let params = PrintToPdfParams {
            landscape: Some(false),
            print_background: Some(true),
            prefer_css_page_size: Some(true),
            paper_width: Some(width),
            paper_height: Some(height),
            margin_top: Some(MARGIN_VERTICAL_IN),
            margin_bottom: Some(MARGIN_VERTICAL_IN),
            margin_left: Some(MARGIN_HORIZONTAL_IN),
            margin_right: Some(MARGIN_HORIZONTAL_IN),
            ..Default::default()
        };

        let result = async {
            let bytes = page.pdf(params).await?;
            tokio::fs::write(pdf_path, bytes).await?;
            Ok::<_, RenderError>(())
        }
        .await;

        if let Err(e) = page.close().await {
            debug!(error = %e, "failed to close print page");
        }

        result
    }

    /// Full print document: cover, optional TOC-carrying body, print CSS.
    fn print_document(&self, body: &str) -> String {
        let pdf = &self.config.pdf;
        let title = pdf.cover_title.as_deref().unwrap_or("Documentation");
        let font = &pdf.font;
        let font_param = font.replace(' ', "+");

        let cover = if pdf.include_cover {
            let subtitle = pdf
                .cover_subtitle
                .as_deref()
                .map(|s| format!("<p class=\"cover-subtitle\">{}</p>\n", escape_html(s)))
                .unwrap_or_default();
            format!(
                "<div class=\"cover-page\">\n<h1 class=\"cover-title\">{}</h1>\n{}</div>\n\
                 <div class=\"page-break\"></div>\n",
                escape_html(title),
                subtitle,
            )
        } else {
            String::new()
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{title}</title>
<link href="https://fonts.googleapis.com/css2?family={font_param}:wght@400;700&display=swap" rel="stylesheet">
<style>
@page {{
  size: {page_size};
  margin: 25mm 20mm;
}}
body {{
  font-family: '{font}', sans-serif;
  font-size: 10.5pt;
  line-height: 1.7;
  color: #222;
  margin: 0;
}}
h1 {{ font-size: 18pt; border-bottom: 2px solid #333; padding-bottom: 0.2em; }}
h2 {{ font-size: 14pt; border-bottom: 1px solid #999; padding-bottom: 0.15em; }}
h3 {{ font-size: 12pt; }}
h1, h2, h3, h4, h5, h6 {{ page-break-after: avoid; }}
pre {{
  background: #f6f8fa;
  padding: 12px;
  border-radius: 4px;
  overflow-x: hidden;
  white-space: pre-wrap;
  word-wrap: break-word;
  page-break-inside: avoid;
  font-size: 9pt;
}}
code {{ font-family: 'Courier New', monospace; font-size: 9.5pt; }}
table {{ border-collapse: collapse; width: 100%; page-break-inside: avoid; }}
th, td {{ border: 1px solid #999; padding: 6px 10px; }}
th {{ background: #eee; }}
blockquote {{ border-left: 4px solid #ccc; margin-left: 0; padding-left: 1em; color: #555; }}
img, svg {{ max-width: 100%; height: auto; }}
.page-break {{ page-break-after: always; }}
.document-section {{ page-break-inside: auto; }}
.cover-page {{
  display: flex;
  flex-direction: column;
  justify-content: center;
  align-items: center;
  height: 80vh;
  text-align: center;
}}
.cover-title {{ font-size: 28pt; border: none; }}
.cover-subtitle {{ font-size: 14pt; color: #555; }}
.table-of-contents ul {{ list-style: none; padding-left: 0; }}
.table-of-contents a {{ text-decoration: none; color: #222; }}
.table-of-contents .toc-level-2 {{ padding-left: 1.5em; }}
.table-of-contents .toc-level-3 {{ padding-left: 3em; }}
.admonition {{
  border-left: 4px solid #888;
  background: #f5f5f5;
  padding: 0.5em 1em;
  margin: 1em 0;
  page-break-inside: avoid;
}}
.admonition-title {{ font-weight: bold; margin: 0 0 0.3em; }}
.admonition.warning {{ border-color: #e6a23c; background: #fdf6ec; }}
.admonition.danger {{ border-color: #f56c6c; background: #fef0f0; }}
.admonition.info {{ border-color: #409eff; background: #ecf5ff; }}
.admonition.tip {{ border-color: #67c23a; background: #f0f9eb; }}
.admonition.success {{ border-color: #67c23a; background: #f0f9eb; }}
.diagram-svg {{ page-break-inside: avoid; }}
</style>
</head>
<body>
{cover}{body}
</body>
</html>"#,
            title = escape_html(title),
            page_size = pdf.format.css_keyword(),
        )
    }
}
