//! Diagram rendering through the shared browser session.
//!
//! Mermaid source is rendered client-side in a short-lived page, then the
//! produced SVG is read back with a shrink-only width clamp. A failed or
//! timed-out render degrades to a visible placeholder; it never aborts the
//! surrounding document.

use std::{sync::LazyLock, time::Duration};

use chromiumoxide::page::Page;
use docsmith_core::{
    rewrite::{apply_edits, Edit},
    DiagramTheme,
};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    browser::BrowserSession,
    error::{RenderError, Result},
    text::{decode_entities, strip_tags},
};

/// Maximum intrinsic diagram width, calibrated to the print page's available
/// width (210mm paper minus 40mm margins at 96dpi is roughly 500px).
pub const MAX_DIAGRAM_WIDTH_PX: u32 = 500;

/// Fixed delay for client-side layout to settle after page load.
const SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// Hard ceiling on one diagram render, settle delay included.
const RENDER_TIMEOUT: Duration = Duration::from_secs(20);

/// Pinned major version of the diagram library.
const MERMAID_CDN: &str = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";

static DIAGRAM_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code class="language-mermaid">(.*?)</code></pre>"#)
        .expect("diagram fence regex")
});

/// Renders diagram fences to inline SVG.
#[derive(Debug)]
pub struct DiagramRenderer<'a> {
    session: &'a BrowserSession,
    theme: DiagramTheme,
}

impl<'a> DiagramRenderer<'a> {
    /// Create a renderer over the given session.
    #[must_use]
    pub fn new(session: &'a BrowserSession, theme: DiagramTheme) -> Self {
        Self { session, theme }
    }

    /// Render one diagram source to SVG markup.
    pub async fn render_svg(&self, source: &str) -> Result<String> {
        let page = self.session.page().await?;
        let outcome = match tokio::time::timeout(RENDER_TIMEOUT, render_on_page(&page, source, self.theme)).await
        {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout {
                seconds: RENDER_TIMEOUT.as_secs(),
            }),
        };
        if let Err(e) = page.close().await {
            debug!(error = %e, "failed to close diagram page");
        }
        outcome
    }

    /// Replace every tagged diagram fence in `html` with rendered SVG or,
    /// on failure, a visible placeholder.
    pub async fn replace_diagrams(&self, html: &str) -> String {
        let fences: Vec<(std::ops::Range<usize>, String)> = DIAGRAM_FENCE_RE
            .captures_iter(html)
            .filter_map(|caps| {
                let m = caps.get(0)?;
                let inner = caps.get(1)?.as_str();
                // Undo syntax highlighting: tags off first, then entities.
                let source = decode_entities(&strip_tags(inner)).trim().to_string();
                Some((m.range(), source))
            })
            .collect();

        if fences.is_empty() {
            return html.to_string();
        }

        info!(count = fences.len(), "rendering diagrams");

        let mut edits = Vec::with_capacity(fences.len());
        for (span, source) in fences {
            let replacement = match self.render_svg(&source).await {
                Ok(svg) => {
                    format!(
                        "<div class=\"diagram-svg\" style=\"text-align: center; margin: 1rem 0;\">{svg}</div>"
                    )
                }
                Err(e) => {
                    warn!(error = %e, "diagram render failed, substituting placeholder");
                    PLACEHOLDER_HTML.to_string()
                }
            };
            edits.push(Edit::new(span, replacement));
        }

        apply_edits(html, edits)
    }
}

/// Placeholder block substituted for a failed diagram.
pub const PLACEHOLDER_HTML: &str = "<div class=\"diagram-placeholder\" style=\"background: #f5f5f5; \
     padding: 20px; border: 1px solid #ddd; border-radius: 4px; margin: 1rem 0;\">\
     <p><em>Diagram rendering failed</em></p></div>";

async fn render_on_page(page: &Page, source: &str, theme: DiagramTheme) -> Result<String> {
    page.set_content(host_document(source, theme)).await?;
    tokio::time::sleep(SETTLE_DELAY).await;

    let svg: Option<String> = page
        .evaluate(clamp_script())
        .await?
        .into_value()
        .unwrap_or(None);

    svg.ok_or(RenderError::MissingDiagramOutput)
}

/// Minimal host document that loads the diagram library and renders inline.
fn host_document(source: &str, theme: DiagramTheme) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <style>
    body {{ margin: 0; padding: 0; }}
    .mermaid {{ max-width: {max}px; }}
    .mermaid svg {{ max-width: 100%; height: auto; }}
  </style>
  <script type="module">
    import mermaid from '{cdn}';
    mermaid.initialize({{
      startOnLoad: true,
      theme: '{theme}',
      maxTextSize: 50000,
      flowchart: {{ useMaxWidth: true, htmlLabels: true }},
      sequence: {{ useMaxWidth: true }},
      er: {{ useMaxWidth: true }},
      gantt: {{ useMaxWidth: true }},
      pie: {{ useMaxWidth: true }},
      class: {{ useMaxWidth: true }},
      state: {{ useMaxWidth: true }}
    }});
  </script>
</head>
<body>
  <div class="mermaid" style="max-width: {max}px;">
{source}
  </div>
</body>
</html>"#,
        max = MAX_DIAGRAM_WIDTH_PX,
        cdn = MERMAID_CDN,
        theme = theme.as_str(),
    )
}

/// Script that clamps the SVG width (shrink only, never enlarge), repairs the
/// viewBox so proportions survive, and returns the final markup.
fn clamp_script() -> String {
    const SCRIPT: &str = r#"(() => {
  const svg = document.querySelector('svg');
  if (!svg) return null;
  const width = svg.getAttribute('width');
  const height = svg.getAttribute('height');
  const viewBox = svg.getAttribute('viewBox');
  const maxW = __MAX_WIDTH__;
  if (width && height) {
    const w = parseFloat(width);
    const h = parseFloat(height);
    if (w > maxW) {
      const scale = maxW / w;
      svg.setAttribute('width', String(maxW));
      svg.setAttribute('height', String(h * scale));
      if (!viewBox) {
        svg.setAttribute('viewBox', '0 0 ' + w + ' ' + h);
      }
    }
  }
  svg.style.maxWidth = svg.getAttribute('width') + 'px';
  svg.style.height = 'auto';
  return svg.outerHTML;
})()"#;
    SCRIPT.replace("__MAX_WIDTH__", &MAX_DIAGRAM_WIDTH_PX.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_regex_matches_highlighted_fence() {
        let html = "<p>x</p>\n<pre><code class=\"language-mermaid\">\
                    <span class=\"source\">graph TD;</span>\n  A--&gt;B;</code></pre>\n<p>y</p>";
        let caps = DIAGRAM_FENCE_RE.captures(html).expect("match");
        let source = decode_entities(&strip_tags(&caps[1]));
        assert_eq!(source.trim(), "graph TD;\n  A-->B;");
    }

    #[test]
    fn test_fence_regex_ignores_other_languages() {
        let html = "<pre><code class=\"language-rust\">fn main() {}</code></pre>";
        assert!(DIAGRAM_FENCE_RE.captures(html).is_none());
    }

    #[test]
    fn test_host_document_pins_theme_and_width() {
        let doc = host_document("graph TD;", DiagramTheme::Forest);
        assert!(doc.contains("theme: 'forest'"));
        assert!(doc.contains("max-width: 500px"));
        assert!(doc.contains("mermaid.esm.min.mjs"));
    }

    #[test]
    fn test_clamp_script_inlines_max_width() {
        let script = clamp_script();
        assert!(script.contains("const maxW = 500;"));
        assert!(!script.contains("__MAX_WIDTH__"));
    }

    #[tokio::test]
    async fn test_no_fences_is_identity() {
        let session = BrowserSession::new();
        let renderer = DiagramRenderer::new(&session, DiagramTheme::Default);
        let html = "<p>no diagrams here</p>";
        assert_eq!(renderer.replace_diagrams(html).await, html);
        // No browser was ever needed.
        assert!(!session.is_active().await);
    }

    #[tokio::test]
    async fn test_failed_render_degrades_to_placeholder() {
        // A launch pinned to a missing executable fails without a browser,
        // which is exactly the degradation path a broken diagram takes.
        let session = BrowserSession::with_executable("/nonexistent/chromium");
        let renderer = DiagramRenderer::new(&session, DiagramTheme::Default);
        let html = "<p>intact paragraph</p>\n\
                    <pre><code class=\"language-mermaid\">graph TD;\n  A--&gt;B;</code></pre>\n\
                    <p>also intact</p>";
        let out = renderer.replace_diagrams(html).await;
        assert!(out.contains("<p>intact paragraph</p>"));
        assert!(out.contains("<p>also intact</p>"));
        assert!(out.contains("diagram-placeholder"));
        assert!(out.contains("Diagram rendering failed"));
        assert!(!out.contains("language-mermaid"));
    }

    #[tokio::test]
    #[ignore = "requires a Chromium installation and network access"]
    async fn test_render_simple_diagram() {
        let session = BrowserSession::new();
        let renderer = DiagramRenderer::new(&session, DiagramTheme::Default);
        let svg = renderer.render_svg("graph TD;\n  A-->B;").await.expect("render");
        assert!(svg.starts_with("<svg"));
        session.release().await;
    }
}
