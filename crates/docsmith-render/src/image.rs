//! Local image embedding.
//!
//! Image references are inlined as base64 data URIs so the combined print
//! document is self-contained. Remote URLs and already-inlined data URIs are
//! left untouched, and any single failed embed degrades to the original
//! reference with a warning.

use std::{path::PathBuf, sync::LazyLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use docsmith_core::{
    paths::validate_image_path,
    rewrite::{apply_edits, Edit},
};
use regex::Regex;
use tracing::{debug, warn};

use crate::text::escape_html;

static MARKDOWN_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("markdown image regex"));

static HTML_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img([^>]*?)src="([^"]+)"([^>]*)>"#).expect("html image regex"));

/// Inlines local images as data URIs.
#[derive(Debug, Clone)]
pub struct ImageEmbedder {
    images_dir: PathBuf,
}

impl ImageEmbedder {
    /// Create an embedder rooted at the trusted images directory.
    #[must_use]
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    /// Embed every local image reference in `html`.
    ///
    /// Two passes: raw markdown image syntax that survived conversion, then
    /// `<img>` tags. References that cannot be read stay as they were.
    pub async fn embed(&self, html: &str) -> String {
        let html = self.embed_markdown_refs(html).await;
        self.embed_img_tags(&html).await
    }

    async fn embed_markdown_refs(&self, html: &str) -> String {
        let mut edits = Vec::new();
        for caps in MARKDOWN_IMAGE_RE.captures_iter(html) {
            let m = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let alt = &caps[1];
            let reference = &caps[2];
            if is_external(reference) {
                continue;
            }
            if let Some(uri) = self.data_uri(reference).await {
                edits.push(Edit::new(
                    m.range(),
                    format!(
                        "<img src=\"{uri}\" alt=\"{}\" style=\"max-width: 100%; height: auto;\" />",
                        escape_html(alt)
                    ),
                ));
            }
        }
        apply_edits(html, edits)
    }

    async fn embed_img_tags(&self, html: &str) -> String {
        let mut edits = Vec::new();
        for caps in HTML_IMAGE_RE.captures_iter(html) {
            let m = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let before = &caps[1];
            let reference = &caps[2];
            let after = &caps[3];
            if is_external(reference) {
                continue;
            }
            if let Some(uri) = self.data_uri(reference).await {
                edits.push(Edit::new(
                    m.range(),
                    format!("<img{before}src=\"{uri}\"{after}>"),
                ));
            }
        }
        apply_edits(html, edits)
    }

    /// Read one reference from the trusted root and encode it, or `None` with
    /// a warning when the reference is unsafe or unreadable.
    async fn data_uri(&self, reference: &str) -> Option<String> {
        let resolved = match validate_image_path(reference, &self.images_dir) {
            Ok(path) => path,
            Err(e) => {
                warn!(reference, error = %e, "rejected image reference");
                return None;
            }
        };
        let bytes = match tokio::fs::read(&resolved).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %resolved.display(), error = %e, "failed to read image");
                return None;
            }
        };
        debug!(path = %resolved.display(), size = bytes.len(), "embedded image");
        Some(format!(
            "data:{};base64,{}",
            mime_for(&resolved),
            STANDARD.encode(bytes)
        ))
    }
}

fn is_external(reference: &str) -> bool {
    reference.starts_with("data:")
        || reference.starts_with("http://")
        || reference.starts_with("https://")
}

fn mime_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn embedder_with(name: &str, bytes: &[u8]) -> (TempDir, ImageEmbedder) {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join(name), bytes).await.unwrap();
        let embedder = ImageEmbedder::new(dir.path());
        (dir, embedder)
    }

    #[tokio::test]
    async fn test_embeds_markdown_reference() {
        let (_dir, embedder) = embedder_with("logo.png", b"fakepng").await;
        let out = embedder.embed("before ![Logo](logo.png) after").await;
        assert!(out.contains("data:image/png;base64,"));
        assert!(out.contains("alt=\"Logo\""));
        assert!(!out.contains("!["));
    }

    #[tokio::test]
    async fn test_embeds_img_tag_preserving_attributes() {
        let (_dir, embedder) = embedder_with("pic.jpg", b"fakejpeg").await;
        let out = embedder
            .embed("<img class=\"wide\" src=\"pic.jpg\" width=\"80\">")
            .await;
        assert!(out.contains("data:image/jpeg;base64,"));
        assert!(out.contains("class=\"wide\""));
        assert!(out.contains("width=\"80\""));
    }

    #[tokio::test]
    async fn test_external_urls_untouched() {
        let (_dir, embedder) = embedder_with("x.png", b"x").await;
        let html = "<img src=\"https://example.com/a.png\"> ![r](http://example.com/b.png) \
                    <img src=\"data:image/png;base64,AAAA\">";
        assert_eq!(embedder.embed(html).await, html);
    }

    #[tokio::test]
    async fn test_missing_image_left_as_is() {
        let (_dir, embedder) = embedder_with("x.png", b"x").await;
        let html = "<img src=\"missing.png\">";
        assert_eq!(embedder.embed(html).await, html);
    }

    #[tokio::test]
    async fn test_traversal_reads_only_inside_root() {
        let (_dir, embedder) = embedder_with("secret.png", b"inside").await;
        // The basename resolves inside the root, so it embeds the trusted copy.
        let out = embedder.embed("![x](../../secret.png)").await;
        assert!(out.contains(&format!("base64,{}", STANDARD.encode(b"inside"))));
    }

    #[tokio::test]
    async fn test_alt_text_is_escaped() {
        let (_dir, embedder) = embedder_with("a.png", b"a").await;
        let out = embedder.embed("![a <b> \"c\"](a.png)").await;
        assert!(out.contains("alt=\"a &lt;b&gt; &quot;c&quot;\""));
    }

    #[test]
    fn test_mime_mapping() {
        assert_eq!(mime_for(std::path::Path::new("x.JPG")), "image/jpeg");
        assert_eq!(mime_for(std::path::Path::new("x.svg")), "image/svg+xml");
        assert_eq!(mime_for(std::path::Path::new("x.webp")), "image/webp");
        assert_eq!(mime_for(std::path::Path::new("noext")), "image/png");
    }
}
