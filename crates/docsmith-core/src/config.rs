//! Generation configuration.
//!
//! The pipeline consumes a fully typed, immutable [`Config`] value. Loading and
//! merging configuration files is a caller concern.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Input root: a Markdown file or a directory tree of Markdown files.
    pub input_dir: PathBuf,

    /// Output root for HTML pages and the combined PDF.
    pub output_dir: PathBuf,

    /// Trusted image root for base64 embedding.
    #[serde(default)]
    pub images_dir: Option<PathBuf>,

    /// HTML output settings.
    #[serde(default)]
    pub html: HtmlConfig,

    /// PDF output settings.
    #[serde(default)]
    pub pdf: PdfConfig,

    /// Diagram rendering settings.
    #[serde(default)]
    pub diagram: DiagramConfig,

    /// Image embedding settings.
    #[serde(default)]
    pub images: ImageConfig,
}

/// HTML output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlConfig {
    /// Custom page template file. Must preserve the `<article>` wrapper.
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Whether to render a breadcrumb trail on each page.
    #[serde(default = "default_true")]
    pub breadcrumbs: bool,

    /// Footer text. `None` omits the footer block entirely; an empty string
    /// emits an empty footer block.
    #[serde(default)]
    pub footer_text: Option<String>,
}

/// PDF output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Whether the combined PDF is generated at all.
    #[serde(default)]
    pub enabled: bool,

    /// Paper size.
    #[serde(default)]
    pub format: PaperFormat,

    /// Whether to prepend a table of contents.
    #[serde(default = "default_true")]
    pub include_toc: bool,

    /// Maximum heading level included in the TOC (1-6).
    #[serde(default = "default_toc_level")]
    pub toc_level: u8,

    /// Whether to prepend a cover page.
    #[serde(default = "default_true")]
    pub include_cover: bool,

    /// Cover title, also used as the document `<title>`.
    #[serde(default)]
    pub cover_title: Option<String>,

    /// Cover subtitle.
    #[serde(default)]
    pub cover_subtitle: Option<String>,

    /// Body font family name.
    #[serde(default = "default_font")]
    pub font: String,
}

/// Paper sizes supported by the print step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperFormat {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
}

impl PaperFormat {
    /// Paper dimensions in inches, `(width, height)`.
    #[must_use]
    pub fn dimensions_inches(self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.69),
            Self::A3 => (11.69, 16.54),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
        }
    }

    /// The CSS `@page size` keyword for this format.
    #[must_use]
    pub fn css_keyword(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
        }
    }
}

/// Diagram rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Whether diagram fences are rendered to SVG in the PDF.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Diagram library theme.
    #[serde(default)]
    pub theme: DiagramTheme,
}

/// Themes understood by the diagram library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramTheme {
    #[default]
    Default,
    Dark,
    Forest,
    Neutral,
}

impl DiagramTheme {
    /// The theme name passed to the diagram library.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
            Self::Forest => "forest",
            Self::Neutral => "neutral",
        }
    }
}

/// Image embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Whether images are inlined as base64 data URIs in the PDF.
    #[serde(default = "default_true")]
    pub embed: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            template: None,
            breadcrumbs: true,
            footer_text: None,
        }
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: PaperFormat::A4,
            include_toc: true,
            toc_level: default_toc_level(),
            include_cover: true,
            cover_title: None,
            cover_subtitle: None,
            font: default_font(),
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: DiagramTheme::Default,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { embed: true }
    }
}

impl Config {
    /// Create a configuration with defaults for the given roots.
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            images_dir: None,
            html: HtmlConfig::default(),
            pdf: PdfConfig::default(),
            diagram: DiagramConfig::default(),
            images: ImageConfig::default(),
        }
    }

    /// Validate invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(1..=6).contains(&self.pdf.toc_level) {
            return Err(CoreError::config(format!(
                "pdf.toc_level must be between 1 and 6, got {}",
                self.pdf.toc_level
            )));
        }
        if self.input_dir.as_os_str().is_empty() {
            return Err(CoreError::config("input_dir must not be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(CoreError::config("output_dir must not be empty"));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_toc_level() -> u8 {
    3
}

fn default_font() -> String {
    "Noto Sans".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("docs", "out");
        assert!(config.html.breadcrumbs);
        assert!(config.html.footer_text.is_none());
        assert!(!config.pdf.enabled);
        assert_eq!(config.pdf.format, PaperFormat::A4);
        assert_eq!(config.pdf.toc_level, 3);
        assert!(config.diagram.enabled);
        assert_eq!(config.diagram.theme, DiagramTheme::Default);
        assert!(config.images.embed);
    }

    #[test]
    fn test_validate_toc_level() {
        let mut config = Config::new("docs", "out");
        config.pdf.toc_level = 0;
        assert!(config.validate().is_err());

        config.pdf.toc_level = 7;
        assert!(config.validate().is_err());

        config.pdf.toc_level = 6;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_roots() {
        let config = Config::new("", "out");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_paper_format_dimensions() {
        let (w, h) = PaperFormat::A4.dimensions_inches();
        assert!(w < h);
        assert_eq!(PaperFormat::Letter.dimensions_inches(), (8.5, 11.0));
        assert_eq!(PaperFormat::Legal.css_keyword(), "Legal");
    }

    #[test]
    fn test_diagram_theme_names() {
        assert_eq!(DiagramTheme::Default.as_str(), "default");
        assert_eq!(DiagramTheme::Forest.as_str(), "forest");
    }

    #[test]
    fn test_deserialize_partial() {
        let yaml = r#"
input_dir: ./docs
output_dir: ./out
pdf:
  enabled: true
  format: A3
diagram:
  theme: dark
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.pdf.enabled);
        assert_eq!(config.pdf.format, PaperFormat::A3);
        assert_eq!(config.diagram.theme, DiagramTheme::Dark);
        // Untouched sections keep defaults.
        assert!(config.html.breadcrumbs);
        assert_eq!(config.pdf.toc_level, 3);
    }
}
