//! End-to-end generation tests.

use std::path::Path;

use docsmith_core::Config;
use docsmith_generator::{GenerateError, GenerateOptions, Generator};
use docsmith_render::BrowserSession;
use tempfile::TempDir;

fn write_fixture_tree(root: &Path) {
    std::fs::write(
        root.join("00-intro.md"),
        "---\ntitle: Intro\n---\n\n# Introduction\n\nWelcome to the project.\n",
    )
    .unwrap();
    std::fs::write(
        root.join("01-body.md"),
        "# Body\n\n:::warning Careful\nMind the gap.\n:::\n\n\
         ```mermaid\ngraph TD;\n  A-->B;\n```\n",
    )
    .unwrap();
    std::fs::create_dir(root.join("guide")).unwrap();
    std::fs::write(
        root.join("guide").join("02-setup.md"),
        "# Setup\n\nInstall the thing.\n",
    )
    .unwrap();
}

fn fixture() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("docs");
    std::fs::create_dir(&input).unwrap();
    write_fixture_tree(&input);
    let config = Config::new(&input, dir.path().join("out"));
    (dir, config)
}

fn count_scratch_dirs() -> usize {
    std::fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with("docsmith-"))
                .count()
        })
        .unwrap_or(0)
}

#[tokio::test]
async fn test_html_generation_end_to_end() {
    let (dir, mut config) = fixture();
    config.html.footer_text = Some("Generated docs".to_string());
    let out = config.output_dir.clone();

    let generator = Generator::new(config).unwrap();
    let session = BrowserSession::new();
    let result = generator
        .generate(&GenerateOptions::default(), &session)
        .await
        .unwrap();

    assert_eq!(result.document_count, 3);
    assert_eq!(result.html_files.len(), 3);
    assert!(result.pdf_file.is_none());

    // Natural processing order.
    assert!(result.html_files[0].ends_with("00-intro.html"));
    assert!(result.html_files[1].ends_with("01-body.html"));
    assert!(result.html_files[2].ends_with("guide/02-setup.html"));

    let intro = std::fs::read_to_string(out.join("00-intro.html")).unwrap();
    assert!(intro.contains("<title>Intro</title>"));
    assert!(intro.contains("<article>"));
    assert!(intro.contains("breadcrumbs"));
    assert!(intro.contains("Generated docs"));

    let body = std::fs::read_to_string(out.join("01-body.html")).unwrap();
    assert!(body.contains("admonition warning"));
    assert!(body.contains("Careful"));
    assert!(body.contains("language-mermaid"));

    let index = std::fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("<a href=\"00-intro.html\">Intro</a>"));
    assert!(index.contains("<strong>guide</strong>"));
    assert!(index.contains("<a href=\"guide/02-setup.html\">Setup</a>"));

    // No browser was ever started for an HTML-only run.
    assert!(!session.is_active().await);
    drop(dir);
}

#[tokio::test]
async fn test_single_file_input_has_no_index() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("note.md");
    std::fs::write(&file, "# Note\n\nshort\n").unwrap();
    let out = dir.path().join("out");

    let generator = Generator::new(Config::new(&file, &out)).unwrap();
    let session = BrowserSession::new();
    let result = generator
        .generate(&GenerateOptions::default(), &session)
        .await
        .unwrap();

    assert_eq!(result.document_count, 1);
    assert!(out.join("note.html").exists());
    assert!(!out.join("index.html").exists());
}

#[tokio::test]
async fn test_unsupported_single_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("note.txt");
    std::fs::write(&file, "plain").unwrap();

    let generator = Generator::new(Config::new(&file, dir.path().join("out"))).unwrap();
    let session = BrowserSession::new();
    assert!(matches!(
        generator
            .generate(&GenerateOptions::default(), &session)
            .await,
        Err(GenerateError::UnsupportedInput { .. })
    ));
}

#[tokio::test]
async fn test_footer_omitted_when_unset() {
    let (dir, config) = fixture();
    let out = config.output_dir.clone();

    let generator = Generator::new(config).unwrap();
    let session = BrowserSession::new();
    generator
        .generate(&GenerateOptions::default(), &session)
        .await
        .unwrap();

    let intro = std::fs::read_to_string(out.join("00-intro.html")).unwrap();
    assert!(!intro.contains("<footer>"));
    drop(dir);
}

#[tokio::test]
async fn test_title_override_wins() {
    let (dir, config) = fixture();
    let out = config.output_dir.clone();

    let generator = Generator::new(config).unwrap();
    let session = BrowserSession::new();
    let options = GenerateOptions {
        title_override: Some("Forced".to_string()),
        ..GenerateOptions::default()
    };
    generator.generate(&options, &session).await.unwrap();

    let intro = std::fs::read_to_string(out.join("00-intro.html")).unwrap();
    assert!(intro.contains("<title>Forced</title>"));
    drop(dir);
}

#[tokio::test]
async fn test_article_text_roundtrip() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plain.md");
    std::fs::write(&file, "# Title\n\nFirst sentence here.\n\n- alpha\n- beta\n").unwrap();
    let out = dir.path().join("out");

    let generator = Generator::new(Config::new(&file, &out)).unwrap();
    let session = BrowserSession::new();
    generator
        .generate(&GenerateOptions::default(), &session)
        .await
        .unwrap();

    let html = std::fs::read_to_string(out.join("plain.html")).unwrap();
    let article_start = html.find("<article>").unwrap();
    let article_end = html.find("</article>").unwrap();
    let article = &html[article_start..article_end];
    let text: String = {
        let mut out = String::new();
        let mut in_tag = false;
        for c in article.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                c if !in_tag => out.push(c),
                _ => {}
            }
        }
        out
    };
    for expected in ["Title", "First sentence here.", "alpha", "beta"] {
        assert!(text.contains(expected), "missing {expected:?} in {text:?}");
    }
}

#[tokio::test]
async fn test_scratch_leaves_no_residue() {
    let (dir, mut config) = fixture();
    config.pdf.enabled = true;
    config.diagram.enabled = false;
    let out = config.output_dir.clone();

    let before = count_scratch_dirs();
    let generator = Generator::new(config).unwrap();
    let session = BrowserSession::new();
    let options = GenerateOptions {
        skip_html: true,
        ..GenerateOptions::default()
    };
    let result = generator.generate(&options, &session).await;

    // With no browser available the run fails at composition; either way the
    // staging directory must be gone and no HTML may leak into the output.
    assert_eq!(count_scratch_dirs(), before);
    assert!(!out.join("00-intro.html").exists());
    assert!(!session.is_active().await);
    if let Ok(result) = result {
        assert!(result.html_files.is_empty());
        let pdf = result.pdf_file.expect("pdf path");
        assert_eq!(pdf, out.join("document.pdf"));
    }
    drop(dir);
}

#[tokio::test]
#[ignore = "requires a Chromium installation"]
async fn test_full_pdf_generation() {
    let (dir, mut config) = fixture();
    config.pdf.enabled = true;
    config.pdf.toc_level = 2;
    config.pdf.cover_title = Some("Project Manual".to_string());
    let out = config.output_dir.clone();

    let generator = Generator::new(config).unwrap();
    let session = BrowserSession::new();
    let result = generator
        .generate(&GenerateOptions::default(), &session)
        .await
        .unwrap();

    assert!(out.join("00-intro.html").exists());
    assert!(out.join("01-body.html").exists());
    assert!(out.join("index.html").exists());
    assert!(!out.join("temp-combined.html").exists());

    let pdf = result.pdf_file.expect("pdf path");
    let bytes = std::fs::read(&pdf).unwrap();
    assert_eq!(&bytes[..4], b"%PDF");
    assert!(bytes.len() > 1024);

    // The run started the browser, so the run released it.
    assert!(!session.is_active().await);
    drop(dir);
}
