//! Index page generation.
//!
//! Directory input gets a top-level `index.html` with a recursive tree view
//! of the generated pages. Titles come from frontmatter when present, else
//! the file stem.

use std::path::Path;

use docsmith_core::IndexEntry;

use crate::{
    discover::natural_cmp,
    template::{Template, TemplateContext},
};

/// Build the index tree from `(relative_path, title)` pairs.
///
/// Input order is preserved for files; directories sort naturally among
/// their siblings.
#[must_use]
pub fn build_tree(pages: &[(std::path::PathBuf, String)]) -> Vec<IndexEntry> {
    build_level(pages, Path::new(""))
}

fn build_level(pages: &[(std::path::PathBuf, String)], prefix: &Path) -> Vec<IndexEntry> {
    let mut files = Vec::new();
    let mut dirs: Vec<String> = Vec::new();

    for (relative, title) in pages {
        let Ok(rest) = relative.strip_prefix(prefix) else {
            continue;
        };
        let mut parts = rest.iter();
        let Some(first) = parts.next() else {
            continue;
        };
        let name = first.to_string_lossy().into_owned();
        if parts.next().is_some() {
            if !dirs.contains(&name) {
                dirs.push(name);
            }
        } else {
            let href = relative.with_extension("html");
            files.push(IndexEntry {
                name: name.clone(),
                path: href.to_string_lossy().replace('\\', "/"),
                title: title.clone(),
                is_directory: false,
                children: Vec::new(),
            });
        }
    }

    dirs.sort_by(|a, b| natural_cmp(a, b));
    let mut entries: Vec<IndexEntry> = dirs
        .into_iter()
        .map(|name| {
            let child_prefix = prefix.join(&name);
            IndexEntry {
                name: name.clone(),
                path: format!(
                    "{}/index.html",
                    child_prefix.to_string_lossy().replace('\\', "/")
                ),
                title: name,
                is_directory: true,
                children: build_level(pages, &child_prefix),
            }
        })
        .collect();

    entries.extend(files);
    entries
}

/// Render the tree as a nested list.
#[must_use]
pub fn tree_html(entries: &[IndexEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"index-tree\">\n");
    for entry in entries {
        if entry.is_directory {
            out.push_str(&format!(
                "<li class=\"dir\"><strong>{}</strong>\n{}</li>\n",
                escape_html(&entry.name),
                tree_html(&entry.children)
            ));
        } else {
            out.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                entry.path,
                escape_html(&entry.title)
            ));
        }
    }
    out.push_str("</ul>\n");
    out
}

/// Render the complete index page through the page template.
pub fn index_page(
    template: &Template,
    entries: &[IndexEntry],
    footer: Option<&str>,
) -> crate::template::Result<String> {
    let content = format!("<h1>Documentation</h1>\n{}", tree_html(entries));
    let mut ctx = TemplateContext::new()
        .with_var("TITLE", "Documentation")
        .with_var("CONTENT", content);
    if let Some(footer) = crate::template::footer_html(footer) {
        ctx.insert("FOOTER", footer);
    }
    template.render(&ctx)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn pages() -> Vec<(PathBuf, String)> {
        vec![
            (PathBuf::from("00-intro.md"), "Intro".to_string()),
            (PathBuf::from("guide/01-setup.md"), "Setup".to_string()),
            (PathBuf::from("guide/02-usage.md"), "Usage".to_string()),
            (PathBuf::from("99-appendix.md"), "Appendix".to_string()),
        ]
    }

    #[test]
    fn test_tree_structure() {
        let tree = build_tree(&pages());
        assert_eq!(tree.len(), 3);
        assert!(tree[0].is_directory);
        assert_eq!(tree[0].name, "guide");
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].title, "Setup");
        assert_eq!(tree[1].title, "Intro");
        assert_eq!(tree[2].title, "Appendix");
    }

    #[test]
    fn test_file_links_swap_extension() {
        let tree = build_tree(&pages());
        assert_eq!(tree[1].path, "00-intro.html");
        assert_eq!(tree[0].children[1].path, "guide/02-usage.html");
    }

    #[test]
    fn test_tree_html_nesting() {
        let html = tree_html(&build_tree(&pages()));
        assert!(html.contains("<strong>guide</strong>"));
        assert!(html.contains("<a href=\"guide/01-setup.html\">Setup</a>"));
        assert!(html.contains("<a href=\"00-intro.html\">Intro</a>"));
    }

    #[test]
    fn test_index_page_renders_article() {
        let html = index_page(&Template::builtin(), &build_tree(&pages()), None).unwrap();
        assert!(html.contains("<article>"));
        assert!(html.contains("<h1>Documentation</h1>"));
        assert!(html.contains("index-tree"));
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(tree_html(&[]), "");
    }
}
