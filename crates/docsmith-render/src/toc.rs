//! Heading indexing and table-of-contents generation.
//!
//! One pass over the combined HTML both collects the headings and rewrites
//! their opening tags with synthetic `heading-<n>` anchors, so the anchors the
//! TOC links to are by construction the anchors present in the document.

use std::sync::LazyLock;

use docsmith_core::{
    rewrite::{apply_edits, Edit},
    Heading,
};
use regex::Regex;

use crate::text::{decode_entities, escape_html, strip_tags};

/// Section titles that never appear in the TOC, case-insensitively.
pub const RESERVED_TITLES: &[&str] = &["Table of Contents", "Contents"];

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>").expect("heading regex")
});

/// Index all headings up to `max_level`, rewriting their anchors in place.
///
/// Returns the rewritten HTML and the collected headings in document order.
/// Running the result through this function again yields the same output,
/// since existing `id` attributes are part of the opening tag being replaced.
#[must_use]
pub fn index_headings(html: &str, max_level: u8) -> (String, Vec<Heading>) {
    let mut headings = Vec::new();
    let mut edits = Vec::new();

    for caps in HEADING_RE.captures_iter(html) {
        let (Some(whole), Some(level_m), Some(inner_m)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let level: u8 = match level_m.as_str().parse() {
            Ok(level) => level,
            Err(_) => continue,
        };
        if level > max_level {
            continue;
        }

        let inner = inner_m.as_str();
        let text = decode_entities(&strip_tags(inner)).trim().to_string();
        if text.is_empty() || is_reserved(&text) {
            continue;
        }

        let id = format!("heading-{}", headings.len());
        edits.push(Edit::new(
            whole.range(),
            format!("<h{level} id=\"{id}\">{inner}</h{level}>"),
        ));
        headings.push(Heading { level, text, id });
    }

    (apply_edits(html, edits), headings)
}

fn is_reserved(text: &str) -> bool {
    RESERVED_TITLES
        .iter()
        .any(|title| title.eq_ignore_ascii_case(text))
}

/// Render the TOC block for an already-indexed document.
///
/// Empty input produces an empty string rather than an empty list.
#[must_use]
pub fn toc_html(headings: &[Heading], title: &str) -> String {
    if headings.is_empty() {
        return String::new();
    }

    let mut out = String::from("<div class=\"table-of-contents\">\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    out.push_str("<ul>\n");
    for heading in headings {
        out.push_str(&format!(
            "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
            heading.level,
            heading.id,
            escape_html(&heading.text)
        ));
    }
    out.push_str("</ul>\n</div>\n<div class=\"page-break\"></div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_and_anchors_headings() {
        let html = "<h1>Intro</h1>\n<p>x</p>\n<h2 class=\"old\">Setup</h2>\n<h3>Deep</h3>";
        let (out, headings) = index_headings(html, 3);
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].id, "heading-0");
        assert_eq!(headings[1].text, "Setup");
        assert_eq!(headings[1].level, 2);
        assert!(out.contains("<h1 id=\"heading-0\">Intro</h1>"));
        assert!(out.contains("<h2 id=\"heading-1\">Setup</h2>"));
        assert!(!out.contains("class=\"old\""));
    }

    #[test]
    fn test_respects_max_level() {
        let html = "<h1>A</h1><h4>B</h4>";
        let (out, headings) = index_headings(html, 3);
        assert_eq!(headings.len(), 1);
        assert!(out.contains("<h4>B</h4>"));
    }

    #[test]
    fn test_skips_empty_and_reserved() {
        let html = "<h2>   </h2><h1>Table of Contents</h1><h1>contents</h1><h1>Real</h1>";
        let (_, headings) = index_headings(html, 6);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real");
    }

    #[test]
    fn test_text_is_stripped_and_decoded() {
        let html = "<h2>Using <code>&amp;&amp;</code> chains</h2>";
        let (_, headings) = index_headings(html, 6);
        assert_eq!(headings[0].text, "Using && chains");
    }

    #[test]
    fn test_indexing_is_idempotent() {
        let html = "<h1 id=\"stale-9\">One</h1><h2>Two</h2>";
        let (first, _) = index_headings(html, 6);
        let (second, headings) = index_headings(&first, 6);
        assert_eq!(first, second);
        assert_eq!(headings[0].id, "heading-0");
        assert_eq!(headings[1].id, "heading-1");
    }

    #[test]
    fn test_toc_links_match_anchors() {
        let html = "<h1>A</h1><h2>B &amp; C</h2>";
        let (indexed, headings) = index_headings(html, 6);
        let toc = toc_html(&headings, "Table of Contents");
        for heading in &headings {
            assert!(toc.contains(&format!("href=\"#{}\"", heading.id)));
            assert!(indexed.contains(&format!("id=\"{}\"", heading.id)));
        }
        assert!(toc.contains("B &amp; C"));
        assert!(toc.contains("toc-level-2"));
        assert!(toc.contains("page-break"));
    }

    #[test]
    fn test_empty_toc_is_empty_string() {
        assert_eq!(toc_html(&[], "Table of Contents"), "");
    }
}
