//! Small HTML text helpers shared by the render stages.

/// Remove all tags from an HTML fragment, keeping text content.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decode the entities the highlighter introduces.
///
/// `&amp;` is decoded first so doubly-escaped input (`&amp;lt;`) collapses
/// all the way back to the literal character.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>bold</b> text"), "bold text");
        assert_eq!(strip_tags("<span class=\"x\">a</span>b"), "ab");
        assert_eq!(strip_tags("no tags"), "no tags");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt; b &amp; c"), "a < b & c");
        assert_eq!(decode_entities("&quot;hi&quot;"), "\"hi\"");
    }

    #[test]
    fn test_decode_double_escape() {
        assert_eq!(decode_entities("&amp;lt;tag&amp;gt;"), "<tag>");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a & b>"), "&lt;a &amp; b&gt;");
    }
}
