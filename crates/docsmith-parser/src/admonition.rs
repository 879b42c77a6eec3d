//! Admonition containers.
//!
//! A block delimited by `:::<kind> [title]` and a closing `:::` line renders
//! as a titled, class-tagged callout. Six kinds are recognized; anything else
//! is left for the Markdown renderer to treat as plain text.

/// Recognized admonition kinds.
pub const KINDS: [&str; 6] = ["warning", "info", "tip", "danger", "note", "success"];

/// A block-level segment of a Markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain Markdown text.
    Text(String),

    /// An admonition container.
    Admonition {
        kind: String,
        title: String,
        body: String,
    },
}

/// Default title for a kind: the capitalized kind name.
#[must_use]
pub fn default_title(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse the opening line of a container, returning `(kind, title)`.
fn parse_opening(line: &str) -> Option<(String, String)> {
    let rest = line.trim_start().strip_prefix(":::")?;
    let rest = rest.trim();
    let (kind, title) = match rest.split_once(char::is_whitespace) {
        Some((kind, title)) => (kind, title.trim()),
        None => (rest, ""),
    };
    if !KINDS.contains(&kind) {
        return None;
    }
    let title = if title.is_empty() {
        default_title(kind)
    } else {
        title.to_string()
    };
    Some((kind.to_string(), title))
}

/// Detect a code-fence delimiter line, returning `(fence_char, length)`.
fn fence_delimiter(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();
    let fence_char = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let length = trimmed.chars().take_while(|c| *c == fence_char).count();
    (length >= 3).then_some((fence_char, length))
}

/// Split a Markdown body into text and admonition segments.
///
/// An unclosed container runs to the end of the input. Unknown kinds stay in
/// the surrounding text segment untouched. Fenced code blocks pass through
/// as text, so container syntax inside a fence is never interpreted.
#[must_use]
pub fn split(body: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut lines = body.lines();
    let mut open_fence: Option<(char, usize)> = None;

    while let Some(line) = lines.next() {
        if let Some((fence_char, length)) = open_fence {
            text.push_str(line);
            text.push('\n');
            if matches!(fence_delimiter(line), Some((c, l)) if c == fence_char && l >= length) {
                open_fence = None;
            }
            continue;
        }
        if let Some(delimiter) = fence_delimiter(line) {
            open_fence = Some(delimiter);
            text.push_str(line);
            text.push('\n');
            continue;
        }

        let Some((kind, title)) = parse_opening(line) else {
            text.push_str(line);
            text.push('\n');
            continue;
        };

        if !text.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text)));
        }

        let mut inner = String::new();
        let mut inner_fence: Option<(char, usize)> = None;
        for inner_line in lines.by_ref() {
            match inner_fence {
                Some((fence_char, length)) => {
                    if matches!(fence_delimiter(inner_line), Some((c, l)) if c == fence_char && l >= length)
                    {
                        inner_fence = None;
                    }
                }
                None => {
                    if inner_line.trim() == ":::" {
                        break;
                    }
                    inner_fence = fence_delimiter(inner_line);
                }
            }
            inner.push_str(inner_line);
            inner.push('\n');
        }

        segments.push(Segment::Admonition {
            kind,
            title,
            body: inner,
        });
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    segments
}
