//! Markdown rendering using pulldown-cmark.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::{
    admonition::{self, Segment},
    syntax::{escape_html, SyntaxHighlighter},
};

/// Markdown to HTML fragment renderer with syntax highlighting and
/// admonition containers.
#[derive(Debug)]
pub struct MarkdownRenderer {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a renderer with default options.
    #[must_use]
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter: SyntaxHighlighter::new(),
            options,
        }
    }

    /// Render a Markdown body to an HTML fragment.
    pub fn render(&self, body: &str) -> String {
        let mut html = String::new();

        for segment in admonition::split(body) {
            match segment {
                Segment::Text(text) => html.push_str(&self.render_markdown(&text)),
                Segment::Admonition { kind, title, body } => {
                    html.push_str(&format!(
                        "<div class=\"admonition {kind}\">\n<p class=\"admonition-title\">{}</p>\n",
                        escape_html(&title)
                    ));
                    // Container bodies are Markdown themselves.
                    html.push_str(&self.render(&body));
                    html.push_str("</div>\n");
                }
            }
        }

        html
    }

    /// Render plain Markdown (no container handling) to HTML.
    fn render_markdown(&self, content: &str) -> String {
        let parser = Parser::new_ext(content, self.options);
        let mut html = String::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.to_string();
                            if lang.is_empty() { None } else { Some(lang) }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }

                Event::End(TagEnd::CodeBlock) => {
                    html.push_str(&self.render_code_block(
                        &code_block_content,
                        code_block_lang.as_deref(),
                    ));
                    in_code_block = false;
                    code_block_lang = None;
                    code_block_content.clear();
                }

                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }

                Event::Text(text) => {
                    html.push_str(&escape_html(&text));
                }

                Event::Code(code) => {
                    html.push_str(&format!("<code>{}</code>", escape_html(&code)));
                }

                Event::SoftBreak => {
                    html.push('\n');
                }

                Event::HardBreak => {
                    html.push_str("<br />\n");
                }

                Event::Start(tag) => {
                    html.push_str(&tag_to_html_start(&tag));
                }

                Event::End(tag) => {
                    html.push_str(&tag_to_html_end(&tag));
                }

                Event::Html(raw) | Event::InlineHtml(raw) => {
                    html.push_str(&raw);
                }

                Event::FootnoteReference(name) => {
                    html.push_str(&format!(
                        "<sup class=\"footnote-ref\"><a href=\"#fn-{name}\">[{name}]</a></sup>"
                    ));
                }

                Event::Rule => {
                    html.push_str("<hr />\n");
                }

                Event::TaskListMarker(checked) => {
                    let checkbox = if checked {
                        "<input type=\"checkbox\" checked disabled />"
                    } else {
                        "<input type=\"checkbox\" disabled />"
                    };
                    html.push_str(checkbox);
                }

                Event::InlineMath(math) => {
                    html.push_str(&format!("<span class=\"math inline\">\\({math}\\)</span>"));
                }

                Event::DisplayMath(math) => {
                    html.push_str(&format!("<div class=\"math display\">\\[{math}\\]</div>"));
                }
            }
        }

        html
    }

    /// Render one fenced or indented code block.
    ///
    /// The language tag is preserved as a `language-*` class so the diagram
    /// replacer can find tagged fences in assembled HTML later.
    fn render_code_block(&self, code: &str, lang: Option<&str>) -> String {
        let highlighted = self.highlighter.highlight(code, lang);
        let class_attr = lang
            .map(|l| format!(" class=\"language-{l}\""))
            .unwrap_or_default();
        format!("<pre><code{class_attr}>{highlighted}</code></pre>\n")
    }
}

/// Convert a pulldown-cmark tag to an HTML opening tag.
fn tag_to_html_start(tag: &Tag) -> String {
    match tag {
        Tag::Paragraph => "<p>".to_string(),
        Tag::Heading { level, id, .. } => {
            let id_attr = id
                .as_ref()
                .map(|i| format!(" id=\"{i}\""))
                .unwrap_or_default();
            format!("<h{}{id_attr}>", *level as u8)
        }
        Tag::BlockQuote(_) => "<blockquote>".to_string(),
        Tag::CodeBlock(_) => String::new(), // Handled separately
        Tag::List(Some(start)) => format!("<ol start=\"{start}\">"),
        Tag::List(None) => "<ul>".to_string(),
        Tag::Item => "<li>".to_string(),
        Tag::FootnoteDefinition(name) => {
            format!("<div class=\"footnote\" id=\"fn-{name}\">")
        }
        Tag::Table(_) => "<table>".to_string(),
        Tag::TableHead => "<thead><tr>".to_string(),
        Tag::TableRow => "<tr>".to_string(),
        Tag::TableCell => "<td>".to_string(),
        Tag::Emphasis => "<em>".to_string(),
        Tag::Strong => "<strong>".to_string(),
        Tag::Strikethrough => "<del>".to_string(),
        Tag::Link {
            dest_url, title, ..
        } => {
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", escape_html(title))
            };
            format!("<a href=\"{}\"{}>", escape_html(dest_url), title_attr)
        }
        Tag::Image {
            dest_url, title, ..
        } => {
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", escape_html(title))
            };
            format!("<img src=\"{}\"{} alt=\"", escape_html(dest_url), title_attr)
        }
        Tag::HtmlBlock => String::new(),
        Tag::MetadataBlock(_) => String::new(),
        Tag::DefinitionList => "<dl>".to_string(),
        Tag::DefinitionListTitle => "<dt>".to_string(),
        Tag::DefinitionListDefinition => "<dd>".to_string(),
        Tag::Superscript => "<sup>".to_string(),
        Tag::Subscript => "<sub>".to_string(),
    }
}

/// Convert a pulldown-cmark tag end to an HTML closing tag.
fn tag_to_html_end(tag: &TagEnd) -> String {
    match tag {
        TagEnd::Paragraph => "</p>\n".to_string(),
        TagEnd::Heading(level) => format!("</h{}>\n", *level as u8),
        TagEnd::BlockQuote(_) => "</blockquote>\n".to_string(),
        TagEnd::CodeBlock => String::new(), // Handled separately
        TagEnd::List(ordered) => {
            if *ordered {
                "</ol>\n".to_string()
            } else {
                "</ul>\n".to_string()
            }
        }
        TagEnd::Item => "</li>\n".to_string(),
        TagEnd::FootnoteDefinition => "</div>\n".to_string(),
        TagEnd::Table => "</table>\n".to_string(),
        TagEnd::TableHead => "</tr></thead>\n".to_string(),
        TagEnd::TableRow => "</tr>\n".to_string(),
        TagEnd::TableCell => "</td>".to_string(),
        TagEnd::Emphasis => "</em>".to_string(),
        TagEnd::Strong => "</strong>".to_string(),
        TagEnd::Strikethrough => "</del>".to_string(),
        TagEnd::Link => "</a>".to_string(),
        TagEnd::Image => "\" />".to_string(),
        TagEnd::HtmlBlock => String::new(),
        TagEnd::MetadataBlock(_) => String::new(),
        TagEnd::DefinitionList => "</dl>\n".to_string(),
        TagEnd::DefinitionListTitle => "</dt>\n".to_string(),
        TagEnd::DefinitionListDefinition => "</dd>\n".to_string(),
        TagEnd::Superscript => "</sup>".to_string(),
        TagEnd::Subscript => "</sub>".to_string(),
    }
}
