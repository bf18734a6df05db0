//! Markdown to HTML renderer using pulldown-cmark

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::outline::{heading_anchor, parse_heading};

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render Markdown to an HTML fragment.
///
/// ATX headings get an `id` matching the outline anchor, and block elements
/// are preceded by a `data-line` marker (zero-based source line) so the
/// outline and scroll position can address the preview.
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let events = annotate_blocks(parser, markdown);

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, events);
    html_output
}

/// Render Markdown to a complete, self-contained HTML document
pub fn markdown_to_html(markdown: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
    <div id="content">{}</div>
</body>
</html>"#,
        escape_text(title),
        PREVIEW_CSS,
        render_markdown(markdown)
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const PREVIEW_CSS: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    font-size: 14px;
    line-height: 1.6;
    padding: 20px;
    max-width: 800px;
    margin: 0 auto;
}
h1, h2 { border-bottom: 1px solid #d0d7de; padding-bottom: 0.3em; }
code { padding: 0.2em 0.4em; background: #f6f8fa; border-radius: 4px; }
pre { padding: 16px; overflow: auto; background: #f6f8fa; border-radius: 6px; }
pre code { padding: 0; background: none; }
blockquote { margin: 0; padding: 0 1em; color: #656d76; border-left: 0.25em solid #d0d7de; }
table { border-collapse: collapse; }
th, td { padding: 6px 13px; border: 1px solid #d0d7de; }
img { max-width: 100%; }
[data-line] { scroll-margin-top: 20px; }
"#;

/// Attach heading ids and insert `data-line` markers before block elements
fn annotate_blocks<'a>(parser: Parser<'a>, markdown: &'a str) -> impl Iterator<Item = Event<'a>> {
    let mut current_line = 0;
    let mut last_offset = 0;

    parser.into_offset_iter().flat_map(move |(event, range)| {
        // Guard against non-monotonic offsets
        if range.start >= last_offset {
            current_line += markdown[last_offset..range.start]
                .bytes()
                .filter(|b| *b == b'\n')
                .count();
            last_offset = range.start;
        }

        let marker = || Event::Html(format!("<span data-line=\"{}\"></span>\n", current_line).into());

        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let id = id.or_else(|| {
                    let first_line = markdown[range].lines().next().unwrap_or_default();
                    parse_heading(first_line).map(|(_, text)| CowStr::from(heading_anchor(text)))
                });
                vec![
                    marker(),
                    Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    }),
                ]
            }
            Event::Start(Tag::Paragraph | Tag::BlockQuote(_) | Tag::CodeBlock(_) | Tag::List(_)) => {
                vec![marker(), event]
            }
            _ => vec![event],
        }
    })
}
