//! Word import: DOCX to HTML, then HTML to Markdown
//!
//! A `.docx` file is a zip archive of XML parts. The paragraphs in
//! `word/document.xml` are turned into simple HTML (headings, paragraphs,
//! bold/italic runs, bullet items, line breaks, embedded images) which
//! [`html_to_markdown`] then normalizes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use zip::ZipArchive;

use super::image::mime_type_for;
use crate::error::{EditorError, Result};
use crate::model::WordFormat;
use crate::util::file_validation::{validate_file_for_opening, MAX_FILE_SIZE};

/// Output of a document conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converted {
    Html(String),
    /// Plain text when no markup could be produced
    Text(String),
}

/// Turns a Word document into HTML or text
pub trait DocumentConverter: Send + Sync {
    fn convert(&self, path: &Path, format: WordFormat) -> Result<Converted>;
}

/// Built-in converter for Office Open XML documents
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxConverter;

impl DocumentConverter for DocxConverter {
    fn convert(&self, path: &Path, format: WordFormat) -> Result<Converted> {
        match format {
            WordFormat::Docx => docx_to_html(path).map(Converted::Html),
            WordFormat::Doc => Err(EditorError::Conversion(format!(
                "{}: legacy .doc files are not supported, save as .docx first",
                path.display()
            ))),
        }
    }
}

/// Convert a Word document to Markdown.
///
/// HTML output is normalized with [`html_to_markdown`]; if that yields
/// nothing the raw HTML is kept so no content is lost.
pub fn word_to_markdown(converter: &dyn DocumentConverter, path: &Path, format: WordFormat) -> Result<String> {
    match converter.convert(path, format)? {
        Converted::Html(html) => {
            let markdown = html_to_markdown(&html);
            if markdown.is_empty() {
                tracing::warn!(path = %path.display(), "markdown normalization produced nothing, keeping HTML");
                Ok(html)
            } else {
                Ok(markdown)
            }
        }
        Converted::Text(text) => Ok(text),
    }
}

/// `report.docx` → `report.md`, next to the original
pub fn markdown_path_for(original: &Path) -> PathBuf {
    original.with_extension("md")
}

// =============================================================================
// DOCX parsing
// =============================================================================

fn docx_to_html(path: &Path) -> Result<String> {
    validate_file_for_opening(path).map_err(|e| EditorError::io(path, e.into_io()))?;
    let file = File::open(path).map_err(|e| EditorError::io(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| conversion_error(path, e))?;

    let mut entries = HashMap::<String, Vec<u8>>::new();
    for i in 0..archive.len() {
        let mut f = archive.by_index(i).map_err(|e| conversion_error(path, e))?;
        let name = f.name().to_string();
        if !name.starts_with("word/") {
            continue;
        }
        // Declared sizes are untrusted; read at most one byte past the limit
        let mut bytes = Vec::new();
        (&mut f)
            .take(MAX_FILE_SIZE + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| EditorError::io(path, e))?;
        if bytes.len() as u64 > MAX_FILE_SIZE {
            return Err(conversion_error(path, format!("{} is too large when unpacked", name)));
        }
        entries.insert(name, bytes);
    }

    let document_xml = entries
        .get("word/document.xml")
        .ok_or_else(|| conversion_error(path, "missing word/document.xml"))?;

    let styles = entries
        .get("word/styles.xml")
        .map(|xml| parse_style_names(xml))
        .unwrap_or_default();
    let rels = entries
        .get("word/_rels/document.xml.rels")
        .map(|xml| parse_relationships(xml))
        .unwrap_or_default();

    let html = HtmlWriter::new(&styles, &rels, &entries).write(document_xml);
    tracing::debug!(path = %path.display(), html_bytes = html.len(), "converted docx");
    Ok(html)
}

fn conversion_error(path: &Path, err: impl std::fmt::Display) -> EditorError {
    EditorError::Conversion(format!("{}: {}", path.display(), err))
}

/// styleId → lower-cased style name
fn parse_style_names(xml: &[u8]) -> HashMap<String, String> {
    let mut reader = Reader::from_reader(Cursor::new(xml));
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match local_name(e.local_name().as_ref()).as_str() {
                "style" => current_id = attr_value(&e, "styleId", reader.decoder()),
                "name" => {
                    if let (Some(id), Some(name)) = (&current_id, attr_value(&e, "val", reader.decoder())) {
                        names.insert(id.clone(), name.to_lowercase());
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if local_name(e.local_name().as_ref()) == "style" {
                    current_id = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    names
}

/// Relationship id → target part (relative to `word/`)
fn parse_relationships(xml: &[u8]) -> HashMap<String, String> {
    let mut reader = Reader::from_reader(Cursor::new(xml));
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                if local_name(e.local_name().as_ref()) == "Relationship" {
                    let id = attr_value(&e, "Id", reader.decoder()).unwrap_or_default();
                    let target = attr_value(&e, "Target", reader.decoder()).unwrap_or_default();
                    if !id.is_empty() && !target.is_empty() {
                        rels.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rels
}

#[derive(Debug, Default)]
struct ParagraphState {
    style_id: Option<String>,
    is_list_item: bool,
    html: String,
}

#[derive(Debug, Default)]
struct RunState {
    bold: bool,
    italic: bool,
    html: String,
}

struct HtmlWriter<'a> {
    styles: &'a HashMap<String, String>,
    rels: &'a HashMap<String, String>,
    parts: &'a HashMap<String, Vec<u8>>,
    out: String,
    paragraph: Option<ParagraphState>,
    run: Option<RunState>,
    in_text: bool,
    in_run_props: bool,
    in_paragraph_props: bool,
    list_open: bool,
}

impl<'a> HtmlWriter<'a> {
    fn new(
        styles: &'a HashMap<String, String>,
        rels: &'a HashMap<String, String>,
        parts: &'a HashMap<String, Vec<u8>>,
    ) -> Self {
        Self {
            styles,
            rels,
            parts,
            out: String::new(),
            paragraph: None,
            run: None,
            in_text: false,
            in_run_props: false,
            in_paragraph_props: false,
            list_open: false,
        }
    }

    fn write(mut self, xml: &[u8]) -> String {
        let mut reader = Reader::from_reader(Cursor::new(xml));
        reader.config_mut().trim_text(false);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => self.open(&e, reader.decoder(), false),
                Ok(Event::Empty(e)) => self.open(&e, reader.decoder(), true),
                Ok(Event::Text(t)) => {
                    if self.in_text {
                        if let Ok(text) = t.decode() {
                            self.push_text(&text);
                        }
                    }
                }
                Ok(Event::GeneralRef(r)) => {
                    if self.in_text {
                        if let Some(text) = r.decode().ok().and_then(|name| resolve_entity(&name)) {
                            self.push_text(&text);
                        }
                    }
                }
                Ok(Event::End(e)) => self.close(&local_name(e.local_name().as_ref())),
                Ok(Event::Eof) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "malformed document.xml, output truncated");
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        self.close_list();
        self.out
    }

    fn open(&mut self, e: &BytesStart<'_>, decoder: quick_xml::encoding::Decoder, is_empty: bool) {
        let name = local_name(e.local_name().as_ref());
        match name.as_str() {
            "p" if !is_empty => self.paragraph = Some(ParagraphState::default()),
            "pPr" if !is_empty => self.in_paragraph_props = true,
            "r" if !is_empty => self.run = Some(RunState::default()),
            "rPr" if !is_empty => self.in_run_props = true,
            "t" if !is_empty => self.in_text = true,
            "pStyle" if self.in_paragraph_props => {
                if let Some(p) = &mut self.paragraph {
                    p.style_id = attr_value(e, "val", decoder);
                }
            }
            "numPr" if self.in_paragraph_props => {
                if let Some(p) = &mut self.paragraph {
                    p.is_list_item = true;
                }
            }
            "b" if self.in_run_props => {
                let on = toggle_on(attr_value(e, "val", decoder));
                if let Some(r) = &mut self.run {
                    r.bold = on;
                }
            }
            "i" if self.in_run_props => {
                let on = toggle_on(attr_value(e, "val", decoder));
                if let Some(r) = &mut self.run {
                    r.italic = on;
                }
            }
            "br" | "cr" => self.push_html("<br>"),
            "tab" if !self.in_paragraph_props => self.push_html("\t"),
            "blip" => {
                if let Some(img) = attr_value(e, "embed", decoder).and_then(|id| self.image_tag(&id)) {
                    self.push_html(&img);
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "pPr" => self.in_paragraph_props = false,
            "rPr" => self.in_run_props = false,
            "t" => self.in_text = false,
            "r" => {
                if let Some(run) = self.run.take() {
                    let html = wrap_run(run);
                    if let Some(p) = &mut self.paragraph {
                        p.html.push_str(&html);
                    }
                }
            }
            "p" => {
                if let Some(p) = self.paragraph.take() {
                    self.finish_paragraph(p);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        self.push_html(&escape_html(text));
    }

    fn push_html(&mut self, html: &str) {
        if let Some(r) = &mut self.run {
            r.html.push_str(html);
        } else if let Some(p) = &mut self.paragraph {
            p.html.push_str(html);
        }
    }

    fn finish_paragraph(&mut self, p: ParagraphState) {
        let content = p.html.trim();
        if content.is_empty() {
            return;
        }

        if p.is_list_item {
            if !self.list_open {
                self.out.push_str("<ul>");
                self.list_open = true;
            }
            self.out.push_str(&format!("<li>{}</li>", content));
            return;
        }

        self.close_list();
        match p.style_id.as_deref().and_then(|id| self.heading_level(id)) {
            Some(level) => self.out.push_str(&format!("<h{0}>{1}</h{0}>", level, content)),
            None => self.out.push_str(&format!("<p>{}</p>", content)),
        }
    }

    fn close_list(&mut self) {
        if self.list_open {
            self.out.push_str("</ul>");
            self.list_open = false;
        }
    }

    /// Heading level from a style id or its display name
    fn heading_level(&self, style_id: &str) -> Option<u8> {
        let id = style_id.to_ascii_lowercase();
        let name = self.styles.get(style_id).cloned().unwrap_or_default();
        let level = [id.as_str(), name.as_str()].into_iter().find_map(|candidate| {
            match candidate {
                "title" => return Some(1),
                "subtitle" => return Some(2),
                _ => {}
            }
            candidate
                .strip_prefix("heading")
                .map(str::trim)
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|v| (1..=6).contains(v))
        });
        level
    }

    fn image_tag(&self, rel_id: &str) -> Option<String> {
        let target = self.rels.get(rel_id)?;
        let part = format!("word/{}", target.trim_start_matches('/').trim_start_matches("word/"));
        let bytes = self.parts.get(&part)?;
        let mime = mime_type_for(Path::new(target))?;
        Some(format!(
            "<img src=\"data:{};base64,{}\" alt=\"\">",
            mime,
            STANDARD.encode(bytes)
        ))
    }
}

fn wrap_run(run: RunState) -> String {
    let mut html = run.html;
    if html.trim().is_empty() {
        return html;
    }
    if run.italic {
        html = format!("<em>{}</em>", html);
    }
    if run.bold {
        html = format!("<strong>{}</strong>", html);
    }
    html
}

/// `<w:b/>` is on; `w:val="0"` or `"false"` turns it off
fn toggle_on(val: Option<String>) -> bool {
    !matches!(val.as_deref(), Some("0" | "false" | "off"))
}

fn local_name(bytes: &[u8]) -> String {
    let full = std::str::from_utf8(bytes).unwrap_or_default();
    full.rsplit(':').next().unwrap_or(full).to_string()
}

fn attr_value(event: &BytesStart<'_>, key_suffix: &str, decoder: quick_xml::encoding::Decoder) -> Option<String> {
    event.attributes().flatten().find_map(|a| {
        let key = std::str::from_utf8(a.key.as_ref()).ok()?;
        if key.rsplit(':').next() == Some(key_suffix) {
            a.decode_and_unescape_value(decoder).ok().map(|v| v.to_string())
        } else {
            None
        }
    })
}

/// Resolve an XML entity reference name (`amp`, `#38`, `#x26`)
fn resolve_entity(name: &str) -> Option<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)?
        }
    };
    Some(resolved.to_string())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

// =============================================================================
// HTML → Markdown
// =============================================================================

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn compile_rules(table: &[(&str, &'static str)]) -> Vec<Rule> {
    table
        .iter()
        .filter_map(|&(pattern, replacement)| match Regex::new(pattern) {
            Ok(pattern) => Some(Rule { pattern, replacement }),
            Err(e) => {
                tracing::error!(error = %e, "invalid html rule");
                None
            }
        })
        .collect()
}

/// Tag rewrites, applied in order
fn tag_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile_rules(&[
            (r"(?is)<h1(?:\s[^>]*)?>(.*?)</h1>", "# $1\n\n"),
            (r"(?is)<h2(?:\s[^>]*)?>(.*?)</h2>", "## $1\n\n"),
            (r"(?is)<h3(?:\s[^>]*)?>(.*?)</h3>", "### $1\n\n"),
            (r"(?is)<h4(?:\s[^>]*)?>(.*?)</h4>", "#### $1\n\n"),
            (r"(?is)<h5(?:\s[^>]*)?>(.*?)</h5>", "##### $1\n\n"),
            (r"(?is)<h6(?:\s[^>]*)?>(.*?)</h6>", "###### $1\n\n"),
            (r"(?is)<p(?:\s[^>]*)?>(.*?)</p>", "$1\n\n"),
            (r"(?i)<br\s*/?>", "\n"),
            (r"(?is)<strong(?:\s[^>]*)?>(.*?)</strong>", "**$1**"),
            (r"(?is)<b(?:\s[^>]*)?>(.*?)</b>", "**$1**"),
            (r"(?is)<em(?:\s[^>]*)?>(.*?)</em>", "*$1*"),
            (r"(?is)<i(?:\s[^>]*)?>(.*?)</i>", "*$1*"),
            (r"(?i)<ul(?:\s[^>]*)?>", ""),
            (r"(?i)</ul>", "\n"),
            (r"(?i)<ol(?:\s[^>]*)?>", ""),
            (r"(?i)</ol>", "\n"),
            (r"(?is)<li(?:\s[^>]*)?>(.*?)</li>", "- $1\n"),
            (r#"(?is)<a\s[^>]*href=["']([^"']*)["'][^>]*>(.*?)</a>"#, "[$2]($1)"),
            (r#"(?i)<img\s[^>]*src=["']([^"']*)["'][^>]*alt=["']([^"']*)["'][^>]*>"#, "![$2]($1)"),
            (r#"(?i)<img\s[^>]*alt=["']([^"']*)["'][^>]*src=["']([^"']*)["'][^>]*>"#, "![$1]($2)"),
            (r#"(?i)<img\s[^>]*src=["']([^"']*)["'][^>]*>"#, "![]($1)"),
            (r"<[^>]*>", ""),
        ])
    })
}

/// Whitespace cleanup after entities are decoded
fn blank_line_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| compile_rules(&[(r"\n\s*\n\s*\n", "\n\n")]))
}

fn apply_rules(text: String, rules: &[Rule]) -> String {
    rules.iter().fold(text, |text, rule| {
        rule.pattern.replace_all(&text, rule.replacement).into_owned()
    })
}

/// Normalize HTML into Markdown.
///
/// Headings, paragraphs, emphasis, lists, links and images are rewritten, all
/// other tags are dropped, common entities are decoded, and runs of blank
/// lines are collapsed.
pub fn html_to_markdown(html: &str) -> String {
    let markdown = apply_rules(html.to_string(), tag_rules());
    let markdown = decode_entities(&markdown);
    apply_rules(markdown, blank_line_rules()).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
