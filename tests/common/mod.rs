//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use marknote::config::EditorConfig;
use marknote::messages::{EditMsg, FileMsg, LoadedContent, Msg};
use marknote::model::{AppModel, EditHistory, Position, TabId};
use marknote::update::update;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Config used by tests: no file watching, short outline debounce
pub fn test_config() -> EditorConfig {
    EditorConfig {
        watch_files: false,
        outline_debounce_ms: 20,
        ..EditorConfig::default()
    }
}

/// Create a test model whose single blank tab holds `text`
pub fn test_model(text: &str) -> AppModel {
    let mut model = AppModel::new(test_config());
    model
        .session
        .editor_mut()
        .load(text, Position::default(), 0.0, EditHistory::new());
    model.refresh_outline_now();
    model
}

/// Helper to get the live buffer as a string
pub fn buffer_to_string(model: &AppModel) -> String {
    model.active_text()
}

/// Select a byte range in the live editor
pub fn select(model: &mut AppModel, start: usize, end: usize) {
    update(model, Msg::Edit(EditMsg::Select(start..end)));
}

/// Simulate a completed text load without touching the filesystem
pub fn open_text(model: &mut AppModel, path: &str, text: &str) -> TabId {
    let path = PathBuf::from(path);
    update(model, Msg::File(FileMsg::Open(path.clone())));
    update(
        model,
        Msg::File(FileMsg::Loaded {
            path: path.clone(),
            result: Ok(LoadedContent::Text(text.to_string())),
        }),
    );
    model
        .session
        .find_by_path(&path)
        .expect("loaded tab should exist")
}

/// Write a minimal `.docx` archive with the given `word/document.xml` body
pub fn write_docx(path: &Path, body_xml: &str) {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body_xml
    );
    let file = File::create(path).expect("create docx");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// A paragraph with a heading style
pub fn docx_heading(level: u8, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading{}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        level, text
    )
}

/// A plain paragraph, optionally bold
pub fn docx_paragraph(text: &str, bold: bool) -> String {
    let props = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(r#"<w:p><w:r>{}<w:t>{}</w:t></w:r></w:p>"#, props, text)
}

/// Write a text file inside `dir`, returning its path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}
