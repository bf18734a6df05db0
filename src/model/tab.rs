//! Open tabs and what they hold

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::editor::Position;
use super::history::EditHistory;

/// Opaque tab handle, allocated monotonically per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Word document flavours accepted for import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordFormat {
    Doc,
    Docx,
}

impl WordFormat {
    /// Detect from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }
}

/// A loaded image ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageData {
    pub file_name: String,
    pub file_path: PathBuf,
    pub file_size: u64,
    pub mime_type: String,
    pub base64: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
    pub dimensions: Option<(u32, u32)>,
}

/// What a tab displays
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TabKind {
    #[default]
    Text,
    Image(ImageData),
    /// Markdown converted from a Word document
    WordImported { original_format: WordFormat },
}

impl TabKind {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

/// One open document
#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    /// Buffer snapshot; stale while this tab is the active one
    pub content: String,
    pub file_path: Option<PathBuf>,
    pub is_modified: bool,
    pub cursor: Position,
    pub scroll: f64,
    pub kind: TabKind,
    pub history: EditHistory,
}

impl Tab {
    pub fn new(id: TabId, name: String, content: String, file_path: Option<PathBuf>, kind: TabKind) -> Self {
        Self {
            id,
            name,
            content,
            file_path,
            is_modified: false,
            cursor: Position::default(),
            scroll: 0.0,
            kind,
            history: EditHistory::new(),
        }
    }

    pub fn is_untitled(&self) -> bool {
        self.file_path.is_none()
    }

    /// Name shown in the tab strip, with a marker for unsaved changes
    pub fn title(&self) -> String {
        if self.is_modified {
            format!("{} \u{25CF}", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// File name component of `path`, falling back to the full path
pub fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_format_from_path() {
        assert_eq!(WordFormat::from_path(Path::new("a/report.DOCX")), Some(WordFormat::Docx));
        assert_eq!(WordFormat::from_path(Path::new("old.doc")), Some(WordFormat::Doc));
        assert_eq!(WordFormat::from_path(Path::new("notes.md")), None);
    }

    #[test]
    fn test_title_marks_modified() {
        let mut tab = Tab::new(TabId(1), "a.md".into(), String::new(), None, TabKind::Text);
        assert_eq!(tab.title(), "a.md");
        tab.is_modified = true;
        assert!(tab.title().starts_with("a.md "));
    }

    #[test]
    fn test_display_name_for() {
        assert_eq!(display_name_for(Path::new("/tmp/notes.md")), "notes.md");
    }
}
