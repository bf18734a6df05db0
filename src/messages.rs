//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Results of side
//! effects come back as messages too, with errors already rendered to text.

use std::ops::Range;
use std::path::PathBuf;

use crate::bridge::{DirEntry, OcrResult};
use crate::model::{ImageData, Position, TabId, ViewMode, WordFormat};
use crate::search::SearchOptions;

/// Tab strip messages
#[derive(Debug, Clone)]
pub enum TabMsg {
    /// New blank document (Cmd+N)
    New,
    Switch(TabId),
    /// Activate by position in the tab strip (Cmd+1..9)
    SwitchIndex(usize),
    Next,
    Previous,
    /// Close a tab; a modified tab asks first
    Close(TabId),
    CloseActive,
    /// Answer to the unsaved-changes question for the pending close
    ConfirmClose { save: bool },
    CancelClose,
}

/// Edits and cursor changes on the live buffer
#[derive(Debug, Clone)]
pub enum EditMsg {
    /// Type text over the current selection
    Insert(String),
    /// Replace a byte range
    ReplaceRange { range: Range<usize>, text: String },
    /// Replace the whole buffer as one edit
    SetText(String),
    SetCursor(Position),
    /// Select a byte range
    Select(Range<usize>),
    Scroll(f64),
    Undo,
    Redo,
}

/// Find/replace bar messages
#[derive(Debug, Clone)]
pub enum SearchMsg {
    Open { replace: bool },
    Close,
    SetQuery(String),
    SetReplacement(String),
    SetOptions(SearchOptions),
    ToggleCaseSensitive,
    ToggleWholeWord,
    ToggleRegex,
    FindNext,
    FindPrevious,
    ReplaceOne,
    ReplaceAll,
}

#[derive(Debug, Clone)]
pub enum ViewMsg {
    SetMode(ViewMode),
    /// Editor → Split → Preview → Editor
    Cycle,
    ToggleSidebar,
}

#[derive(Debug, Clone)]
pub enum OutlineMsg {
    /// A debounce timer fired
    Refresh { token: u64 },
    /// Move the cursor to a heading line
    JumpToLine(usize),
    /// Move the cursor to the heading with this anchor
    JumpToAnchor(String),
}

/// Contents of a file after loading, by kind
#[derive(Debug, Clone)]
pub enum LoadedContent {
    Text(String),
    Image(ImageData),
    /// Word document converted to Markdown
    Word { markdown: String, format: WordFormat },
}

/// File bridge messages and their completions
#[derive(Debug, Clone)]
pub enum FileMsg {
    /// Open a file in a tab (text, image, or Word by extension)
    Open(PathBuf),
    Loaded {
        path: PathBuf,
        result: Result<LoadedContent, String>,
    },
    /// Save the active tab to its own path
    Save,
    /// Save the active tab to a chosen path
    SaveAs(PathBuf),
    Saved {
        tab: TabId,
        /// The text that was written
        content: String,
        result: Result<PathBuf, String>,
    },
    /// An open file changed on disk
    ExternallyModified(PathBuf),
    Reloaded {
        path: PathBuf,
        result: Result<String, String>,
    },
    /// Run OCR on an image file
    Ocr(PathBuf),
    OcrCompleted {
        path: PathBuf,
        result: Result<OcrResult, String>,
    },
}

/// File browser messages
#[derive(Debug, Clone)]
pub enum WorkspaceMsg {
    OpenFolder(PathBuf),
    /// Re-read the root and every expanded folder
    Refresh,
    ToggleFolder(PathBuf),
    Listed {
        dir: PathBuf,
        result: Result<Vec<DirEntry>, String>,
    },
    /// Activate a file entry in the tree
    OpenEntry(PathBuf),
}

#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Periodic tick: expires transient notices
    Tick,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Tab(TabMsg),
    Edit(EditMsg),
    Search(SearchMsg),
    View(ViewMsg),
    Outline(OutlineMsg),
    File(FileMsg),
    Workspace(WorkspaceMsg),
    App(AppMsg),
}
