//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The runtime executes them and feeds the outcome back as a [`crate::messages::Msg`].

use std::path::PathBuf;

use crate::model::{TabId, WordFormat};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Read a text file; answers `FileMsg::Loaded`
    LoadFile { path: PathBuf },
    /// Convert a Word document; answers `FileMsg::Loaded`
    ConvertDocument { path: PathBuf, format: WordFormat },
    /// Encode an image file; answers `FileMsg::Loaded`
    ProcessImage { path: PathBuf },
    /// Write a tab's contents; answers `FileMsg::Saved`
    SaveFile {
        tab: TabId,
        path: PathBuf,
        content: String,
    },
    /// Re-read a file changed on disk; answers `FileMsg::Reloaded`
    ReloadFile { path: PathBuf },
    /// List a directory; answers `WorkspaceMsg::Listed`
    ReadDirectory { path: PathBuf },
    /// Send an image to the OCR service; answers `FileMsg::OcrCompleted`
    PerformOcr { path: PathBuf },
    /// Start a debounce timer for the outline.
    /// After delay_ms, sends `OutlineMsg::Refresh { token }`
    DebouncedOutline { token: u64, delay_ms: u64 },
    /// Start watching an open file for external changes
    WatchFile { path: PathBuf },
    /// Stop watching a file whose tab was closed
    UnwatchFile { path: PathBuf },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, flattening away `None`s
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Number of worker results this command will post back
    pub fn pending_results(&self) -> usize {
        match self {
            Cmd::None | Cmd::WatchFile { .. } | Cmd::UnwatchFile { .. } => 0,
            Cmd::Batch(cmds) => cmds.iter().map(Cmd::pending_results).sum(),
            _ => 1,
        }
    }

    /// Convert to the `Option<Cmd>` returned by update functions
    pub fn into_option(self) -> Option<Cmd> {
        (!self.is_none()).then_some(self)
    }
}
