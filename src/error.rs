//! Error taxonomy for the editing core
//!
//! Bridges and session operations return [`EditorError`]. The update layer
//! turns every error into a status message; none of them end the session.

use std::path::PathBuf;

use crate::model::TabId;
use crate::search::PatternError;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The search pattern could not be compiled (regex mode)
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// File read/write/listing failure
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Word/HTML conversion failure
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// Search produced no match
    #[error("no match for \"{0}\"")]
    NotFound(String),

    /// Operation addressed a tab that is not open
    #[error("no tab with id {0}")]
    UnknownTab(TabId),

    /// Save was requested for a tab with no file path and none was supplied
    #[error("no file path: choose a location with Save As")]
    SavePathRequired,

    /// OCR service failure
    #[error("OCR request failed: {0}")]
    Ocr(String),
}

impl EditorError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
