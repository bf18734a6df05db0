//! File bridge: read, save, and list directories

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::error::{EditorError, Result};
use crate::util::file_validation::{is_likely_binary, validate_file_for_opening, FileOpenError};

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub size: u64,
    /// Modification time in milliseconds since the Unix epoch
    pub modified: Option<u64>,
}

/// Read a text file after validating it can be opened
pub fn read_file(path: &Path) -> Result<String> {
    validate_file_for_opening(path).map_err(|e| EditorError::io(path, e.into_io()))?;
    if is_likely_binary(path) {
        return Err(EditorError::io(path, FileOpenError::BinaryFile.into_io()));
    }
    let content = fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "read file");
    Ok(content)
}

/// Write `content` to `path`, replacing any existing file
pub fn save_file(path: &Path, content: &str) -> Result<PathBuf> {
    fs::write(path, content).map_err(|e| EditorError::io(path, e))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "saved file");
    Ok(path.to_path_buf())
}

/// List the immediate children of `dir`, unfiltered and unsorted
pub fn read_directory(dir: &Path) -> Result<Vec<DirEntry>> {
    let read_dir = fs::read_dir(dir).map_err(|e| EditorError::io(dir, e))?;

    let mut entries = Vec::new();
    for item in read_dir {
        let item = item.map_err(|e| EditorError::io(dir, e))?;
        let path = item.path();
        // Follow symlinks like a plain stat would
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64);

        entries.push(DirEntry {
            name: item.file_name().to_string_lossy().to_string(),
            path,
            is_directory: metadata.is_dir(),
            size: metadata.len(),
            modified,
        });
    }

    tracing::debug!(dir = %dir.display(), count = entries.len(), "listed directory");
    Ok(entries)
}
