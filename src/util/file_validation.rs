//! File validation before opening
//!
//! Checks existence, directory-ness and the size limit, plus a cheap binary
//! sniff for text files.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Maximum file size in bytes (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Image file extensions opened as image tabs
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tiff", "tif",
];

/// Errors that can occur when validating a file for opening
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FileOpenError {
    #[error("file not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("is a directory")]
    IsDirectory,
    /// File appears to be binary (contains null bytes)
    #[error("binary file")]
    BinaryFile,
    #[error("file too large ({size_mb:.1} MB, max {max} MB)", max = MAX_FILE_SIZE / (1024 * 1024))]
    TooLarge { size_mb: f64 },
    #[error("{0}")]
    IoError(String),
}

impl FileOpenError {
    /// Express as an `io::Error` so it fits the file error variant
    pub fn into_io(self) -> std::io::Error {
        use std::io::ErrorKind;
        let kind = match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::IsDirectory | Self::BinaryFile | Self::TooLarge { .. } => ErrorKind::InvalidData,
            Self::IoError(_) => ErrorKind::Other,
        };
        std::io::Error::new(kind, self)
    }
}

/// Validate a file before attempting to open it
///
/// Does NOT check for binary content (use `is_likely_binary` separately after this passes)
pub fn validate_file_for_opening(path: &Path) -> Result<u64, FileOpenError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FileOpenError::NotFound,
        std::io::ErrorKind::PermissionDenied => FileOpenError::PermissionDenied,
        _ => FileOpenError::IoError(e.to_string()),
    })?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileOpenError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(metadata.len())
}

/// Check if a file is likely binary by scanning the first 8KB for null bytes.
/// Returns `false` on any read error (let the actual open fail with a better error).
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut buffer = [0u8; 8192];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };

    buffer[..bytes_read].contains(&0)
}

/// Lower-cased extension of `path`, if any
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_image_file(path: &Path) -> bool {
    extension_lowercase(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Get the filename from a path for display in error messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_nonexistent_file() {
        let result = validate_file_for_opening(Path::new("/nonexistent/path/file.md"));
        assert!(matches!(result, Err(FileOpenError::NotFound)));
    }

    #[test]
    fn test_validate_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_file_for_opening(dir.path());
        assert!(matches!(result, Err(FileOpenError::IsDirectory)));
    }

    #[test]
    fn test_validate_valid_file_returns_size() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"# hi\n").unwrap();
        temp.flush().unwrap();
        assert_eq!(validate_file_for_opening(temp.path()), Ok(5));
    }

    #[test]
    fn test_is_binary_with_null_bytes() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"Hello\x00World").unwrap();
        temp.flush().unwrap();

        assert!(is_likely_binary(temp.path()));
    }

    #[test]
    fn test_error_messages() {
        let io = FileOpenError::BinaryFile.into_io();
        assert_eq!(io.kind(), std::io::ErrorKind::InvalidData);
        assert_eq!(io.to_string(), "binary file");
        let too_large = FileOpenError::TooLarge { size_mb: 51.0 };
        assert_eq!(too_large.to_string(), "file too large (51.0 MB, max 50 MB)");
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("photo.PNG")));
        assert!(is_image_file(Path::new("icon.ico")));
        assert!(is_image_file(Path::new("scan.tif")));
        assert!(is_image_file(Path::new("logo.svg")));
        assert!(!is_image_file(Path::new("readme.md")));
        assert!(!is_image_file(Path::new("noextension")));
    }
}
