//! Image bridge: load an image file into a displayable data URL

use std::fs;
use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageReader;

use crate::error::{EditorError, Result};
use crate::model::ImageData;
use crate::util::file_validation::{extension_lowercase, filename_for_display, validate_file_for_opening};

/// MIME type for a supported image extension
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let mime = match extension_lowercase(path)?.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "tiff" | "tif" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file and encode it for display
pub fn process_image_file(path: &Path) -> Result<ImageData> {
    let file_size = validate_file_for_opening(path).map_err(|e| EditorError::io(path, e.into_io()))?;
    let mime_type = mime_type_for(path).ok_or_else(|| {
        EditorError::Conversion(format!("{}: unsupported image format", path.display()))
    })?;

    let bytes = fs::read(path).map_err(|e| EditorError::io(path, e))?;
    let base64 = STANDARD.encode(&bytes);
    let data_url = format!("data:{};base64,{}", mime_type, base64);

    // SVG is text and not decodable by the raster loader
    let dimensions = if mime_type == "image/svg+xml" {
        None
    } else {
        // Only the header is decoded
        let dimensions = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.into_dimensions());
        match dimensions {
            Ok(dims) => Some(dims),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "could not decode image dimensions");
                None
            }
        }
    };

    tracing::debug!(path = %path.display(), bytes = file_size, mime = mime_type, "loaded image");
    Ok(ImageData {
        file_name: filename_for_display(path),
        file_path: path.to_path_buf(),
        file_size,
        mime_type: mime_type.to_string(),
        base64,
        data_url,
        dimensions,
    })
}
