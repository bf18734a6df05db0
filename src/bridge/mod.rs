//! Boundary to the outside world
//!
//! Each bridge is a blocking request/response call. The runtime runs them on
//! worker threads and posts the result back into the update loop as a message.

pub mod convert;
pub mod file;
pub mod image;
pub mod ocr;

pub use convert::{html_to_markdown, markdown_path_for, word_to_markdown, Converted, DocumentConverter, DocxConverter};
pub use file::{read_directory, read_file, save_file, DirEntry};
pub use self::image::{mime_type_for, process_image_file};
pub use ocr::{OcrClient, OcrResult};
