//! Utility modules

pub mod debounce;
pub mod file_validation;

pub use debounce::Debouncer;
pub use file_validation::{is_image_file, is_likely_binary, validate_file_for_opening, FileOpenError};
