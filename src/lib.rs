//! marknote - Elm-style Markdown editor core
//!
//! Tabs, search and replace, outline extraction, view modes and Markdown
//! preview, driven by messages through [`update::update`] and executed by
//! [`runtime::Runtime`]. File, conversion, image and OCR side effects live in
//! [`bridge`].

pub mod bridge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod fs_watcher;
pub mod markdown;
pub mod messages;
pub mod model;
pub mod outline;
pub mod runtime;
pub mod search;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use messages::Msg;
pub use model::AppModel;
pub use runtime::Runtime;
