//! Markdown preview module
//!
//! Renders the active buffer to HTML for the preview pane.

mod preview;
mod renderer;

pub use preview::PreviewPane;
pub use renderer::{markdown_to_html, render_markdown};
