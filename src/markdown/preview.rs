//! Markdown preview pane state

use super::render_markdown;

/// Rendered HTML for the preview pane, tagged with the buffer revision it
/// was rendered from
#[derive(Debug, Clone, Default)]
pub struct PreviewPane {
    pub rendered_html: String,
    pub last_revision: Option<u64>,
    pub scroll_sync_enabled: bool,
}

impl PreviewPane {
    pub fn new() -> Self {
        Self {
            scroll_sync_enabled: true,
            ..Self::default()
        }
    }

    pub fn needs_refresh(&self, revision: u64) -> bool {
        self.last_revision != Some(revision)
    }

    /// Re-render if `revision` differs from the last render. Returns `true`
    /// when the HTML changed.
    pub fn refresh(&mut self, markdown: &str, revision: u64) -> bool {
        if !self.needs_refresh(revision) {
            return false;
        }
        self.rendered_html = render_markdown(markdown);
        self.last_revision = Some(revision);
        tracing::trace!(revision, bytes = self.rendered_html.len(), "preview rendered");
        true
    }

    /// Forget the rendered output, e.g. when an image tab takes over
    pub fn clear(&mut self) {
        self.rendered_html.clear();
        self.last_revision = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_skips_same_revision() {
        let mut pane = PreviewPane::new();
        assert!(pane.refresh("# A", 1));
        assert!(!pane.refresh("# changed", 1));
        assert!(pane.rendered_html.contains(">A</h1>"));
        assert!(pane.refresh("# B", 2));
        assert!(pane.rendered_html.contains(">B</h1>"));
    }

    #[test]
    fn test_clear_forces_rerender() {
        let mut pane = PreviewPane::new();
        pane.refresh("text", 3);
        pane.clear();
        assert!(pane.needs_refresh(3));
        assert!(pane.rendered_html.is_empty());
    }
}
