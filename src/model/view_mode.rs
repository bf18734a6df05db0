//! Editor / Split / Preview mode controller
//!
//! Decides which panes are visible and whether the preview has to be
//! recomputed. Image tabs cannot be shown editor-only, so they force at least
//! a split layout.

use serde::{Deserialize, Serialize};

use super::tab::TabKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Editor,
    Split,
    Preview,
}

impl ViewMode {
    pub fn shows_preview(&self) -> bool {
        matches!(self, Self::Split | Self::Preview)
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "editor" => Ok(Self::Editor),
            "split" => Ok(Self::Split),
            "preview" => Ok(Self::Preview),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

/// What the preview pane must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewRefresh {
    /// Nothing to recompute
    None,
    /// Re-render the active buffer as Markdown
    Markdown,
    /// The image renderer takes over the preview pane
    Image,
}

/// Which panes are on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneVisibility {
    pub editor: bool,
    pub preview: bool,
    pub image: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ViewModeController {
    mode: ViewMode,
}

impl ViewModeController {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Explicit mode change requested by the user
    pub fn set_mode(&mut self, mode: ViewMode, active: &TabKind) -> PreviewRefresh {
        if mode != self.mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "view mode changed");
        }
        self.mode = mode;
        if active.is_image() && self.mode == ViewMode::Editor {
            self.mode = ViewMode::Split;
        }
        self.refresh_for(active)
    }

    /// A different tab became active
    pub fn on_tab_activated(&mut self, active: &TabKind) -> PreviewRefresh {
        if active.is_image() && self.mode == ViewMode::Editor {
            self.mode = ViewMode::Split;
        }
        self.refresh_for(active)
    }

    /// Cycle Editor → Split → Preview → Editor
    pub fn cycle(&mut self, active: &TabKind) -> PreviewRefresh {
        let next = match self.mode {
            ViewMode::Editor => ViewMode::Split,
            ViewMode::Split => ViewMode::Preview,
            ViewMode::Preview => ViewMode::Editor,
        };
        self.set_mode(next, active)
    }

    fn refresh_for(&self, active: &TabKind) -> PreviewRefresh {
        if active.is_image() {
            PreviewRefresh::Image
        } else if self.mode.shows_preview() {
            PreviewRefresh::Markdown
        } else {
            PreviewRefresh::None
        }
    }

    pub fn panes(&self, active: &TabKind) -> PaneVisibility {
        if active.is_image() {
            return PaneVisibility {
                editor: self.mode != ViewMode::Preview,
                preview: false,
                image: true,
            };
        }
        PaneVisibility {
            editor: self.mode != ViewMode::Preview,
            preview: self.mode.shows_preview(),
            image: false,
        }
    }

    /// Whether an edit to the active buffer should re-render the preview
    pub fn preview_follows_edits(&self, active: &TabKind) -> bool {
        !active.is_image() && self.mode.shows_preview()
    }
}
