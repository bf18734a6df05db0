//! Application model - the complete state of the editor
//!
//! Following the Elm Architecture, every change goes through
//! [`crate::update::update`]; the runtime owns the single [`AppModel`].

pub mod editor;
pub mod history;
pub mod session;
pub mod tab;
pub mod ui;
pub mod view_mode;
pub mod workspace;

pub use editor::{EditorState, Position, Selection};
pub use history::{EditHistory, EditOperation, DEFAULT_HISTORY_LIMIT};
pub use session::{SaveRequest, Session, UNTITLED_NAME};
pub use tab::{display_name_for, ImageData, Tab, TabId, TabKind, WordFormat};
pub use ui::{FindReplaceState, TransientMessage, UiState};
pub use view_mode::{PaneVisibility, PreviewRefresh, ViewMode, ViewModeController};
pub use workspace::{natural_cmp, sort_entries, FileFilters, Workspace};

use std::collections::HashSet;
use std::fmt::Display;
use std::path::PathBuf;

use crate::commands::Cmd;
use crate::config::EditorConfig;
use crate::markdown::PreviewPane;
use crate::outline::OutlineData;
use crate::search::SearchState;
use crate::util::Debouncer;

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    /// Open tabs and the live editor
    pub session: Session,
    /// Find/replace matches for the active buffer
    pub search: SearchState,
    pub view: ViewModeController,
    pub outline: OutlineData,
    pub outline_debounce: Debouncer,
    pub preview: PreviewPane,
    pub ui: UiState,
    /// Opened folder, if any
    pub workspace: Option<Workspace>,
    pub config: EditorConfig,
    /// Paths with a load in flight; repeated open requests are dropped
    pub loading: HashSet<PathBuf>,
}

impl AppModel {
    /// A model with one blank document
    pub fn new(config: EditorConfig) -> Self {
        let mut session = Session::with_history_limit(config.history_limit);
        session.new_document();

        let mut ui = UiState::new();
        ui.find_replace.options = config.search;
        ui.set_status("Ready");

        let mut model = Self {
            session,
            search: SearchState::new("", config.search),
            view: ViewModeController::new(config.view_mode),
            outline: OutlineData::default(),
            outline_debounce: Debouncer::from_millis(config.outline_debounce_ms),
            preview: PreviewPane::new(),
            ui,
            workspace: None,
            config,
            loading: HashSet::new(),
        };
        model.refresh_preview();
        model
    }

    /// Full text of the active buffer
    pub fn active_text(&self) -> String {
        self.session.editor().text()
    }

    pub fn active_kind(&self) -> TabKind {
        self.session.active_kind()
    }

    pub fn panes(&self) -> PaneVisibility {
        self.view.panes(&self.active_kind())
    }

    /// Re-render the preview if the current view shows it
    pub fn refresh_preview(&mut self) {
        let kind = self.active_kind();
        if kind.is_image() {
            self.preview.clear();
        } else if self.view.preview_follows_edits(&kind) {
            let revision = self.session.editor().revision;
            let text = self.active_text();
            self.preview.refresh(&text, revision);
        }
    }

    /// Act on what the view-mode controller asked for
    pub fn apply_preview_refresh(&mut self, refresh: PreviewRefresh) {
        match refresh {
            PreviewRefresh::None => {}
            PreviewRefresh::Markdown => self.refresh_preview(),
            PreviewRefresh::Image => self.preview.clear(),
        }
    }

    /// Rebuild the outline from the live buffer immediately
    pub fn refresh_outline_now(&mut self) {
        let editor = self.session.editor();
        self.outline = OutlineData::from_text(&editor.text(), editor.revision);
    }

    /// Schedule a debounced outline refresh
    pub fn schedule_outline(&mut self) -> Cmd {
        let token = self.outline_debounce.schedule();
        Cmd::DebouncedOutline {
            token,
            delay_ms: self.outline_debounce.delay_ms(),
        }
    }

    /// Everything that depends on which tab is active
    pub fn on_active_tab_changed(&mut self) {
        self.search.invalidate();
        let refresh = self.view.on_tab_activated(&self.active_kind());
        self.apply_preview_refresh(refresh);
        self.refresh_outline_now();
    }

    /// Report a failed operation in the status bar
    pub fn report_error(&mut self, context: &str, error: impl Display) {
        tracing::warn!("{}: {}", context, error);
        self.ui.set_status(format!("{}: {}", context, error));
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_model_has_one_blank_tab() {
        let model = AppModel::default();
        assert_eq!(model.session.len(), 1);
        assert_eq!(model.active_text(), "");
        assert_eq!(model.ui.visible_status(), "Ready");
    }

    #[test]
    fn test_config_seeds_view_and_search() {
        let mut config = EditorConfig::default();
        config.view_mode = ViewMode::Split;
        config.search.case_sensitive = true;
        let model = AppModel::new(config);
        assert_eq!(model.view.mode(), ViewMode::Split);
        assert!(model.search.options().case_sensitive);
        assert!(model.preview.last_revision.is_some());
    }

    #[test]
    fn test_schedule_outline_hands_out_fresh_tokens() {
        let mut model = AppModel::default();
        let Cmd::DebouncedOutline { token: first, delay_ms } = model.schedule_outline() else {
            panic!("expected debounce command");
        };
        assert_eq!(delay_ms, 300);
        let Cmd::DebouncedOutline { token: second, .. } = model.schedule_outline() else {
            panic!("expected debounce command");
        };
        assert!(!model.outline_debounce.is_current(first));
        assert!(model.outline_debounce.is_current(second));
    }
}
