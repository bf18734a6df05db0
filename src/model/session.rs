//! Tab/session store
//!
//! Owns the ordered list of open tabs and the single live [`EditorState`].
//! The active tab's `content` is a stale snapshot; the live editor holds the
//! real buffer until the tab is switched away from.

use std::path::{Path, PathBuf};

use super::editor::{EditorState, Position};
use super::history::{EditHistory, DEFAULT_HISTORY_LIMIT};
use super::tab::{display_name_for, Tab, TabId, TabKind};
use crate::bridge::markdown_path_for;
use crate::error::{EditorError, Result};

/// Name given to fresh documents; later ones get a numeric suffix
pub const UNTITLED_NAME: &str = "Untitled";

/// Everything needed to write a tab to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub tab: TabId,
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug)]
pub struct Session {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: u64,
    untitled_count: usize,
    history_limit: usize,
    editor: EditorState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// An empty session with no tabs
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
            untitled_count: 0,
            history_limit,
            editor: EditorState::new(),
        }
    }

    // === Queries ===

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.tab(id))
    }

    /// Kind of the active tab (`Text` when nothing is active)
    pub fn active_kind(&self) -> TabKind {
        self.active_tab().map(|t| t.kind.clone()).unwrap_or_default()
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// The live editor. Callers that change the buffer must also call
    /// [`Session::mark_active_modified`].
    pub fn editor_mut(&mut self) -> &mut EditorState {
        &mut self.editor
    }

    /// Current text of a tab, read from the live editor when it is active
    pub fn content_of(&self, id: TabId) -> Option<String> {
        if self.active == Some(id) {
            return Some(self.editor.text());
        }
        self.tab(id).map(|t| t.content.clone())
    }

    pub fn find_by_path(&self, path: &Path) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|t| t.file_path.as_deref() == Some(path))
            .map(|t| t.id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.tabs.iter().any(|t| t.is_modified)
    }

    // === Lifecycle ===

    /// Append a new tab without switching to it
    pub fn create_tab(
        &mut self,
        name: Option<String>,
        content: Option<String>,
        file_path: Option<PathBuf>,
        kind: TabKind,
    ) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;

        let name = name
            .or_else(|| file_path.as_deref().map(display_name_for))
            .unwrap_or_else(|| self.next_untitled_name());

        let mut tab = Tab::new(id, name, content.unwrap_or_default(), file_path, kind);
        tab.history = EditHistory::with_max_size(self.history_limit);
        tracing::debug!(tab = %id, name = %tab.name, "created tab");
        self.tabs.push(tab);
        id
    }

    fn next_untitled_name(&mut self) -> String {
        self.untitled_count += 1;
        if self.untitled_count == 1 {
            UNTITLED_NAME.to_string()
        } else {
            format!("{}-{}", UNTITLED_NAME, self.untitled_count)
        }
    }

    /// Create a blank document and make it active
    pub fn new_document(&mut self) -> TabId {
        let id = self.create_tab(None, None, None, TabKind::Text);
        self.switch_to(id);
        id
    }

    /// Make `id` the active tab, snapshotting the outgoing one.
    /// Returns `false` (and changes nothing) for an unknown id.
    pub fn switch_to(&mut self, id: TabId) -> bool {
        if self.tab(id).is_none() {
            tracing::debug!(tab = %id, "switch to unknown tab ignored");
            return false;
        }
        if self.active == Some(id) {
            return true;
        }

        self.snapshot_active();
        self.active = Some(id);
        self.restore(id);
        true
    }

    /// Activate the tab at `index` in tab-strip order
    pub fn switch_to_index(&mut self, index: usize) -> bool {
        match self.tabs.get(index).map(|t| t.id) {
            Some(id) => self.switch_to(id),
            None => false,
        }
    }

    fn snapshot_active(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let text = self.editor.text();
        let cursor = self.editor.cursor;
        let scroll = self.editor.scroll;
        let history = std::mem::take(&mut self.editor.history);
        if let Some(tab) = self.tab_mut(active) {
            tab.content = text;
            tab.cursor = cursor;
            tab.scroll = scroll;
            tab.history = history;
        }
    }

    fn restore(&mut self, id: TabId) {
        let Some(tab) = self.tab_mut(id) else {
            return;
        };
        let history = std::mem::take(&mut tab.history);
        let (content, cursor, scroll) = (tab.content.clone(), tab.cursor, tab.scroll);
        self.editor.load(&content, cursor, scroll, history);
    }

    /// Close a tab. Closing the active tab activates the most recently created
    /// remaining tab, or a fresh blank one when none remain.
    /// Returns `false` for an unknown id.
    pub fn close_tab(&mut self, id: TabId) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            tracing::debug!(tab = %id, "close of unknown tab ignored");
            return false;
        };
        self.tabs.remove(index);
        tracing::debug!(tab = %id, remaining = self.tabs.len(), "closed tab");

        if self.active == Some(id) {
            self.active = None;
            match self.tabs.iter().map(|t| t.id).max() {
                Some(next) => {
                    self.switch_to(next);
                }
                None => {
                    self.new_document();
                }
            }
        }
        true
    }

    /// Open a document, reusing the tab already showing `path`
    pub fn open_document(&mut self, path: PathBuf, content: String, kind: TabKind) -> TabId {
        if let Some(existing) = self.find_by_path(&path) {
            tracing::debug!(path = %path.display(), tab = %existing, "already open");
            self.switch_to(existing);
            return existing;
        }

        let id = self.create_tab(None, Some(content), Some(path), kind);
        self.switch_to(id);
        id
    }

    // === Modification state ===

    pub fn mark_modified(&mut self, id: TabId) {
        if let Some(tab) = self.tab_mut(id) {
            tab.is_modified = true;
        }
    }

    pub fn mark_active_modified(&mut self) {
        if let Some(id) = self.active {
            self.mark_modified(id);
        }
    }

    /// Resolve where and what to save for `id`.
    ///
    /// `path_override` (save-as) wins over the tab's own path. When neither
    /// exists the caller has to ask the user for a location. Imported Word
    /// documents save next to the original as `.md`.
    pub fn save_request(&self, id: TabId, path_override: Option<PathBuf>) -> Result<SaveRequest> {
        let tab = self.tab(id).ok_or(EditorError::UnknownTab(id))?;
        let own_path = tab.file_path.as_deref().map(|p| match tab.kind {
            TabKind::WordImported { .. } => markdown_path_for(p),
            _ => p.to_path_buf(),
        });
        let path = path_override
            .or(own_path)
            .ok_or(EditorError::SavePathRequired)?;
        let content = self.content_of(id).unwrap_or_default();
        Ok(SaveRequest { tab: id, path, content })
    }

    /// Record that `saved` was written to `path`: the tab takes the path and
    /// its file name. It only becomes clean when its text still equals
    /// `saved`, so edits made while the write was running stay modified.
    /// Returns whether the tab is now clean.
    pub fn mark_saved(&mut self, id: TabId, path: PathBuf, saved: &str) -> bool {
        let unchanged = self.content_of(id).as_deref() == Some(saved);
        let Some(tab) = self.tab_mut(id) else {
            tracing::debug!(tab = %id, "save completion for closed tab ignored");
            return false;
        };
        tab.name = display_name_for(&path);
        tab.file_path = Some(path);
        if unchanged {
            tab.is_modified = false;
        } else {
            tracing::debug!(tab = %id, "edited during save, still modified");
        }
        if matches!(tab.kind, TabKind::WordImported { .. }) {
            tab.kind = TabKind::Text;
        }
        !tab.is_modified
    }

    /// Replace a tab's contents after an external change on disk.
    /// Undo history is dropped since its offsets no longer apply.
    pub fn reload(&mut self, id: TabId, content: String) {
        let limit = self.history_limit;
        let is_active = self.active == Some(id);
        let Some(tab) = self.tab_mut(id) else {
            return;
        };
        tab.content = content;
        tab.is_modified = false;
        tab.history = EditHistory::with_max_size(limit);

        if is_active {
            let cursor = self.editor.cursor;
            let scroll = self.editor.scroll;
            self.restore(id);
            self.editor.set_cursor(cursor);
            self.editor.scroll = scroll;
        }
    }

    /// Live cursor of the active tab
    pub fn cursor(&self) -> Position {
        self.editor.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untitled_names_increment() {
        let mut session = Session::new();
        let a = session.create_tab(None, None, None, TabKind::Text);
        let b = session.create_tab(None, None, None, TabKind::Text);
        assert_eq!(session.tab(a).unwrap().name, "Untitled");
        assert_eq!(session.tab(b).unwrap().name, "Untitled-2");
    }

    #[test]
    fn test_create_tab_does_not_switch() {
        let mut session = Session::new();
        let a = session.new_document();
        session.create_tab(None, None, None, TabKind::Text);
        assert_eq!(session.active_id(), Some(a));
    }

    #[test]
    fn test_switch_unknown_is_noop() {
        let mut session = Session::new();
        let a = session.new_document();
        assert!(!session.switch_to(TabId(99)));
        assert_eq!(session.active_id(), Some(a));
    }

    #[test]
    fn test_save_request_requires_path() {
        let mut session = Session::new();
        let a = session.new_document();
        assert!(matches!(
            session.save_request(a, None),
            Err(EditorError::SavePathRequired)
        ));
        let req = session.save_request(a, Some(PathBuf::from("/tmp/x.md"))).unwrap();
        assert_eq!(req.path, PathBuf::from("/tmp/x.md"));
    }

    #[test]
    fn test_mark_saved_renames() {
        let mut session = Session::new();
        let a = session.new_document();
        session.mark_active_modified();
        assert!(session.mark_saved(a, PathBuf::from("/tmp/notes.md"), ""));
        let tab = session.tab(a).unwrap();
        assert_eq!(tab.name, "notes.md");
        assert!(!tab.is_modified);
        assert_eq!(session.find_by_path(Path::new("/tmp/notes.md")), Some(a));
    }

    #[test]
    fn test_mark_saved_keeps_later_edits_modified() {
        let mut session = Session::new();
        let a = session.open_document(PathBuf::from("/tmp/a.md"), "v1".into(), TabKind::Text);
        session.editor_mut().insert_text("x");
        session.mark_active_modified();

        assert!(!session.mark_saved(a, PathBuf::from("/tmp/a.md"), "v1"));
        assert!(session.tab(a).unwrap().is_modified);
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn test_reload_active_keeps_cursor() {
        let mut session = Session::new();
        let a = session.open_document(PathBuf::from("/tmp/a.md"), "one\ntwo\n".into(), TabKind::Text);
        session.editor_mut().set_cursor(Position::new(1, 2));
        session.reload(a, "one\ntwo\nthree\n".into());
        assert_eq!(session.editor().text(), "one\ntwo\nthree\n");
        assert_eq!(session.cursor(), Position::new(1, 2));
    }
}
