//! Live editor pane - the buffer being edited plus cursor, selection and scroll
//!
//! There is exactly one `EditorState`; tabs snapshot into and restore from it
//! when the active tab changes.

use std::ops::Range;

use ropey::Rope;

use super::history::{EditHistory, EditOperation};

/// A position in the buffer (line and column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number in chars (0-indexed)
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A selection as a pair of byte offsets, `start <= end`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Build a selection, ordering the endpoints
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// An empty selection at `offset`
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// The single visible editing pane
#[derive(Debug, Clone)]
pub struct EditorState {
    pub buffer: Rope,
    pub cursor: Position,
    pub selection: Selection,
    pub scroll: f64,
    pub history: EditHistory,
    /// Incremented on every buffer mutation, used to discard stale async results
    pub revision: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            buffer: Rope::new(),
            cursor: Position::default(),
            selection: Selection::default(),
            scroll: 0.0,
            history: EditHistory::new(),
            revision: 0,
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from_str(text),
            ..Self::new()
        }
    }

    /// Full buffer contents
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Replace the whole buffer and editing state, e.g. when restoring a tab.
    /// This is not an edit and is not recorded in history.
    pub fn load(&mut self, text: &str, cursor: Position, scroll: f64, history: EditHistory) {
        self.buffer = Rope::from_str(text);
        self.history = history;
        self.scroll = scroll;
        self.set_cursor(cursor);
        self.revision += 1;
    }

    /// Convert a (line, column) position to a byte offset, clamping to the buffer
    pub fn position_to_offset(&self, pos: Position) -> usize {
        if pos.line >= self.buffer.len_lines() {
            return self.buffer.len_bytes();
        }
        let line_start = self.buffer.line_to_char(pos.line);
        let line = self.buffer.line(pos.line);
        let line_len = line.len_chars() - trailing_newline_chars(&line);
        self.buffer
            .char_to_byte(line_start + pos.column.min(line_len))
    }

    /// Convert a byte offset to a (line, column) position
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let clamped = offset.min(self.buffer.len_bytes());
        let char_idx = self.buffer.byte_to_char(clamped);
        let line = self.buffer.char_to_line(char_idx);
        let line_start = self.buffer.line_to_char(line);
        Position::new(line, char_idx - line_start)
    }

    /// Move the cursor, collapsing the selection onto it
    pub fn set_cursor(&mut self, pos: Position) {
        let offset = self.position_to_offset(pos);
        self.cursor = self.offset_to_position(offset);
        self.selection = Selection::caret(offset);
    }

    /// Select a byte range; the cursor goes to the end of the range
    pub fn select(&mut self, range: Range<usize>) {
        let len = self.buffer.len_bytes();
        let selection = Selection::new(range.start.min(len), range.end.min(len));
        self.cursor = self.offset_to_position(selection.end);
        self.selection = selection;
    }

    /// Currently selected text
    pub fn selected_text(&self) -> String {
        let start = self.buffer.byte_to_char(self.selection.start);
        let end = self.buffer.byte_to_char(self.selection.end);
        self.buffer.slice(start..end).to_string()
    }

    /// Replace `range` with `text` as one undoable edit.
    /// The cursor lands after the inserted text.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> EditOperation {
        let start = self.buffer.byte_to_char(range.start);
        let end = self.buffer.byte_to_char(range.end);
        let deleted = self.buffer.slice(start..end).to_string();
        let cursor_before = self.cursor;

        self.splice_chars(start, end, text);
        let caret = range.start + text.len();
        self.set_cursor(self.offset_to_position(caret));

        let op = EditOperation::replace(range.start, deleted, text.to_string(), cursor_before, self.cursor);
        self.history.push(op.clone());
        op
    }

    /// Type `text` over the current selection
    pub fn insert_text(&mut self, text: &str) -> EditOperation {
        self.replace_range(self.selection.range(), text)
    }

    /// Replace the whole buffer as one undoable edit (replace-all, reload)
    pub fn replace_all_text(&mut self, text: &str) -> EditOperation {
        let cursor = self.cursor;
        let op = self.replace_range(0..self.buffer.len_bytes(), text);
        self.set_cursor(cursor);
        op
    }

    pub fn undo(&mut self) -> bool {
        let Some(op) = self.history.pop_undo() else {
            return false;
        };
        self.apply_unrecorded(&op.inverse());
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(op) = self.history.pop_redo() else {
            return false;
        };
        self.apply_unrecorded(&op);
        true
    }

    fn apply_unrecorded(&mut self, op: &EditOperation) {
        let start = self.buffer.byte_to_char(op.offset);
        let end = self
            .buffer
            .byte_to_char((op.offset + op.deleted_text.len()).min(self.buffer.len_bytes()));
        self.splice_chars(start, end, &op.inserted_text);
        self.set_cursor(op.cursor_after);
    }

    fn splice_chars(&mut self, start: usize, end: usize, text: &str) {
        if end > start {
            self.buffer.remove(start..end);
        }
        if !text.is_empty() {
            self.buffer.insert(start, text);
        }
        self.revision += 1;
    }
}

fn trailing_newline_chars(line: &ropey::RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    match line.char(len - 1) {
        '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
        '\n' | '\r' => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_offset_conversion() {
        let editor = EditorState::with_text("ab\nçd\nef");
        assert_eq!(editor.position_to_offset(Position::new(1, 1)), 5);
        assert_eq!(editor.offset_to_position(5), Position::new(1, 1));
        assert_eq!(editor.position_to_offset(Position::new(0, 99)), 2);
        assert_eq!(editor.position_to_offset(Position::new(9, 0)), editor.buffer.len_bytes());
    }

    #[test]
    fn test_select_moves_cursor_to_end() {
        let mut editor = EditorState::with_text("hello\nworld");
        editor.select(6..11);
        assert_eq!(editor.selected_text(), "world");
        assert_eq!(editor.cursor, Position::new(1, 5));
    }

    #[test]
    fn test_replace_range_is_undoable() {
        let mut editor = EditorState::with_text("hello world");
        editor.replace_range(6..11, "there");
        assert_eq!(editor.text(), "hello there");
        assert_eq!(editor.cursor, Position::new(0, 11));

        assert!(editor.undo());
        assert_eq!(editor.text(), "hello world");
        assert!(editor.redo());
        assert_eq!(editor.text(), "hello there");
    }

    #[test]
    fn test_insert_text_over_selection() {
        let mut editor = EditorState::with_text("abc");
        editor.select(1..2);
        editor.insert_text("XY");
        assert_eq!(editor.text(), "aXYc");
        assert!(editor.selection.is_empty());
    }

    #[test]
    fn test_revision_increments_on_edit() {
        let mut editor = EditorState::with_text("a");
        let before = editor.revision;
        editor.insert_text("b");
        assert!(editor.revision > before);
    }

    #[test]
    fn test_replace_all_text_single_undo_step() {
        let mut editor = EditorState::with_text("aaa");
        editor.replace_all_text("bbb");
        assert_eq!(editor.history.undo_count(), 1);
        editor.undo();
        assert_eq!(editor.text(), "aaa");
    }
}
