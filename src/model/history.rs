//! Edit history (undo/redo) for a tab's buffer

use super::editor::Position;

/// Default number of undo steps kept per tab
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A single edit operation that can be undone/redone.
///
/// Offsets are byte offsets into the UTF-8 buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    /// Byte offset where the edit occurred
    pub offset: usize,
    /// Text that was deleted (empty for pure inserts)
    pub deleted_text: String,
    /// Text that was inserted (empty for pure deletes)
    pub inserted_text: String,
    /// Cursor position before the edit
    pub cursor_before: Position,
    /// Cursor position after the edit
    pub cursor_after: Position,
}

impl EditOperation {
    pub fn insert(offset: usize, text: String, cursor_before: Position, cursor_after: Position) -> Self {
        Self::replace(offset, String::new(), text, cursor_before, cursor_after)
    }

    pub fn delete(offset: usize, text: String, cursor_before: Position, cursor_after: Position) -> Self {
        Self::replace(offset, text, String::new(), cursor_before, cursor_after)
    }

    pub fn replace(
        offset: usize,
        deleted_text: String,
        inserted_text: String,
        cursor_before: Position,
        cursor_after: Position,
    ) -> Self {
        Self {
            offset,
            deleted_text,
            inserted_text,
            cursor_before,
            cursor_after,
        }
    }

    /// The operation that reverts this one
    pub fn inverse(&self) -> Self {
        Self {
            offset: self.offset,
            deleted_text: self.inserted_text.clone(),
            inserted_text: self.deleted_text.clone(),
            cursor_before: self.cursor_after,
            cursor_after: self.cursor_before,
        }
    }

    /// Apply this operation to `buffer` in place.
    ///
    /// Returns `false` without touching the buffer when the deleted text is not
    /// found at `offset`.
    pub fn apply(&self, buffer: &mut String) -> bool {
        let end = self.offset + self.deleted_text.len();
        if buffer.get(self.offset..end) != Some(self.deleted_text.as_str()) {
            return false;
        }
        buffer.replace_range(self.offset..end, &self.inserted_text);
        true
    }
}

/// Edit history with undo/redo stacks.
///
/// Undo and redo both hand back the original operation; the caller applies its
/// inverse to undo and the operation itself to redo.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<EditOperation>,
    redo_stack: Vec<EditOperation>,
    max_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Push an operation onto the undo stack (clears redo stack)
    pub fn push(&mut self, op: EditOperation) {
        self.redo_stack.clear();
        self.undo_stack.push(op);

        // Trim if exceeded max size
        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    /// Pop an operation from the undo stack (moves to redo stack)
    pub fn pop_undo(&mut self) -> Option<EditOperation> {
        let op = self.undo_stack.pop()?;
        self.redo_stack.push(op.clone());
        Some(op)
    }

    /// Pop an operation from the redo stack (moves to undo stack)
    pub fn pop_redo(&mut self) -> Option<EditOperation> {
        let op = self.redo_stack.pop()?;
        self.undo_stack.push(op.clone());
        Some(op)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
