//! Edit message handlers (typing, cursor, undo/redo)

use crate::commands::Cmd;
use crate::messages::EditMsg;
use crate::model::AppModel;

use super::after_edit;

pub fn update_edit(model: &mut AppModel, msg: EditMsg) -> Option<Cmd> {
    // Image tabs have no editable buffer
    if model.active_kind().is_image() && is_mutation(&msg) {
        tracing::debug!("ignoring edit on image tab");
        return None;
    }

    let editor = model.session.editor_mut();
    match msg {
        EditMsg::Insert(text) => {
            editor.insert_text(&text);
            after_edit(model)
        }
        EditMsg::ReplaceRange { range, text } => {
            let len = editor.buffer.len_bytes();
            let start = range.start.min(len);
            let end = range.end.clamp(start, len);
            editor.replace_range(start..end, &text);
            after_edit(model)
        }
        EditMsg::SetText(text) => {
            editor.replace_all_text(&text);
            after_edit(model)
        }
        EditMsg::SetCursor(position) => {
            editor.set_cursor(position);
            None
        }
        EditMsg::Select(range) => {
            editor.select(range);
            None
        }
        EditMsg::Scroll(offset) => {
            editor.scroll = offset.max(0.0);
            None
        }
        EditMsg::Undo => {
            if editor.undo() {
                after_edit(model)
            } else {
                model.ui.notify("Nothing to undo");
                None
            }
        }
        EditMsg::Redo => {
            if editor.redo() {
                after_edit(model)
            } else {
                model.ui.notify("Nothing to redo");
                None
            }
        }
    }
}

fn is_mutation(msg: &EditMsg) -> bool {
    matches!(
        msg,
        EditMsg::Insert(_)
            | EditMsg::ReplaceRange { .. }
            | EditMsg::SetText(_)
            | EditMsg::Undo
            | EditMsg::Redo
    )
}
