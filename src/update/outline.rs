//! Outline message handlers

use crate::commands::Cmd;
use crate::messages::OutlineMsg;
use crate::model::{AppModel, Position};

pub fn update_outline(model: &mut AppModel, msg: OutlineMsg) -> Option<Cmd> {
    match msg {
        OutlineMsg::Refresh { token } => {
            // A newer edit rescheduled the refresh; its own timer will run
            if !model.outline_debounce.is_current(token) {
                tracing::trace!(token, "skipping superseded outline refresh");
                return None;
            }
            if model.outline.revision != model.session.editor().revision {
                model.refresh_outline_now();
            }
            None
        }
        OutlineMsg::JumpToLine(line) => {
            jump_to(model, line);
            None
        }
        OutlineMsg::JumpToAnchor(anchor) => {
            match model.outline.line_of_anchor(&anchor) {
                Some(line) => jump_to(model, line),
                None => tracing::debug!(%anchor, "no heading with anchor"),
            }
            None
        }
    }
}

fn jump_to(model: &mut AppModel, line: usize) {
    let editor = model.session.editor_mut();
    if line >= editor.line_count() {
        return;
    }
    editor.set_cursor(Position::new(line, 0));
}
