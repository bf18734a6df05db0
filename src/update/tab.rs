//! Tab strip message handlers

use crate::commands::Cmd;
use crate::messages::TabMsg;
use crate::model::{AppModel, TabId};

pub fn update_tab(model: &mut AppModel, msg: TabMsg) -> Option<Cmd> {
    let before = model.session.active_id();

    let cmd = match msg {
        TabMsg::New => {
            model.session.new_document();
            None
        }
        TabMsg::Switch(id) => {
            model.session.switch_to(id);
            None
        }
        TabMsg::SwitchIndex(index) => {
            model.session.switch_to_index(index);
            None
        }
        TabMsg::Next => {
            cycle(model, 1);
            None
        }
        TabMsg::Previous => {
            cycle(model, -1);
            None
        }
        TabMsg::Close(id) => request_close(model, id),
        TabMsg::CloseActive => match model.session.active_id() {
            Some(id) => request_close(model, id),
            None => None,
        },
        TabMsg::ConfirmClose { save } => confirm_close(model, save),
        TabMsg::CancelClose => {
            if model.ui.pending_close.take().is_some() {
                model.ui.set_status("Close cancelled");
            }
            None
        }
    };

    if model.session.active_id() != before {
        model.on_active_tab_changed();
    }
    cmd
}

fn cycle(model: &mut AppModel, step: isize) {
    let len = model.session.len();
    if len < 2 {
        return;
    }
    let Some(active) = model.session.active_id() else {
        return;
    };
    let Some(index) = model.session.tabs().iter().position(|t| t.id == active) else {
        return;
    };
    let next = (index as isize + step).rem_euclid(len as isize) as usize;
    model.session.switch_to_index(next);
}

/// Close `id`, or ask first when it has unsaved changes
fn request_close(model: &mut AppModel, id: TabId) -> Option<Cmd> {
    let tab = model.session.tab(id)?;
    if !tab.is_modified {
        return close(model, id);
    }
    model.ui.set_status(format!("{} has unsaved changes. Save before closing?", tab.name));
    model.ui.pending_close = Some(id);
    None
}

fn confirm_close(model: &mut AppModel, save: bool) -> Option<Cmd> {
    let id = model.ui.pending_close.take()?;
    if !save {
        return close(model, id);
    }

    match model.session.save_request(id, None) {
        Ok(request) => {
            model.ui.is_saving = true;
            let write = Cmd::SaveFile {
                tab: request.tab,
                path: request.path,
                content: request.content,
            };
            let unwatch = close(model, id).unwrap_or_default();
            Cmd::batch(vec![write, unwatch]).into_option()
        }
        Err(e) => {
            // Untitled: the tab stays open until it has somewhere to go
            model.ui.set_status(e.to_string());
            None
        }
    }
}

fn close(model: &mut AppModel, id: TabId) -> Option<Cmd> {
    if model.ui.pending_close == Some(id) {
        model.ui.pending_close = None;
    }
    let path = model.session.tab(id).and_then(|t| t.file_path.clone());
    if !model.session.close_tab(id) {
        return None;
    }
    // Another tab may still show the same file
    let path = path.filter(|p| model.session.find_by_path(p).is_none())?;
    Some(Cmd::UnwatchFile { path })
}
