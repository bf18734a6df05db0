//! View mode message handlers

use crate::commands::Cmd;
use crate::messages::ViewMsg;
use crate::model::AppModel;

pub fn update_view(model: &mut AppModel, msg: ViewMsg) -> Option<Cmd> {
    let kind = model.active_kind();
    match msg {
        ViewMsg::SetMode(mode) => {
            let refresh = model.view.set_mode(mode, &kind);
            model.apply_preview_refresh(refresh);
        }
        ViewMsg::Cycle => {
            let refresh = model.view.cycle(&kind);
            model.apply_preview_refresh(refresh);
        }
        ViewMsg::ToggleSidebar => {
            model.ui.sidebar_visible = !model.ui.sidebar_visible;
        }
    }
    None
}
