//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. Errors never
//! escape: each handler turns them into a status message.

mod app;
mod edit;
mod file;
mod outline;
mod search;
mod tab;
mod view;
mod workspace;

use tracing::{debug, span, Level};

use crate::commands::Cmd;
use crate::messages::{AppMsg, Msg};
use crate::model::AppModel;

pub use app::update_app;
pub use edit::update_edit;
pub use file::update_file;
pub use outline::update_outline;
pub use search::update_search;
pub use tab::update_tab;
pub use view::update_view;
pub use workspace::update_workspace;

/// Main update function - dispatches to sub-handlers
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    // Skip logging for the periodic tick
    let is_noisy = matches!(&msg, Msg::App(AppMsg::Tick));
    let _span = if is_noisy {
        None
    } else {
        let name = msg_type_name(&msg);
        debug!(target: "message", msg = %name, "processing");
        Some(span!(Level::DEBUG, "update", msg = %name).entered())
    };

    match msg {
        Msg::Tab(m) => tab::update_tab(model, m),
        Msg::Edit(m) => edit::update_edit(model, m),
        Msg::Search(m) => search::update_search(model, m),
        Msg::View(m) => view::update_view(model, m),
        Msg::Outline(m) => outline::update_outline(model, m),
        Msg::File(m) => file::update_file(model, m),
        Msg::Workspace(m) => workspace::update_workspace(model, m),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Loaded payloads can be large, so only their variant is shown.
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::FileMsg;

    match msg {
        Msg::Tab(m) => format!("Tab::{:?}", m),
        Msg::Edit(m) => format!("Edit::{:?}", m),
        Msg::Search(m) => format!("Search::{:?}", m),
        Msg::View(m) => format!("View::{:?}", m),
        Msg::Outline(m) => format!("Outline::{:?}", m),
        Msg::File(FileMsg::Loaded { path, result }) => {
            format!("File::Loaded({}, ok={})", path.display(), result.is_ok())
        }
        Msg::File(FileMsg::Reloaded { path, result }) => {
            format!("File::Reloaded({}, ok={})", path.display(), result.is_ok())
        }
        Msg::File(m) => format!("File::{:?}", m),
        Msg::Workspace(m) => format!("Workspace::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}

/// Common follow-up after the live buffer changed
pub(crate) fn after_edit(model: &mut AppModel) -> Option<Cmd> {
    model.session.mark_active_modified();
    model.search.invalidate();
    model.refresh_preview();
    Some(model.schedule_outline())
}
