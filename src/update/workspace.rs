//! Workspace message handlers (file tree sidebar)

use crate::commands::Cmd;
use crate::messages::{FileMsg, WorkspaceMsg};
use crate::model::{AppModel, Workspace};

use super::file::update_file;

/// Handle workspace messages (file tree, sidebar)
pub fn update_workspace(model: &mut AppModel, msg: WorkspaceMsg) -> Option<Cmd> {
    match msg {
        WorkspaceMsg::OpenFolder(root) => {
            tracing::info!(root = %root.display(), "opening folder");
            model.workspace = Some(Workspace::new(root.clone()));
            model.ui.sidebar_visible = true;
            model.ui.set_status(format!("Opened folder {}", root.display()));
            Some(Cmd::ReadDirectory { path: root })
        }

        WorkspaceMsg::Refresh => {
            let workspace = model.workspace.as_ref()?;
            let mut dirs: Vec<_> = workspace.expanded_folders.iter().cloned().collect();
            dirs.sort();
            Cmd::batch(dirs.into_iter().map(|path| Cmd::ReadDirectory { path }).collect()).into_option()
        }

        WorkspaceMsg::ToggleFolder(path) => {
            let workspace = model.workspace.as_mut()?;
            let expanded = workspace.toggle_folder(&path);
            // Read on first expansion; later refreshes come from Refresh
            (expanded && workspace.listing(&path).is_none()).then_some(Cmd::ReadDirectory { path })
        }

        WorkspaceMsg::Listed { dir, result } => {
            let Some(workspace) = model.workspace.as_mut() else {
                return None;
            };
            if !dir.starts_with(&workspace.root) {
                tracing::debug!(dir = %dir.display(), "listing outside workspace ignored");
                return None;
            }
            match result {
                Ok(entries) => {
                    workspace.set_listing(dir, entries, &model.config.file_filters);
                }
                Err(e) => model.report_error("Failed to read folder", e),
            }
            None
        }

        WorkspaceMsg::OpenEntry(path) => {
            if let Some(workspace) = model.workspace.as_mut() {
                workspace.selected_item = Some(path.clone());
            }
            update_file(model, FileMsg::Open(path))
        }
    }
}
