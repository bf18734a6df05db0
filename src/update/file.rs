//! File message handlers: open, save, reload, OCR

use std::path::{Path, PathBuf};

use crate::commands::Cmd;
use crate::error::EditorError;
use crate::messages::{FileMsg, LoadedContent};
use crate::model::{display_name_for, AppModel, TabId, TabKind, WordFormat};
use crate::util::is_image_file;

pub fn update_file(model: &mut AppModel, msg: FileMsg) -> Option<Cmd> {
    match msg {
        FileMsg::Open(path) => open(model, path),
        FileMsg::Loaded { path, result } => loaded(model, path, result),
        FileMsg::Save => save(model, None),
        FileMsg::SaveAs(path) => save(model, Some(path)),
        FileMsg::Saved { tab, content, result } => saved(model, tab, &content, result),
        FileMsg::ExternallyModified(path) => externally_modified(model, path),
        FileMsg::Reloaded { path, result } => {
            reloaded(model, &path, result);
            None
        }
        FileMsg::Ocr(path) => {
            model.ui.set_status(format!("Recognizing text in {}...", display_name_for(&path)));
            Some(Cmd::PerformOcr { path })
        }
        FileMsg::OcrCompleted { path, result } => {
            match result {
                Ok(ocr) => {
                    let id = model.session.create_tab(None, Some(ocr.full_text), None, TabKind::Text);
                    model.session.switch_to(id);
                    model.on_active_tab_changed();
                    model.ui.notify(format!(
                        "Recognized text from {} in {} ms",
                        display_name_for(&path),
                        ocr.elapsed_ms
                    ));
                }
                Err(e) => model.report_error("OCR failed", e),
            }
            None
        }
    }
}

/// Pick the loader for `path` by extension
fn load_cmd(path: PathBuf) -> Cmd {
    if is_image_file(&path) {
        Cmd::ProcessImage { path }
    } else if let Some(format) = WordFormat::from_path(&path) {
        Cmd::ConvertDocument { path, format }
    } else {
        Cmd::LoadFile { path }
    }
}

fn open(model: &mut AppModel, path: PathBuf) -> Option<Cmd> {
    if let Some(existing) = model.session.find_by_path(&path) {
        if model.session.active_id() != Some(existing) {
            model.session.switch_to(existing);
            model.on_active_tab_changed();
        }
        return None;
    }
    if !model.loading.insert(path.clone()) {
        tracing::debug!(path = %path.display(), "already loading");
        return None;
    }

    model.ui.is_loading = true;
    model.ui.set_status(format!("Loading {}...", display_name_for(&path)));
    Some(load_cmd(path))
}

fn loaded(model: &mut AppModel, path: PathBuf, result: Result<LoadedContent, String>) -> Option<Cmd> {
    model.loading.remove(&path);
    model.ui.is_loading = !model.loading.is_empty();

    let content = match result {
        Ok(content) => content,
        Err(e) => {
            model.report_error(&format!("Failed to open {}", display_name_for(&path)), e);
            return None;
        }
    };

    let name = display_name_for(&path);
    let (text, kind) = match content {
        LoadedContent::Text(text) => (text, TabKind::Text),
        LoadedContent::Image(image) => (String::new(), TabKind::Image(image)),
        LoadedContent::Word { markdown, format } => {
            model
                .ui
                .notify(format!("Converted {} from {} to Markdown", name, format.as_str().to_uppercase()));
            (markdown, TabKind::WordImported { original_format: format })
        }
    };
    let watch = !kind.is_image() && model.config.watch_files;

    model.session.open_document(path.clone(), text, kind);
    model.on_active_tab_changed();
    model.ui.set_status(format!("Opened {}", name));
    if let Some(workspace) = &mut model.workspace {
        if path.starts_with(&workspace.root) {
            workspace.reveal_file(&path);
        }
    }

    watch.then_some(Cmd::WatchFile { path })
}

fn save(model: &mut AppModel, path_override: Option<PathBuf>) -> Option<Cmd> {
    let id = model.session.active_id()?;
    if model.active_kind().is_image() {
        model.ui.notify("Images cannot be saved from the editor");
        return None;
    }

    match model.session.save_request(id, path_override) {
        Ok(request) => {
            model.ui.is_saving = true;
            model.ui.set_status(format!("Saving {}...", display_name_for(&request.path)));
            Some(Cmd::SaveFile {
                tab: request.tab,
                path: request.path,
                content: request.content,
            })
        }
        Err(EditorError::SavePathRequired) => {
            // The host answers with SaveAs once the user picked a location
            model.ui.set_status(EditorError::SavePathRequired.to_string());
            None
        }
        Err(e) => {
            model.report_error("Save failed", e);
            None
        }
    }
}

fn saved(model: &mut AppModel, tab: TabId, content: &str, result: Result<PathBuf, String>) -> Option<Cmd> {
    model.ui.is_saving = false;
    let path = match result {
        Ok(path) => path,
        Err(e) => {
            model.report_error("Save failed", e);
            return None;
        }
    };

    let still_open = model.session.tab(tab).is_some();
    let clean = model.session.mark_saved(tab, path.clone(), content);
    let name = display_name_for(&path);
    if still_open && !clean {
        model.ui.notify(format!("Saved {}; newer edits are not saved yet", name));
    } else {
        model.ui.notify(format!("Saved {}", name));
    }

    let mut cmds = Vec::new();
    if model.config.watch_files && still_open {
        cmds.push(Cmd::WatchFile { path: path.clone() });
    }
    if let Some(dir) = listed_parent(model, &path) {
        cmds.push(Cmd::ReadDirectory { path: dir });
    }
    Cmd::batch(cmds).into_option()
}

/// Parent of `path` when the file browser currently shows that directory
fn listed_parent(model: &AppModel, path: &Path) -> Option<PathBuf> {
    let workspace = model.workspace.as_ref()?;
    let parent = path.parent()?;
    workspace.listings.contains_key(parent).then(|| parent.to_path_buf())
}

fn externally_modified(model: &mut AppModel, path: PathBuf) -> Option<Cmd> {
    let id = model.session.find_by_path(&path)?;
    let tab = model.session.tab(id)?;
    if tab.kind.is_image() {
        return None;
    }
    if tab.is_modified {
        // Never clobber unsaved edits
        model
            .ui
            .notify(format!("{} changed on disk; keeping your unsaved changes", tab.name));
        return None;
    }
    Some(Cmd::ReloadFile { path })
}

fn reloaded(model: &mut AppModel, path: &Path, result: Result<String, String>) {
    let Some(id) = model.session.find_by_path(path) else {
        return;
    };
    let content = match result {
        Ok(content) => content,
        Err(e) => {
            model.report_error(&format!("Failed to reload {}", display_name_for(path)), e);
            return;
        }
    };

    // Our own save also triggers the watcher
    if model.session.content_of(id).as_deref() == Some(content.as_str()) {
        return;
    }
    // Edited while the reload was in flight
    if model.session.tab(id).is_some_and(|t| t.is_modified) {
        return;
    }

    model.session.reload(id, content);
    if model.session.active_id() == Some(id) {
        model.search.invalidate();
        model.refresh_preview();
        model.refresh_outline_now();
    }
    model.ui.notify(format!("Reloaded {}", display_name_for(path)));
}
