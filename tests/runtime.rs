//! Integration tests for the runtime: commands executed on worker threads
//! with results fed back through `update`

mod common;

use std::fs;
use std::time::Duration;

use common::{docx_heading, test_config, write_docx, write_file};
use marknote::messages::{EditMsg, FileMsg, Msg, WorkspaceMsg};
use marknote::model::{AppModel, TabKind};
use marknote::runtime::Runtime;
use tempfile::tempdir;

const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

fn runtime() -> Runtime {
    Runtime::new(AppModel::new(test_config()))
}

#[test]
fn test_open_file_loads_into_new_tab() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "notes.md", "# Notes\n## Todo\n");

    let mut rt = runtime();
    rt.dispatch(Msg::File(FileMsg::Open(path.clone())));
    assert_eq!(rt.in_flight(), 1);
    assert!(rt.run_until_idle(IDLE_TIMEOUT));

    let model = rt.model();
    assert_eq!(model.session.len(), 2);
    assert_eq!(model.session.active_tab().unwrap().name, "notes.md");
    assert_eq!(model.active_text(), "# Notes\n## Todo\n");
    assert_eq!(model.outline.roots[0].children[0].text, "Todo");
    assert!(!model.ui.is_loading);
}

#[test]
fn test_open_missing_file_reports_error() {
    let dir = tempdir().unwrap();
    let mut rt = runtime();
    rt.dispatch(Msg::File(FileMsg::Open(dir.path().join("gone.md"))));
    assert!(rt.run_until_idle(IDLE_TIMEOUT));

    let model = rt.model();
    assert_eq!(model.session.len(), 1);
    assert!(model.ui.status_message.starts_with("Failed to open gone.md"));
}

#[test]
fn test_open_docx_then_save_writes_markdown_sibling() {
    let dir = tempdir().unwrap();
    let docx = dir.path().join("spec.docx");
    write_docx(&docx, &docx_heading(1, "Spec"));

    let mut rt = runtime();
    rt.dispatch(Msg::File(FileMsg::Open(docx.clone())));
    assert!(rt.run_until_idle(IDLE_TIMEOUT));
    assert_eq!(rt.model().active_text(), "# Spec");

    rt.dispatch(Msg::File(FileMsg::Save));
    assert!(rt.run_until_idle(IDLE_TIMEOUT));

    let md = dir.path().join("spec.md");
    assert_eq!(fs::read_to_string(&md).unwrap(), "# Spec");
    let tab = rt.model().session.active_tab().unwrap();
    assert_eq!(tab.kind, TabKind::Text);
    assert_eq!(tab.file_path.as_deref(), Some(md.as_path()));
}

#[test]
fn test_edit_save_clears_modified() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "a.md", "hello");

    let mut rt = runtime();
    rt.dispatch(Msg::File(FileMsg::Open(path.clone())));
    assert!(rt.run_until_idle(IDLE_TIMEOUT));

    rt.dispatch(Msg::Edit(EditMsg::Insert("> ".to_string())));
    assert!(rt.model().session.active_tab().unwrap().is_modified);

    rt.dispatch(Msg::File(FileMsg::Save));
    assert!(rt.run_until_idle(IDLE_TIMEOUT));

    assert_eq!(fs::read_to_string(&path).unwrap(), "> hello");
    assert!(!rt.model().session.active_tab().unwrap().is_modified);
}

#[test]
fn test_rapid_edits_refresh_outline_once() {
    let mut rt = runtime();
    for heading in ["# One\n", "# Two\n", "# Three\n"] {
        rt.dispatch(Msg::Edit(EditMsg::Insert(heading.to_string())));
    }
    // Outline is stale until the debounce fires
    assert!(rt.model().outline.is_empty());
    assert_eq!(rt.in_flight(), 3);

    assert!(rt.run_until_idle(IDLE_TIMEOUT));
    let titles: Vec<&str> = rt.model().outline.roots.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two", "Three"]);
    assert_eq!(rt.model().outline.revision, rt.model().session.editor().revision);
}

#[test]
fn test_open_folder_lists_root() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "z.md", "");
    write_file(dir.path(), "a.md", "");
    fs::create_dir(dir.path().join("sub")).unwrap();

    let mut rt = runtime();
    rt.dispatch(Msg::Workspace(WorkspaceMsg::OpenFolder(dir.path().to_path_buf())));
    assert!(rt.run_until_idle(IDLE_TIMEOUT));

    let workspace = rt.model().workspace.as_ref().unwrap();
    let names: Vec<&str> = workspace
        .listing(dir.path())
        .unwrap()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["sub", "a.md", "z.md"]);
}

#[test]
fn test_open_image_forces_split_view() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pixel.png");
    image::RgbImage::new(2, 2).save(&path).unwrap();

    let mut rt = runtime();
    rt.dispatch(Msg::File(FileMsg::Open(path)));
    assert!(rt.run_until_idle(IDLE_TIMEOUT));

    let model = rt.model();
    match &model.active_kind() {
        TabKind::Image(data) => assert_eq!(data.dimensions, Some((2, 2))),
        other => panic!("expected image tab, got {:?}", other),
    }
    assert_eq!(model.view.mode(), marknote::model::ViewMode::Split);
}

#[test]
fn test_idle_runtime_returns_immediately() {
    let mut rt = runtime();
    assert!(rt.run_until_idle(Duration::from_millis(1)));
    assert_eq!(rt.poll(), 0);

    rt.model_mut().ui.set_status("Ready");
    assert_eq!(rt.into_model().ui.visible_status(), "Ready");
}
