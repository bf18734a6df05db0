//! Configuration system tests
//!
//! Tests for config paths and editor config loading/saving.

use std::fs;

use marknote::config::{EditorConfig, DEFAULT_OUTLINE_DEBOUNCE_MS};
use marknote::config_paths;
use marknote::model::{AppModel, ViewMode};
use tempfile::tempdir;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_config_dir_names_the_app() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("marknote"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Editor Config Tests
// ========================================================================

#[test]
fn test_defaults() {
    let config = EditorConfig::default();
    assert_eq!(config.outline_debounce_ms, DEFAULT_OUTLINE_DEBOUNCE_MS);
    assert_eq!(config.view_mode, ViewMode::Editor);
    assert!(config.watch_files);
    assert!(!config.search.regex);
    assert!(config.file_filters.extensions.contains(&".md".to_string()));
}

#[test]
fn test_partial_yaml_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "view_mode: split\nsearch:\n  case_sensitive: true\nocr:\n  endpoint: http://ocr.local/api\n",
    )
    .unwrap();

    let config = EditorConfig::load_from(&path);
    assert_eq!(config.view_mode, ViewMode::Split);
    assert!(config.search.case_sensitive);
    assert!(!config.search.whole_word);
    assert_eq!(config.ocr.endpoint, "http://ocr.local/api");
    assert_eq!(config.ocr.timeout_secs, 30);
    assert_eq!(config.history_limit, EditorConfig::default().history_limit);
}

#[test]
fn test_invalid_yaml_gives_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "view_mode: [not, a, mode").unwrap();
    assert_eq!(EditorConfig::load_from(&path), EditorConfig::default());
}

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = EditorConfig {
        outline_debounce_ms: 750,
        view_mode: ViewMode::Preview,
        ..EditorConfig::default()
    };
    config.save_to(&path).unwrap();
    assert_eq!(EditorConfig::load_from(&path), config);
}

#[test]
fn test_model_starts_in_configured_mode() {
    let config = EditorConfig {
        view_mode: ViewMode::Split,
        ..EditorConfig::default()
    };
    let model = AppModel::new(config);
    assert_eq!(model.view.mode(), ViewMode::Split);
    assert_eq!(model.session.len(), 1);
    assert_eq!(model.ui.status_message, "Ready");
}
