//! Integration tests for find and replace
//!
//! Covers the search engine directly and the find bar driven through `update`.

mod common;

use common::{buffer_to_string, select, test_model};
use marknote::messages::{EditMsg, Msg, SearchMsg};
use marknote::search::{find, replace_all, Match, SearchOptions, SearchState};
use marknote::update::update;

fn opts(case_sensitive: bool, whole_word: bool, regex: bool) -> SearchOptions {
    SearchOptions {
        case_sensitive,
        whole_word,
        regex,
    }
}

fn search(model: &mut marknote::AppModel, msg: SearchMsg) {
    update(model, Msg::Search(msg));
}

// ============================================================================
// Search engine
// ============================================================================

#[test]
fn test_literal_matches_are_non_overlapping_positions() {
    let matches = find("abcabcab", "abc", SearchOptions::default()).unwrap();
    assert_eq!(matches, vec![Match::new(0, 3), Match::new(3, 3)]);

    let matches = find("aaaa", "aa", SearchOptions::default()).unwrap();
    assert_eq!(matches, vec![Match::new(0, 2), Match::new(2, 2)]);
}

#[test]
fn test_case_insensitive_by_default() {
    let matches = find("Foo foo FOO", "foo", SearchOptions::default()).unwrap();
    assert_eq!(matches.len(), 3);

    let matches = find("Foo foo FOO", "foo", opts(true, false, false)).unwrap();
    assert_eq!(matches, vec![Match::new(4, 3)]);
}

#[test]
fn test_whole_word() {
    let matches = find("cat concat cat.", "cat", opts(false, true, false)).unwrap();
    assert_eq!(matches, vec![Match::new(0, 3), Match::new(11, 3)]);
}

#[test]
fn test_literal_mode_escapes_metacharacters() {
    let matches = find("a.b axb", "a.b", SearchOptions::default()).unwrap();
    assert_eq!(matches, vec![Match::new(0, 3)]);

    let matches = find("a.b axb", "a.b", opts(false, false, true)).unwrap();
    assert_eq!(matches.len(), 2);
}

#[test]
fn test_invalid_regex_is_an_error_not_zero_matches() {
    let err = find("text", "(unclosed", opts(false, false, true)).unwrap_err();
    assert_eq!(err.pattern, "(unclosed");
    assert!(err.to_string().contains("(unclosed"));
}

#[test]
fn test_empty_query_has_no_matches() {
    assert!(find("anything", "", SearchOptions::default()).unwrap().is_empty());
}

#[test]
fn test_zero_length_matches_terminate() {
    let matches = find("ab", "x*", opts(false, false, true)).unwrap();
    let offsets: Vec<usize> = matches.iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![0, 1, 2]);
    assert!(matches.iter().all(|m| m.length == 0));
}

#[test]
fn test_zero_length_matches_respect_char_boundaries() {
    let matches = find("é", "", opts(false, false, true)).unwrap();
    // Empty query is never compiled
    assert!(matches.is_empty());

    let matches = find("éa", "x*", opts(false, false, true)).unwrap();
    let offsets: Vec<usize> = matches.iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![0, 2, 3]);
}

#[test]
fn test_find_next_cycles_back_to_start() {
    let buffer = "one two one two one";
    let mut state = SearchState::new("one", SearchOptions::default());
    let first = state.find_next(buffer).unwrap();
    assert_eq!(state.current_index(), Some(0));

    let count = state.matches().len();
    for _ in 0..count {
        state.find_next(buffer).unwrap();
    }
    assert_eq!(state.current_index(), Some(0));
    assert_eq!(state.current_match(), first);
}

#[test]
fn test_find_previous_from_nothing_selects_last() {
    let mut state = SearchState::new("x", SearchOptions::default());
    let found = state.find_previous("x_x_x").unwrap();
    assert_eq!(found, Some(Match::new(4, 1)));
    assert_eq!(state.summary(), "3 of 3");
}

// ============================================================================
// Replace engine
// ============================================================================

#[test]
fn test_replace_all_counts_every_occurrence() {
    assert_eq!(
        replace_all("aaa", "a", "b", SearchOptions::default()).unwrap(),
        ("bbb".to_string(), 3)
    );
}

#[test]
fn test_replace_all_without_occurrences_is_unchanged() {
    assert_eq!(
        replace_all("hello", "zzz", "y", SearchOptions::default()).unwrap(),
        ("hello".to_string(), 0)
    );
}

#[test]
fn test_replace_all_inserts_replacement_verbatim() {
    let (out, n) = replace_all("2024-01", r"(\d+)-(\d+)", "$2/$1", opts(false, false, true)).unwrap();
    assert_eq!(out, "$2/$1");
    assert_eq!(n, 1);
}

#[test]
fn test_replace_all_invalid_pattern() {
    assert!(replace_all("text", "[", "x", opts(false, false, true)).is_err());
}

#[test]
fn test_replace_one_uses_selected_occurrence() {
    let buffer = "foo bar foo";
    let mut state = SearchState::new("foo", SearchOptions::default());
    state.find_next(buffer).unwrap();
    state.find_next(buffer).unwrap();

    let outcome = state.replace_one(buffer, 8..11, "baz").unwrap();
    assert_eq!(outcome.buffer, "foo bar baz");
    assert_eq!(outcome.selection, 11..11);
}

#[test]
fn test_replace_one_advances_when_selection_is_not_a_match() {
    let buffer = "foo bar foo";
    let mut state = SearchState::new("foo", SearchOptions::default());
    state.find_next(buffer).unwrap();

    // Selection covers "bar", so the next occurrence is replaced instead
    let outcome = state.replace_one(buffer, 4..7, "X").unwrap();
    assert_eq!(outcome.buffer, "foo bar X");
}

#[test]
fn test_replace_one_without_matches_changes_nothing() {
    let mut state = SearchState::new("zzz", SearchOptions::default());
    let outcome = state.replace_one("abc", 1..2, "y").unwrap();
    assert!(!outcome.replaced());
    assert_eq!(outcome.buffer, "abc");
    assert_eq!(outcome.selection, 1..2);
}

// ============================================================================
// Find bar through update()
// ============================================================================

#[test]
fn test_open_seeds_query_from_selection() {
    let mut model = test_model("hello world hello");
    select(&mut model, 0, 5);
    search(&mut model, SearchMsg::Open { replace: false });

    assert!(model.ui.find_replace.visible);
    assert_eq!(model.ui.find_replace.query, "hello");
    assert_eq!(model.search.matches().len(), 2);
    assert_eq!(model.ui.status_message, "2 results");
}

#[test]
fn test_find_next_selects_match_in_editor() {
    let mut model = test_model("alpha beta alpha");
    search(&mut model, SearchMsg::SetQuery("alpha".to_string()));
    search(&mut model, SearchMsg::FindNext);
    search(&mut model, SearchMsg::FindNext);

    assert_eq!(model.session.editor().selection.range(), 11..16);
    assert_eq!(model.ui.status_message, "2 of 2");
}

#[test]
fn test_find_next_reports_not_found() {
    let mut model = test_model("alpha");
    search(&mut model, SearchMsg::SetQuery("omega".to_string()));
    search(&mut model, SearchMsg::FindNext);
    assert!(model.ui.status_message.contains("omega"));
}

#[test]
fn test_invalid_pattern_reported_in_status() {
    let mut model = test_model("text");
    search(&mut model, SearchMsg::ToggleRegex);
    search(&mut model, SearchMsg::SetQuery("(".to_string()));
    assert!(model.ui.status_message.starts_with("Invalid pattern"));
}

#[test]
fn test_toggle_case_sensitive_recounts() {
    let mut model = test_model("Word word");
    search(&mut model, SearchMsg::SetQuery("word".to_string()));
    assert_eq!(model.search.matches().len(), 2);

    search(&mut model, SearchMsg::ToggleCaseSensitive);
    assert_eq!(model.search.matches().len(), 1);
}

#[test]
fn test_replace_one_through_update_is_undoable() {
    let mut model = test_model("foo foo");
    search(&mut model, SearchMsg::Open { replace: true });
    search(&mut model, SearchMsg::SetQuery("foo".to_string()));
    search(&mut model, SearchMsg::SetReplacement("bar".to_string()));

    let cmd = update(&mut model, Msg::Search(SearchMsg::ReplaceOne));
    assert!(cmd.is_some(), "edit schedules an outline refresh");
    assert_eq!(buffer_to_string(&model), "bar foo");
    assert!(model.session.active_tab().unwrap().is_modified);

    update(&mut model, Msg::Edit(EditMsg::Undo));
    assert_eq!(buffer_to_string(&model), "foo foo");
}

#[test]
fn test_replace_all_through_update() {
    let mut model = test_model("a-a-a");
    search(&mut model, SearchMsg::SetQuery("a".to_string()));
    search(&mut model, SearchMsg::SetReplacement("bb".to_string()));
    search(&mut model, SearchMsg::ReplaceAll);

    assert_eq!(buffer_to_string(&model), "bb-bb-bb");
    assert_eq!(model.ui.status_message, "Replaced 3 occurrences");
}

#[test]
fn test_replace_all_with_no_match_leaves_buffer() {
    let mut model = test_model("abc");
    search(&mut model, SearchMsg::SetQuery("z".to_string()));
    let cmd = update(&mut model, Msg::Search(SearchMsg::ReplaceAll));
    assert!(cmd.is_none());
    assert_eq!(buffer_to_string(&model), "abc");
    assert!(!model.session.active_tab().unwrap().is_modified);
}
