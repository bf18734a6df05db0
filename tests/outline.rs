//! Integration tests for outline extraction and navigation

mod common;

use common::test_model;
use marknote::commands::Cmd;
use marknote::messages::{EditMsg, Msg, OutlineMsg};
use marknote::model::Position;
use marknote::outline::{extract_outline, OutlineData};
use marknote::update::update;

fn titles(nodes: &[marknote::outline::OutlineNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.text.as_str()).collect()
}

#[test]
fn test_sibling_and_child_headings() {
    let roots = extract_outline("# A\n## B\n# C\n");
    assert_eq!(titles(&roots), vec!["A", "C"]);
    assert_eq!(titles(&roots[0].children), vec!["B"]);
    assert!(roots[1].children.is_empty());
    assert_eq!(roots[0].children[0].line, 1);
}

#[test]
fn test_skipped_levels_nest_under_nearest_shallower() {
    let roots = extract_outline("# Top\n### Deep\n## Mid\n");
    assert_eq!(titles(&roots[0].children), vec!["Deep", "Mid"]);
}

#[test]
fn test_leading_deeper_heading_is_a_root() {
    let roots = extract_outline("### Intro\n# Main\n## Part\n");
    assert_eq!(titles(&roots), vec!["Intro", "Main"]);
    assert_eq!(titles(&roots[1].children), vec!["Part"]);
}

#[test]
fn test_non_headings_are_ignored() {
    let text = "#NoSpace\n####### seven\n#  \nplain\n  # indented\n## Real ##\n";
    let roots = extract_outline(text);
    assert_eq!(titles(&roots), vec!["Real ##"]);
    assert_eq!(roots[0].line, 5);
}

#[test]
fn test_crlf_lines() {
    let roots = extract_outline("# One\r\n## Two\r\n");
    assert_eq!(titles(&roots), vec!["One"]);
    assert_eq!(titles(&roots[0].children), vec!["Two"]);
}

#[test]
fn test_anchor_lookup_and_flatten_order() {
    let outline = OutlineData::from_text("# Getting Started\n## Install it\n# FAQ\n", 7);
    let flat: Vec<(usize, &str)> = outline
        .flatten()
        .into_iter()
        .map(|(depth, n)| (depth, n.text.as_str()))
        .collect();
    assert_eq!(flat, vec![(0, "Getting Started"), (1, "Install it"), (0, "FAQ")]);
    assert_eq!(outline.line_of_anchor("install-it"), Some(1));
    assert_eq!(outline.line_of_anchor("missing"), None);
    assert_eq!(outline.revision, 7);
}

#[test]
fn test_outline_built_for_initial_buffer() {
    let model = test_model("# A\ntext\n## B\n");
    assert_eq!(model.outline.roots.len(), 1);
    assert_eq!(model.outline.roots[0].children[0].text, "B");
}

#[test]
fn test_stale_refresh_token_is_ignored() {
    let mut model = test_model("");
    let Some(Cmd::DebouncedOutline { token: first, .. }) =
        update(&mut model, Msg::Edit(EditMsg::Insert("# A\n".to_string())))
    else {
        panic!("expected debounced outline command");
    };
    let Some(Cmd::DebouncedOutline { token: second, .. }) =
        update(&mut model, Msg::Edit(EditMsg::Insert("# B\n".to_string())))
    else {
        panic!("expected debounced outline command");
    };
    assert_ne!(first, second);

    update(&mut model, Msg::Outline(OutlineMsg::Refresh { token: first }));
    assert!(model.outline.is_empty());

    update(&mut model, Msg::Outline(OutlineMsg::Refresh { token: second }));
    assert_eq!(titles(&model.outline.roots), vec!["A", "B"]);
}

#[test]
fn test_jump_to_line_moves_cursor() {
    let mut model = test_model("# A\nbody\n## B\n");
    update(&mut model, Msg::Outline(OutlineMsg::JumpToLine(2)));
    assert_eq!(model.session.cursor(), Position::new(2, 0));

    // Out of range is ignored
    update(&mut model, Msg::Outline(OutlineMsg::JumpToLine(99)));
    assert_eq!(model.session.cursor(), Position::new(2, 0));
}

#[test]
fn test_jump_to_anchor() {
    let mut model = test_model("intro\n\n# Usage Notes\n");
    update(
        &mut model,
        Msg::Outline(OutlineMsg::JumpToAnchor("usage-notes".to_string())),
    );
    assert_eq!(model.session.cursor(), Position::new(2, 0));
}
