//! Find/replace message handlers

use crate::commands::Cmd;
use crate::error::EditorError;
use crate::messages::SearchMsg;
use crate::model::AppModel;
use crate::search::{replace_all, SearchOptions};

use super::after_edit;

pub fn update_search(model: &mut AppModel, msg: SearchMsg) -> Option<Cmd> {
    match msg {
        SearchMsg::Open { replace } => {
            let find = &mut model.ui.find_replace;
            find.visible = true;
            find.replace_mode = replace;

            // Seed the query from a single-line selection
            let selected = model.session.editor().selected_text();
            if !selected.is_empty() && !selected.contains('\n') {
                model.ui.find_replace.query = selected;
            }
            apply_query(model);
            None
        }
        SearchMsg::Close => {
            model.ui.find_replace.visible = false;
            model.search.invalidate();
            None
        }
        SearchMsg::SetQuery(query) => {
            model.ui.find_replace.query = query;
            apply_query(model);
            None
        }
        SearchMsg::SetReplacement(replacement) => {
            model.ui.find_replace.replacement = replacement;
            None
        }
        SearchMsg::SetOptions(options) => set_options(model, options),
        SearchMsg::ToggleCaseSensitive => {
            let mut options = model.ui.find_replace.options;
            options.case_sensitive = !options.case_sensitive;
            set_options(model, options)
        }
        SearchMsg::ToggleWholeWord => {
            let mut options = model.ui.find_replace.options;
            options.whole_word = !options.whole_word;
            set_options(model, options)
        }
        SearchMsg::ToggleRegex => {
            let mut options = model.ui.find_replace.options;
            options.regex = !options.regex;
            set_options(model, options)
        }
        SearchMsg::FindNext => {
            find_step(model, true);
            None
        }
        SearchMsg::FindPrevious => {
            find_step(model, false);
            None
        }
        SearchMsg::ReplaceOne => replace_one(model),
        SearchMsg::ReplaceAll => replace_everything(model),
    }
}

fn set_options(model: &mut AppModel, options: SearchOptions) -> Option<Cmd> {
    model.ui.find_replace.options = options;
    apply_query(model);
    None
}

/// Push the find bar's query into the search state and count matches
fn apply_query(model: &mut AppModel) {
    let query = model.ui.find_replace.query.clone();
    let options = model.ui.find_replace.options;
    model.search.set_query(query, options);

    if model.search.query().is_empty() {
        model.ui.set_status("");
        return;
    }
    let text = model.active_text();
    match model.search.search(&text) {
        Ok(_) => {
            let summary = model.search.summary();
            model.ui.set_status(summary);
        }
        Err(e) => model.report_error("Invalid pattern", e),
    }
}

fn find_step(model: &mut AppModel, forward: bool) {
    if model.search.query().is_empty() {
        return;
    }
    let text = model.active_text();
    let result = if forward {
        model.search.find_next(&text)
    } else {
        model.search.find_previous(&text)
    };

    match result {
        Ok(Some(found)) => {
            model.session.editor_mut().select(found.range());
            let summary = model.search.summary();
            model.ui.set_status(summary);
        }
        Ok(None) => {
            let err = EditorError::NotFound(model.search.query().to_string());
            model.ui.set_status(err.to_string());
        }
        Err(e) => model.report_error("Invalid pattern", e),
    }
}

fn replace_one(model: &mut AppModel) -> Option<Cmd> {
    if model.search.query().is_empty() || model.active_kind().is_image() {
        return None;
    }
    let text = model.active_text();
    let selection = model.session.editor().selection.range();
    let replacement = model.ui.find_replace.replacement.clone();

    let outcome = match model.search.replace_one(&text, selection, &replacement) {
        Ok(outcome) => outcome,
        Err(e) => {
            model.report_error("Invalid pattern", e);
            return None;
        }
    };

    let Some(splice) = outcome.splice else {
        let err = EditorError::NotFound(model.search.query().to_string());
        model.ui.set_status(err.to_string());
        return None;
    };

    let editor = model.session.editor_mut();
    editor.replace_range(splice.offset..splice.offset + splice.removed.len(), &splice.inserted);
    editor.select(outcome.selection);
    model.ui.set_status("Replaced 1 occurrence");
    after_edit(model)
}

fn replace_everything(model: &mut AppModel) -> Option<Cmd> {
    if model.search.query().is_empty() || model.active_kind().is_image() {
        return None;
    }
    let text = model.active_text();
    let query = model.search.query().to_string();
    let replacement = model.ui.find_replace.replacement.clone();

    match replace_all(&text, &query, &replacement, model.search.options()) {
        Ok((_, 0)) => {
            model.ui.set_status(EditorError::NotFound(query).to_string());
            None
        }
        Ok((new_text, count)) => {
            model.session.editor_mut().replace_all_text(&new_text);
            model.ui.set_status(format!("Replaced {} occurrences", count));
            after_edit(model)
        }
        Err(e) => {
            model.report_error("Invalid pattern", e);
            None
        }
    }
}
