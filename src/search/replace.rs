//! Replace-one and replace-all over a buffer
//!
//! Replacement text is always inserted verbatim: `$1` in regex mode is literal.

use std::ops::Range;

use super::{Match, PatternError, SearchOptions, SearchPattern, SearchState};

/// A single contiguous buffer change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub offset: usize,
    pub removed: String,
    pub inserted: String,
}

impl Splice {
    fn at(buffer: &str, range: Range<usize>, inserted: &str) -> Self {
        Self {
            offset: range.start,
            removed: buffer[range].to_string(),
            inserted: inserted.to_string(),
        }
    }

    /// `buffer` with this splice applied
    pub fn apply(&self, buffer: &str) -> String {
        let end = self.offset + self.removed.len();
        let mut out = String::with_capacity(buffer.len() - self.removed.len() + self.inserted.len());
        out.push_str(&buffer[..self.offset]);
        out.push_str(&self.inserted);
        out.push_str(&buffer[end..]);
        out
    }

    /// Byte offset just after the inserted text
    pub fn end_after(&self) -> usize {
        self.offset + self.inserted.len()
    }
}

/// Result of a replace-one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// The buffer after the replace (unchanged when nothing was replaced)
    pub buffer: String,
    /// The change that was made, if any
    pub splice: Option<Splice>,
    /// Selection to show afterwards: collapsed after the inserted text, or the
    /// caller's selection when nothing changed
    pub selection: Range<usize>,
}

impl ReplaceOutcome {
    pub fn replaced(&self) -> bool {
        self.splice.is_some()
    }

    fn unchanged(buffer: &str, selection: Range<usize>) -> Self {
        Self {
            buffer: buffer.to_string(),
            splice: None,
            selection,
        }
    }
}

impl SearchState {
    /// Replace the active occurrence.
    ///
    /// When the selected text equals the current match's text it is replaced
    /// in place. Otherwise the search advances to the next occurrence and that
    /// one is replaced. Cached matches are dropped afterwards since every offset
    /// after the splice has shifted.
    pub fn replace_one(
        &mut self,
        buffer: &str,
        selection: Range<usize>,
        replacement: &str,
    ) -> Result<ReplaceOutcome, PatternError> {
        if self.matches.is_empty() {
            self.search(buffer)?;
        }
        if self.matches.is_empty() {
            return Ok(ReplaceOutcome::unchanged(buffer, selection));
        }
        let Some(pattern) = self.pattern.clone() else {
            return Ok(ReplaceOutcome::unchanged(buffer, selection));
        };

        let mut selection = selection;
        if self.current.is_none() {
            self.current = Some(0);
            selection = self.matches[0].range();
        }

        let current = self.current_match().and_then(|m| m.text(buffer));
        let target = if selection_is_current(&pattern, buffer, &selection, current) {
            selection
        } else {
            match self.find_next(buffer)? {
                Some(m) => m.range(),
                None => return Ok(ReplaceOutcome::unchanged(buffer, selection)),
            }
        };

        let splice = Splice::at(buffer, target, replacement);
        let new_buffer = splice.apply(buffer);
        let caret = splice.end_after();
        self.invalidate();

        tracing::debug!(offset = splice.offset, removed = splice.removed.len(), "replaced occurrence");
        Ok(ReplaceOutcome {
            buffer: new_buffer,
            splice: Some(splice),
            selection: caret..caret,
        })
    }
}

/// Whether the selected text is the current match's text. In regex mode the
/// pattern must also match the whole selection.
fn selection_is_current(
    pattern: &SearchPattern,
    buffer: &str,
    selection: &Range<usize>,
    current: Option<&str>,
) -> bool {
    if selection.is_empty() {
        return false;
    }
    let (Some(selected), Some(current)) = (buffer.get(selection.clone()), current) else {
        return false;
    };
    let options = pattern.options();
    let same = if options.case_sensitive {
        selected == current
    } else {
        selected.to_lowercase() == current.to_lowercase()
    };
    same && (!options.regex || pattern.matches_whole(selected))
}

/// Replace every occurrence of `query` in `buffer` in a single pass.
///
/// Returns the new buffer and the number of replacements. With no occurrence
/// the buffer comes back unchanged with a count of zero.
pub fn replace_all(
    buffer: &str,
    query: &str,
    replacement: &str,
    options: SearchOptions,
) -> Result<(String, usize), PatternError> {
    let Some(pattern) = SearchPattern::compile(query, options)? else {
        return Ok((buffer.to_string(), 0));
    };
    let matches = pattern.find_all(buffer);
    if matches.is_empty() {
        return Ok((buffer.to_string(), 0));
    }

    Ok((splice_all(buffer, &matches, replacement), matches.len()))
}

/// Splice `replacement` over every match. Matches must be sorted and disjoint.
fn splice_all(buffer: &str, matches: &[Match], replacement: &str) -> String {
    let mut out = String::with_capacity(buffer.len());
    let mut last = 0;
    for m in matches {
        out.push_str(&buffer[last..m.offset]);
        out.push_str(replacement);
        last = m.end();
    }
    out.push_str(&buffer[last..]);
    out
}
