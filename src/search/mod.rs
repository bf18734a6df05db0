//! Find engine for the active buffer
//!
//! Patterns are compiled to a [`regex::Regex`]. Literal queries are escaped
//! first, whole-word queries are wrapped in `\b` assertions, and matching is
//! case-insensitive unless asked otherwise. Match offsets are byte offsets into
//! the UTF-8 buffer.

mod replace;

pub use replace::{replace_all, ReplaceOutcome, Splice};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Flags controlling how a query is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub regex: bool,
}

/// A located occurrence of a pattern (byte offset and byte length)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    pub offset: usize,
    pub length: usize,
}

impl Match {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Byte offset one past the last matched byte
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }

    /// The matched text, if the range is still valid for `buffer`
    pub fn text<'a>(&self, buffer: &'a str) -> Option<&'a str> {
        buffer.get(self.range())
    }
}

/// The query could not be compiled as a regular expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid search pattern `{pattern}`: {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

/// A compiled, non-empty query
#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: Regex,
    options: SearchOptions,
}

impl SearchPattern {
    /// Compile `query` under `options`.
    ///
    /// Returns `Ok(None)` for an empty query: nothing to look for is not an error.
    pub fn compile(query: &str, options: SearchOptions) -> Result<Option<Self>, PatternError> {
        if query.is_empty() {
            return Ok(None);
        }

        let body = if options.regex {
            query.to_string()
        } else {
            regex::escape(query)
        };
        let pattern = if options.whole_word {
            format!(r"\b(?:{})\b", body)
        } else {
            body
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|e| PatternError {
                pattern: query.to_string(),
                message: e.to_string(),
            })?;

        Ok(Some(Self { regex, options }))
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Every non-overlapping match, left to right.
    ///
    /// A zero-length match advances the scan by one character, so the loop
    /// always terminates; an empty match right after a non-empty one is still
    /// reported.
    pub fn find_all(&self, haystack: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut pos = 0;

        while pos <= haystack.len() {
            let Some(m) = self.regex.find_at(haystack, pos) else {
                break;
            };
            matches.push(Match::new(m.start(), m.len()));

            pos = if m.is_empty() {
                next_char_boundary(haystack, m.end())
            } else {
                m.end()
            };
        }

        matches
    }

    /// Whether `text` as a whole is one match of this pattern
    pub fn matches_whole(&self, text: &str) -> bool {
        self.regex
            .find(text)
            .is_some_and(|m| m.start() == 0 && m.end() == text.len())
    }
}

/// Byte index of the character after the one starting at `idx`.
/// Past the end of the string this returns `len + 1` to stop the scan.
fn next_char_boundary(s: &str, idx: usize) -> usize {
    match s[idx..].chars().next() {
        Some(ch) => idx + ch.len_utf8(),
        None => s.len() + 1,
    }
}

/// Find every match of `query` in `buffer`
pub fn find(buffer: &str, query: &str, options: SearchOptions) -> Result<Vec<Match>, PatternError> {
    Ok(SearchPattern::compile(query, options)?
        .map(|pattern| pattern.find_all(buffer))
        .unwrap_or_default())
}

/// Find state for the active tab: cached matches plus the current-match cursor
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    options: SearchOptions,
    pattern: Option<SearchPattern>,
    matches: Vec<Match>,
    current: Option<usize>,
}

impl SearchState {
    pub fn new(query: impl Into<String>, options: SearchOptions) -> Self {
        Self {
            query: query.into(),
            options,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Change the query; cached matches are dropped
    pub fn set_query(&mut self, query: impl Into<String>, options: SearchOptions) {
        self.query = query.into();
        self.options = options;
        self.pattern = None;
        self.invalidate();
    }

    /// Run the search over `buffer`, replacing any cached matches.
    /// Returns the number of matches.
    pub fn search(&mut self, buffer: &str) -> Result<usize, PatternError> {
        self.invalidate();
        self.pattern = SearchPattern::compile(&self.query, self.options)?;
        if let Some(pattern) = &self.pattern {
            self.matches = pattern.find_all(buffer);
        }
        tracing::trace!(
            query = %self.query,
            count = self.matches.len(),
            "search completed"
        );
        Ok(self.matches.len())
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Index of the selected match, `None` when nothing is selected
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_match(&self) -> Option<Match> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Advance to the next match, wrapping after the last one.
    /// Searches first when no matches are cached.
    pub fn find_next(&mut self, buffer: &str) -> Result<Option<Match>, PatternError> {
        if self.matches.is_empty() {
            self.search(buffer)?;
        }
        let len = self.matches.len();
        if len == 0 {
            return Ok(None);
        }

        let next = match self.current {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.current = Some(next);
        Ok(self.current_match())
    }

    /// Step back to the previous match, wrapping before the first one.
    /// Searches first when no matches are cached.
    pub fn find_previous(&mut self, buffer: &str) -> Result<Option<Match>, PatternError> {
        if self.matches.is_empty() {
            self.search(buffer)?;
        }
        let len = self.matches.len();
        if len == 0 {
            return Ok(None);
        }

        let prev = match self.current {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.current = Some(prev);
        Ok(self.current_match())
    }

    /// Drop cached matches and the current-match cursor
    pub fn invalidate(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    /// "3 of 12" style summary for the find bar
    pub fn summary(&self) -> String {
        match (self.current, self.matches.len()) {
            (_, 0) => "No results".to_string(),
            (Some(i), n) => format!("{} of {}", i + 1, n),
            (None, 1) => "1 result".to_string(),
            (None, n) => format!("{} results", n),
        }
    }
}
