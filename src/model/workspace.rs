//! Workspace - the opened folder shown in the file browser
//!
//! Listing comes from [`crate::bridge::file::read_directory`]; this module
//! filters it with the configured [`FileFilters`] and sorts it the way the
//! sidebar shows it (folders first, then natural name order).

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bridge::file::DirEntry;

/// Which directory entries the file browser shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFilters {
    pub show_hidden: bool,
    /// Entries whose name contains any of these are hidden
    pub exclude_patterns: Vec<String>,
    /// Allowed file extensions (with leading dot); empty allows everything.
    /// Directories are never filtered by extension.
    pub extensions: Vec<String>,
}

impl Default for FileFilters {
    fn default() -> Self {
        Self {
            show_hidden: false,
            exclude_patterns: ["node_modules", ".git", ".vscode", "dist", "build"]
                .into_iter()
                .map(String::from)
                .collect(),
            extensions: [
                ".md", ".txt", ".markdown", ".mdown", ".mkd", ".mdx", ".doc", ".docx",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl FileFilters {
    pub fn accepts(&self, entry: &DirEntry) -> bool {
        if !self.show_hidden && entry.name.starts_with('.') {
            return false;
        }
        if self
            .exclude_patterns
            .iter()
            .any(|pattern| entry.name.contains(pattern.as_str()))
        {
            return false;
        }
        if entry.is_directory || self.extensions.is_empty() {
            return true;
        }

        let ext = dotted_extension(&entry.name);
        self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    }

    /// Filter and sort a raw listing for display
    pub fn apply(&self, entries: Vec<DirEntry>) -> Vec<DirEntry> {
        let mut visible: Vec<DirEntry> = entries.into_iter().filter(|e| self.accepts(e)).collect();
        sort_entries(&mut visible);
        visible
    }
}

/// `.md` for `notes.md`, empty when there is no extension
fn dotted_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(i) if i > 0 => name[i..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Sort entries: directories first, then by name in natural order
pub fn sort_entries(entries: &mut [DirEntry]) {
    entries.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => natural_cmp(&a.name, &b.name),
    });
}

/// Case-insensitive comparison that orders digit runs by numeric value,
/// so `file2` sorts before `file10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_digits(&mut a_chars);
                let right = take_digits(&mut b_chars);
                let ord = compare_digit_runs(&left, &right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// The opened folder and its expanded subfolders
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    /// Filtered, sorted listings keyed by directory
    pub listings: BTreeMap<PathBuf, Vec<DirEntry>>,
    pub expanded_folders: HashSet<PathBuf>,
    pub selected_item: Option<PathBuf>,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        let mut expanded_folders = HashSet::new();
        expanded_folders.insert(root.clone());
        Self {
            root,
            listings: BTreeMap::new(),
            expanded_folders,
            selected_item: None,
        }
    }

    /// Store a directory listing, filtered for display
    pub fn set_listing(&mut self, dir: PathBuf, entries: Vec<DirEntry>, filters: &FileFilters) {
        self.listings.insert(dir, filters.apply(entries));
    }

    pub fn listing(&self, dir: &Path) -> Option<&[DirEntry]> {
        self.listings.get(dir).map(Vec::as_slice)
    }

    /// Toggle folder expansion. Returns `true` when the folder is now expanded.
    pub fn toggle_folder(&mut self, path: &Path) -> bool {
        if self.expanded_folders.remove(path) {
            false
        } else {
            self.expanded_folders.insert(path.to_path_buf());
            true
        }
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded_folders.contains(path)
    }

    /// Expand parent folders of `path` and select it
    pub fn reveal_file(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(parent) = current {
            if parent.starts_with(&self.root) && parent != self.root {
                self.expanded_folders.insert(parent.to_path_buf());
            }
            current = parent.parent();
        }
        self.selected_item = Some(path.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_directory: bool) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            path: PathBuf::from("/w").join(name),
            is_directory,
            size: 0,
            modified: None,
        }
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("file2.md", "file10.md"), Ordering::Less);
        assert_eq!(natural_cmp("Apple", "banana"), Ordering::Less);
        assert_eq!(natural_cmp("a", "ab"), Ordering::Less);
    }

    #[test]
    fn test_filters_and_sort() {
        let filters = FileFilters::default();
        let entries = vec![
            entry("notes10.md", false),
            entry(".hidden.md", false),
            entry("node_modules", true),
            entry("image.png", false),
            entry("notes2.md", false),
            entry("chapters", true),
            entry("README", false),
        ];
        let names: Vec<String> = filters.apply(entries).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["chapters", "notes2.md", "notes10.md"]);
    }

    #[test]
    fn test_empty_extension_list_allows_all_files() {
        let filters = FileFilters {
            extensions: Vec::new(),
            ..FileFilters::default()
        };
        assert!(filters.accepts(&entry("image.png", false)));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let filters = FileFilters::default();
        assert!(filters.accepts(&entry("REPORT.DOCX", false)));
    }

    #[test]
    fn test_toggle_and_reveal() {
        let mut ws = Workspace::new(PathBuf::from("/w"));
        assert!(ws.toggle_folder(Path::new("/w/a")));
        assert!(!ws.toggle_folder(Path::new("/w/a")));

        ws.reveal_file(Path::new("/w/a/b/c.md"));
        assert!(ws.is_expanded(Path::new("/w/a")));
        assert!(ws.is_expanded(Path::new("/w/a/b")));
        assert_eq!(ws.selected_item.as_deref(), Some(Path::new("/w/a/b/c.md")));
    }
}
