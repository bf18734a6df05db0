//! Command-line interface
//!
//! Each subcommand drives one of the editor engines against files on disk:
//! - `outline` / `find` / `replace` on a Markdown buffer
//! - `convert` for Word and HTML documents
//! - `ocr` against the configured recognition service
//! - `ls` with the file browser's filters
//! - `preview` to render standalone HTML

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::bridge::{self, DocxConverter};
use crate::config::EditorConfig;
use crate::markdown::markdown_to_html;
use crate::model::{display_name_for, sort_entries, WordFormat};
use crate::outline::OutlineData;
use crate::search::{self, replace_all, SearchOptions};
use crate::util::file_validation::extension_lowercase;

/// Markdown editor core tools
#[derive(Parser, Debug)]
#[command(name = "marknote", version, about = "Markdown search, outline, preview and conversion tools")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

/// Search flags shared by `find` and `replace`; set flags are added to the
/// configured defaults
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SearchFlags {
    /// Match case exactly
    #[arg(short = 'c', long)]
    pub case_sensitive: bool,

    /// Only match whole words
    #[arg(short = 'w', long)]
    pub whole_word: bool,

    /// Treat the pattern as a regular expression
    #[arg(short = 'r', long)]
    pub regex: bool,
}

impl SearchFlags {
    pub fn options(self, defaults: SearchOptions) -> SearchOptions {
        SearchOptions {
            case_sensitive: defaults.case_sensitive || self.case_sensitive,
            whole_word: defaults.whole_word || self.whole_word,
            regex: defaults.regex || self.regex,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the heading outline of a Markdown file
    Outline { file: PathBuf },

    /// List every occurrence of a pattern
    Find {
        pattern: String,
        file: PathBuf,
        #[command(flatten)]
        flags: SearchFlags,
    },

    /// Replace every occurrence of a pattern (replacement is literal)
    Replace {
        pattern: String,
        replacement: String,
        file: PathBuf,
        #[command(flatten)]
        flags: SearchFlags,
        /// Write the result back to the file instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// Convert a Word (.docx) or HTML document to Markdown
    Convert {
        file: PathBuf,
        /// Output file; `-` prints to stdout. Defaults to the `.md` sibling.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Recognize text in an image via the OCR service
    Ocr { image: PathBuf },

    /// List a directory the way the file browser shows it
    Ls {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Include hidden and excluded entries
        #[arg(short, long)]
        all: bool,
    },

    /// Render a Markdown file as a standalone HTML page
    Preview {
        file: PathBuf,
        /// Output file; prints to stdout when omitted
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// One `find` hit with a 1-based line and column for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundMatch {
    pub offset: usize,
    pub length: usize,
    pub line: usize,
    pub column: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct ReplaceReport<'a> {
    path: &'a Path,
    replaced: usize,
    written: bool,
}

#[derive(Debug, Serialize)]
struct ConvertReport<'a> {
    source: &'a Path,
    output: Option<&'a Path>,
    markdown: &'a str,
}

/// Execute a parsed command, writing results to `out`
pub fn run(args: CliArgs, config: &EditorConfig, out: &mut dyn Write) -> Result<()> {
    let json = args.json;
    match args.command {
        Command::Outline { file } => {
            let text = bridge::read_file(&file)?;
            let outline = OutlineData::from_text(&text, 0);
            if json {
                print_json(out, &outline.roots)?;
            } else {
                for (depth, node) in outline.flatten() {
                    writeln!(
                        out,
                        "{}{} {} (line {})",
                        "  ".repeat(depth),
                        node.label(),
                        node.text,
                        node.line + 1
                    )?;
                }
            }
        }

        Command::Find { pattern, file, flags } => {
            let text = bridge::read_file(&file)?;
            let found = find_in(&text, &pattern, flags.options(config.search))?;
            if json {
                print_json(out, &found)?;
            } else {
                for m in &found {
                    writeln!(out, "{}:{}:{}: {}", file.display(), m.line, m.column, m.text)?;
                }
                if found.is_empty() {
                    writeln!(out, "No matches for '{}'", pattern)?;
                }
            }
        }

        Command::Replace {
            pattern,
            replacement,
            file,
            flags,
            write,
        } => {
            let text = bridge::read_file(&file)?;
            let (updated, replaced) = replace_all(&text, &pattern, &replacement, flags.options(config.search))?;
            if write && replaced > 0 {
                bridge::save_file(&file, &updated)?;
            }
            if json {
                let report = ReplaceReport {
                    path: &file,
                    replaced,
                    written: write && replaced > 0,
                };
                print_json(out, &report)?;
            } else if write {
                writeln!(out, "Replaced {} occurrences in {}", replaced, file.display())?;
            } else {
                out.write_all(updated.as_bytes())?;
            }
        }

        Command::Convert { file, output } => {
            let markdown = convert_to_markdown(&file)?;
            let target = match output {
                Some(path) if path.as_os_str() == "-" => None,
                Some(path) => Some(path),
                None => Some(bridge::markdown_path_for(&file)),
            };
            if let Some(target) = &target {
                bridge::save_file(target, &markdown)?;
            }
            if json {
                let report = ConvertReport {
                    source: &file,
                    output: target.as_deref(),
                    markdown: &markdown,
                };
                print_json(out, &report)?;
            } else if let Some(target) = &target {
                writeln!(out, "Converted {} -> {}", display_name_for(&file), target.display())?;
            } else {
                out.write_all(markdown.as_bytes())?;
            }
        }

        Command::Ocr { image } => {
            if bridge::mime_type_for(&image).is_none() {
                bail!("{} is not a supported image", image.display());
            }
            let result = config.ocr.client().perform_ocr(&image)?;
            if json {
                print_json(out, &result)?;
            } else {
                writeln!(out, "{}", result.full_text)?;
            }
        }

        Command::Ls { dir, all } => {
            let entries = bridge::read_directory(&dir)?;
            let entries = if all {
                let mut entries = entries;
                sort_entries(&mut entries);
                entries
            } else {
                config.file_filters.apply(entries)
            };
            if json {
                print_json(out, &entries)?;
            } else {
                for entry in &entries {
                    let suffix = if entry.is_directory { "/" } else { "" };
                    writeln!(out, "{}{}", entry.name, suffix)?;
                }
            }
        }

        Command::Preview { file, output } => {
            let text = bridge::read_file(&file)?;
            let html = markdown_to_html(&text, &display_name_for(&file));
            match output {
                Some(path) => {
                    bridge::save_file(&path, &html)?;
                    if json {
                        print_json(out, &serde_json::json!({ "output": path }))?;
                    } else {
                        writeln!(out, "Wrote {}", path.display())?;
                    }
                }
                None => out.write_all(html.as_bytes())?,
            }
        }
    }
    Ok(())
}

/// Every match of `query` in `text` with display coordinates
pub fn find_in(text: &str, query: &str, options: SearchOptions) -> Result<Vec<FoundMatch>> {
    let matches = search::find(text, query, options)?;
    Ok(matches
        .into_iter()
        .map(|m| {
            let before = &text[..m.offset];
            let line_start = before.rfind('\n').map_or(0, |i| i + 1);
            FoundMatch {
                offset: m.offset,
                length: m.length,
                line: before.matches('\n').count() + 1,
                column: text[line_start..m.offset].chars().count() + 1,
                text: m.text(text).unwrap_or_default().to_string(),
            }
        })
        .collect())
}

fn convert_to_markdown(file: &Path) -> Result<String> {
    if let Some(format) = WordFormat::from_path(file) {
        return Ok(bridge::word_to_markdown(&DocxConverter, file, format)?);
    }
    let ext = extension_lowercase(file).unwrap_or_default();
    if ext == "html" || ext == "htm" {
        let html = bridge::read_file(file)?;
        let markdown = bridge::html_to_markdown(&html);
        return Ok(if markdown.trim().is_empty() { html } else { markdown });
    }
    bail!("Don't know how to convert {}", file.display())
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    writeln!(out, "{}", text)?;
    Ok(())
}
