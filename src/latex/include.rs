//! Inclusion expansion
//!
//! Walks the `\input` / `\include` graph depth-first. Every traversal takes an
//! explicit visited set that is shared by the whole call tree, so a file is
//! expanded on its first encounter only and cycles terminate.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::file_reader::{read_file_with_config, FileReadConfig, FileWarning, WarningCode};
use crate::core::paths::{normalize_lexically, resolve_tex_path};
use crate::latex::comments::strip_comments;

/// `\input{name}` or `\include{name}`
pub static INCLUDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(input|include)\{([^}]+)\}").expect("Invalid INCLUDE_RE regex"));

/// A piece of a comment-stripped source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Literal text around directives (only emitted when not blank)
    Text(&'a str),
    /// Target of an inclusion directive
    Include(&'a str),
}

/// Split a line into literal text and include targets, in source order.
///
/// Returns `None` when the line has no directive, so callers can keep the
/// line verbatim.
pub fn split_includes(line: &str) -> Option<Vec<Fragment<'_>>> {
    let mut fragments = Vec::new();
    let mut pos = 0;

    for caps in INCLUDE_RE.captures_iter(line) {
        let (Some(whole), Some(target)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let pre = &line[pos..whole.start()];
        if !pre.trim().is_empty() {
            fragments.push(Fragment::Text(pre));
        }
        fragments.push(Fragment::Include(target.as_str()));
        pos = whole.end();
    }

    if fragments.is_empty() {
        return None;
    }

    let post = &line[pos..];
    if !post.trim().is_empty() {
        fragments.push(Fragment::Text(post));
    }
    Some(fragments)
}

/// Include graph walker carrying resolution settings and collected warnings
pub struct Includer<'a> {
    default_ext: &'a str,
    read_config: &'a FileReadConfig,
    warnings: Vec<FileWarning>,
}

impl<'a> Includer<'a> {
    pub fn new(default_ext: &'a str, read_config: &'a FileReadConfig) -> Self {
        Self {
            default_ext,
            read_config,
            warnings: Vec::new(),
        }
    }

    /// Warnings gathered by [`Includer::expand_file`]
    pub fn into_warnings(self) -> Vec<FileWarning> {
        self.warnings
    }

    /// Read a file's lines, recording read problems when `record` is set
    fn read_lines(&mut self, path: &Path, record: bool) -> Option<Vec<String>> {
        let result = read_file_with_config(path, self.read_config);
        if record {
            self.warnings.extend(result.warnings);
        }
        if result.skipped {
            return None;
        }
        result
            .content
            .map(|content| content.lines().map(str::to_string).collect())
    }

    /// Flatten `path` and everything it includes into one line sequence.
    ///
    /// Already visited files contribute nothing. Unresolvable targets are
    /// skipped with a warning.
    pub fn expand_file(&mut self, path: &Path, visited: &mut HashSet<PathBuf>) -> Vec<String> {
        let path = normalize_lexically(path);
        if !visited.insert(path.clone()) {
            self.warnings.push(
                FileWarning::new(
                    WarningCode::DuplicateInclude,
                    "File already expanded; later inclusion skipped",
                )
                .with_path(path.display().to_string()),
            );
            return Vec::new();
        }

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let Some(raw_lines) = self.read_lines(&path, true) else {
            return Vec::new();
        };

        let mut lines = Vec::with_capacity(raw_lines.len());
        for raw in &raw_lines {
            let line = strip_comments(raw);
            if line.is_empty() {
                lines.push(String::new());
                continue;
            }

            let Some(fragments) = split_includes(line) else {
                lines.push(line.to_string());
                continue;
            };

            for fragment in fragments {
                match fragment {
                    Fragment::Text(text) => lines.push(text.to_string()),
                    Fragment::Include(target) => {
                        match resolve_tex_path(target, &base_dir, self.default_ext) {
                            Some(inc_path) => lines.extend(self.expand_file(&inc_path, visited)),
                            None => self.warnings.push(
                                FileWarning::new(
                                    WarningCode::MissingInclude,
                                    format!("Cannot resolve include target '{}'", target.trim()),
                                )
                                .with_path(path.display().to_string()),
                            ),
                        }
                    }
                }
            }
        }

        lines
    }

    /// Distinct files reachable from `path`, in first-visit order.
    ///
    /// Mirrors [`Includer::expand_file`] resolution and cycle rules; a file
    /// that cannot be read is still listed.
    pub fn collect_files(&mut self, path: &Path, visited: &mut HashSet<PathBuf>) -> Vec<PathBuf> {
        let path = normalize_lexically(path);
        if !visited.insert(path.clone()) {
            return Vec::new();
        }

        let mut files = vec![path.clone()];
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let Some(raw_lines) = self.read_lines(&path, false) else {
            return files;
        };

        for raw in &raw_lines {
            let line = strip_comments(raw);
            if line.is_empty() {
                continue;
            }
            for caps in INCLUDE_RE.captures_iter(line) {
                let Some(target) = caps.get(2) else {
                    continue;
                };
                if let Some(inc_path) = resolve_tex_path(target.as_str(), &base_dir, self.default_ext)
                {
                    files.extend(self.collect_files(&inc_path, visited));
                }
            }
        }

        files
    }
}
