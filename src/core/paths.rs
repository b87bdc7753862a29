//! Path normalization utilities
//!
//! Lexical normalization (no filesystem access), include-target resolution and
//! display helpers. Report paths always use '/' as separator.

use std::path::{Component, Path, PathBuf};

/// Default extension inferred for include targets without one
pub const DEFAULT_TEX_EXTENSION: &str = "tex";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Path as shown in reports: relative to `root` when under it, otherwise as-is
pub fn display_path(path: &Path, root: &Path) -> String {
    make_relative(path, root).unwrap_or_else(|| normalize_path(path))
}

/// Join a '/'-separated relative name onto a base directory
pub fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    base.join(relative.replace('/', std::path::MAIN_SEPARATOR_STR))
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` directly under the root is dropped; a leading `..` in a relative path
/// is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Make `path` absolute against `cwd` (if needed) and normalize it
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&cwd.join(path))
    }
}

/// Resolve an include target relative to `base_dir`.
///
/// Tries the name as written, then with `default_ext` appended when the name
/// has no extension. Returns `None` when neither is an existing file.
pub fn resolve_tex_path(name: &str, base_dir: &Path, default_ext: &str) -> Option<PathBuf> {
    let path = normalize_lexically(&join_normalized(base_dir, name.trim()));
    if path.is_file() {
        return Some(path);
    }

    if path.extension().is_none() {
        let mut with_ext = path.into_os_string();
        with_ext.push(".");
        with_ext.push(default_ext);
        let candidate = PathBuf::from(with_ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}
