//! Image reference resolution

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::core::model::ImageRef;
use crate::core::paths::{join_normalized, normalize_lexically};
use crate::core::util::get_file_size;

/// Extensions tried, in order, when an image reference has none
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "pdf", "jpg", "jpeg", "eps", "svg"];

static INCLUDEGRAPHICS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\includegraphics(?:\[[^\]]*\])?\{([^}]+)\}")
        .expect("Invalid INCLUDEGRAPHICS_RE regex")
});

/// `\graphicspath{{a/}{b/}}`, capturing the group list
static GRAPHICSPATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\graphicspath\s*\{((?:\s*\{[^}]*\})*)\s*\}").expect("Invalid GRAPHICSPATH_RE regex")
});

static BRACED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]*)\}").expect("Invalid BRACED_RE regex"));

/// Search directories declared by the first `\graphicspath`, resolved against `base_dir`
pub fn parse_graphicspaths(text: &str, base_dir: &Path) -> Vec<PathBuf> {
    let Some(list) = GRAPHICSPATH_RE.captures(text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    BRACED_RE
        .captures_iter(list.as_str())
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|inner| !inner.is_empty())
        .map(|inner| normalize_lexically(&join_normalized(base_dir, inner)))
        .collect()
}

/// Resolve one image reference against the base directories, first match wins.
///
/// An explicit extension is the only one tried; otherwise `extensions` are
/// tried in order for each base directory in order.
pub fn resolve_image(raw: &str, base_dirs: &[PathBuf], extensions: &[String]) -> Option<PathBuf> {
    let name = raw.trim().trim_matches(|c: char| c == '"' || c == '\'');
    if name.is_empty() {
        return None;
    }

    let has_ext = Path::new(name).extension().is_some();
    let candidates: Vec<String> = if has_ext {
        vec![name.to_string()]
    } else {
        extensions
            .iter()
            .map(|ext| format!("{}.{}", name, ext.trim_start_matches('.')))
            .collect()
    };

    for base in base_dirs {
        for candidate in &candidates {
            let path = normalize_lexically(&join_normalized(base, candidate));
            if path.is_file() {
                return Some(path);
            }
        }
    }

    None
}

/// Every `\includegraphics` in `text`, resolved where possible
pub fn find_images(text: &str, base_dirs: &[PathBuf], extensions: &[String]) -> Vec<ImageRef> {
    INCLUDEGRAPHICS_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let requested = m.as_str();
            match resolve_image(requested, base_dirs, extensions) {
                Some(path) => {
                    let size = get_file_size(&path).ok();
                    ImageRef {
                        requested: requested.to_string(),
                        resolved: Some(path),
                        size,
                    }
                }
                None => ImageRef::unresolved(requested),
            }
        })
        .collect()
}
