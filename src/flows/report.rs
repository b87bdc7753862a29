//! Report flow - Document statistics for a multi-file LaTeX project
//!
//! Expands the include graph from the main file, then runs every counter over
//! the flattened document and gathers the results into a [`DocumentReport`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::file_reader::{FileReadConfig, FileWarning, WarningCode};
use crate::core::model::{DocumentReport, ReferenceCounts, ReportError};
use crate::core::paths::{normalize_lexically, DEFAULT_TEX_EXTENSION};
use crate::core::util::now_rfc3339;
use crate::latex::classify::{
    count_bib_entries, count_cites, count_code_blocks, count_formulas, count_refs, count_text,
    find_bib_files,
};
use crate::latex::images::{find_images, parse_graphicspaths, DEFAULT_IMAGE_EXTENSIONS};
use crate::latex::include::Includer;
use crate::latex::sections::aggregate_sections;
use crate::latex::title::find_title;

/// Analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Extension appended to include targets that have none
    pub default_extension: String,

    /// Extensions tried, in order, for image references without one
    pub image_extensions: Vec<String>,

    /// How source, bibliography and include files are read
    pub read: FileReadConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_extension: DEFAULT_TEX_EXTENSION.to_string(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            read: FileReadConfig::default(),
        }
    }
}

/// Analyze the document rooted at `main` (expected absolute).
///
/// Only a missing or unreadable main file is an error; problems with
/// included files, bibliographies and images end up in `warnings`.
pub fn analyze_document(main: &Path, config: &AnalyzerConfig) -> Result<DocumentReport, ReportError> {
    let main_path = normalize_lexically(main);
    if !main_path.is_file() {
        return Err(ReportError::MainNotFound(main_path));
    }
    fs::File::open(&main_path).map_err(|source| ReportError::Io {
        path: main_path.clone(),
        source,
    })?;
    let main_dir = main_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut includer = Includer::new(&config.default_extension, &config.read);
    let lines = includer.expand_file(&main_path, &mut HashSet::new());
    let files = includer.collect_files(&main_path, &mut HashSet::new());
    let mut warnings = includer.into_warnings();

    // Raw markup scanners see the flattened, comment-stripped text as one string
    let full_text = lines.join("\n");

    let title = find_title(&full_text, &lines);
    let (chars, words) = count_text(&lines);
    let formulas = count_formulas(&full_text);
    let code_blocks = count_code_blocks(&full_text);

    let bib_files = find_bib_files(&full_text, &main_dir);
    let (bib_entries, bib_warnings) = count_bib_entries(&bib_files, &config.read);
    warnings.extend(bib_warnings);
    let references = ReferenceCounts {
        cites: count_cites(&full_text),
        refs: count_refs(&full_text),
        bib_entries,
        bib_files,
    };

    let mut base_dirs = vec![main_dir.clone()];
    base_dirs.extend(parse_graphicspaths(&full_text, &main_dir));
    let images = find_images(&full_text, &base_dirs, &config.image_extensions);
    warnings.extend(images.iter().filter(|img| !img.is_resolved()).map(|img| {
        FileWarning::new(
            WarningCode::MissingImage,
            format!("Cannot resolve image '{}'", img.requested),
        )
    }));
    let total_image_size = images.iter().filter_map(|img| img.size).sum();

    let sections = aggregate_sections(&lines);

    Ok(DocumentReport {
        generated_at: now_rfc3339(),
        main_file: main_path,
        title,
        files,
        chars,
        words,
        formulas,
        code_blocks,
        references,
        sections,
        images,
        total_image_size,
        warnings,
    })
}
