//! Report model
//!
//! Every analysis produces a [`DocumentReport`]. All report types serialize
//! with serde so the same value backs both the text and JSON renderers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::file_reader::FileWarning;

/// Errors that end a run without producing a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Main file not found: {}", .0.display())]
    MainNotFound(PathBuf),

    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Character class counts over visible prose
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharTally {
    /// CJK unified ideographs (U+4E00..=U+9FFF)
    pub cjk: usize,
    /// ASCII letters
    pub latin: usize,
    /// ASCII digits
    pub digits: usize,
    /// Any other non-whitespace character
    pub other: usize,
    pub total: usize,
}

impl CharTally {
    /// Add another tally into this one
    pub fn add(&mut self, other: &CharTally) {
        self.cjk += other.cjk;
        self.latin += other.latin;
        self.digits += other.digits;
        self.other += other.other;
        self.total += other.total;
    }
}

/// Sectioning levels, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    Section = 1,
    Subsection = 2,
    Subsubsection = 3,
    Paragraph = 4,
    Subparagraph = 5,
}

impl HeadingLevel {
    pub const ALL: [HeadingLevel; 5] = [
        HeadingLevel::Section,
        HeadingLevel::Subsection,
        HeadingLevel::Subsubsection,
        HeadingLevel::Paragraph,
        HeadingLevel::Subparagraph,
    ];

    /// Map a command name (without backslash or star) to its level
    pub fn from_command(name: &str) -> Option<Self> {
        match name {
            "section" => Some(HeadingLevel::Section),
            "subsection" => Some(HeadingLevel::Subsection),
            "subsubsection" => Some(HeadingLevel::Subsubsection),
            "paragraph" => Some(HeadingLevel::Paragraph),
            "subparagraph" => Some(HeadingLevel::Subparagraph),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::Section => "section",
            HeadingLevel::Subsection => "subsection",
            HeadingLevel::Subsubsection => "subsubsection",
            HeadingLevel::Paragraph => "paragraph",
            HeadingLevel::Subparagraph => "subparagraph",
        }
    }

    /// 1-based nesting depth
    pub fn depth(&self) -> usize {
        *self as usize
    }
}

/// Formula counts by delimiter category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaCounts {
    /// `\begin{equation}` and friends
    pub env: usize,
    /// `$$ ... $$`
    pub display: usize,
    /// `\[ ... \]`
    pub bracket: usize,
    /// `\( ... \)`
    pub paren: usize,
    /// `$ ... $`
    pub inline: usize,
    pub total: usize,
}

/// Code block counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockCounts {
    pub lstlisting: usize,
    pub verbatim: usize,
    /// `\lstinputlisting{file}`
    pub lstinput: usize,
    pub total: usize,
}

/// Citation, cross-reference and bibliography counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCounts {
    pub cites: usize,
    pub refs: usize,
    pub bib_entries: usize,
    /// Bibliography files declared by the document (readable or not)
    pub bib_files: Vec<PathBuf>,
}

/// An `\includegraphics` reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// The path as written in the document
    pub requested: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl ImageRef {
    pub fn unresolved(requested: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            resolved: None,
            size: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// One heading with counts inclusive of all nested headings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub level: HeadingLevel,
    /// Normalized heading text; may be empty
    pub title: String,
    pub chars: CharTally,
    pub words: usize,
}

impl SectionEntry {
    pub fn new(level: HeadingLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            chars: CharTally::default(),
            words: 0,
        }
    }

    /// Title for display, `untitled` when empty
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "untitled"
        } else {
            &self.title
        }
    }
}

/// Per-level heading statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    pub level: HeadingLevel,
    /// Number of headings at this level
    pub count: usize,
    /// Non-whitespace characters seen while a heading of this level was open
    pub chars: usize,
}

/// Section aggregation output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStats {
    /// All five levels, outermost first
    pub levels: Vec<LevelStats>,
    /// Headings in document order
    pub entries: Vec<SectionEntry>,
}

impl Default for SectionStats {
    fn default() -> Self {
        Self {
            levels: HeadingLevel::ALL
                .iter()
                .map(|&level| LevelStats {
                    level,
                    count: 0,
                    chars: 0,
                })
                .collect(),
            entries: Vec::new(),
        }
    }
}

impl SectionStats {
    pub fn level(&self, level: HeadingLevel) -> &LevelStats {
        &self.levels[level.depth() - 1]
    }

    pub fn level_mut(&mut self, level: HeadingLevel) -> &mut LevelStats {
        &mut self.levels[level.depth() - 1]
    }
}

/// Everything a run produces
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentReport {
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub main_file: PathBuf,
    pub title: String,
    /// Distinct files touched, in first-visit order
    pub files: Vec<PathBuf>,
    pub chars: CharTally,
    pub words: usize,
    pub formulas: FormulaCounts,
    pub code_blocks: CodeBlockCounts,
    pub references: ReferenceCounts,
    pub sections: SectionStats,
    pub images: Vec<ImageRef>,
    pub total_image_size: u64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<FileWarning>,
}
