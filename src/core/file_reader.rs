//! Unified file reading strategies
//!
//! Provides consistent handling for:
//! - Non-UTF-8 files
//! - Oversized files
//! - Binary files
//!
//! Reading never fails loudly: problems become a skipped result plus a
//! structured warning that the caller may surface.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Default maximum file size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Skip non-UTF-8 files entirely
    Skip,
    /// Replace invalid bytes with U+FFFD
    Lossy,
    /// Drop invalid byte sequences
    #[default]
    Ignore,
}

impl std::str::FromStr for EncodingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(EncodingStrategy::Skip),
            "lossy" | "replace" => Ok(EncodingStrategy::Lossy),
            "ignore" => Ok(EncodingStrategy::Ignore),
            _ => Err(format!("Unknown encoding strategy: {}", s)),
        }
    }
}

/// Strategy for handling oversized files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStrategy {
    /// Skip files exceeding size limit
    #[default]
    Skip,
    /// Read entire file regardless of size
    Full,
}

/// Configuration for file reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReadConfig {
    /// Maximum file size to process (bytes)
    pub max_file_size: u64,

    /// How to handle non-UTF-8 content
    pub encoding_strategy: EncodingStrategy,

    /// How to handle oversized files
    pub size_strategy: SizeStrategy,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encoding_strategy: EncodingStrategy::Ignore,
            size_strategy: SizeStrategy::Skip,
        }
    }
}

/// Result of reading a file
#[derive(Debug, Clone)]
pub struct FileReadResult {
    /// The file content (if successfully read)
    pub content: Option<String>,

    /// Warnings generated during reading
    pub warnings: Vec<FileWarning>,

    /// Whether the file was skipped
    pub skipped: bool,

    /// Reason for skipping (if skipped)
    pub skip_reason: Option<String>,
}

impl FileReadResult {
    /// Create a successful read result
    pub fn success(content: String) -> Self {
        Self {
            content: Some(content),
            warnings: Vec::new(),
            skipped: false,
            skip_reason: None,
        }
    }

    /// Create a skipped result
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            content: None,
            warnings: Vec::new(),
            skipped: true,
            skip_reason: Some(reason.into()),
        }
    }

    /// Add a warning
    pub fn with_warning(mut self, warning: FileWarning) -> Self {
        self.warnings.push(warning);
        self
    }
}

/// Warning codes for non-fatal problems met while analyzing a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// File could not be opened or read
    FileUnreadable,
    /// File was skipped due to size
    FileSkippedSize,
    /// File was skipped due to encoding
    FileSkippedEncoding,
    /// Lossy encoding conversion used
    LossyConversion,
    /// File appears to be binary
    BinaryFile,
    /// Include target could not be resolved
    MissingInclude,
    /// Include target was already expanded (cycle or repeat)
    DuplicateInclude,
    /// Image reference could not be resolved
    MissingImage,
    /// Bibliography file could not be read
    UnreadableBibliography,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::FileUnreadable => "FILE_UNREADABLE",
            WarningCode::FileSkippedSize => "FILE_SKIPPED_SIZE",
            WarningCode::FileSkippedEncoding => "FILE_SKIPPED_ENCODING",
            WarningCode::LossyConversion => "LOSSY_CONVERSION",
            WarningCode::BinaryFile => "BINARY_FILE",
            WarningCode::MissingInclude => "MISSING_INCLUDE",
            WarningCode::DuplicateInclude => "DUPLICATE_INCLUDE",
            WarningCode::MissingImage => "MISSING_IMAGE",
            WarningCode::UnreadableBibliography => "UNREADABLE_BIBLIOGRAPHY",
        }
    }
}

/// A structured warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileWarning {
    /// Warning code
    pub code: WarningCode,

    /// Warning message
    pub message: String,

    /// Associated file path (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FileWarning {
    /// Create a new warning
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Set the path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Read a file with the given configuration
pub fn read_file_with_config(path: &Path, config: &FileReadConfig) -> FileReadResult {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            let warning = FileWarning::new(
                WarningCode::FileUnreadable,
                format!("Cannot read metadata: {}", e),
            )
            .with_path(path.display().to_string());
            return FileReadResult::skipped(format!("Cannot read metadata: {}", e))
                .with_warning(warning);
        }
    };

    let file_size = metadata.len();

    if config.size_strategy == SizeStrategy::Skip && file_size > config.max_file_size {
        let warning = FileWarning::new(
            WarningCode::FileSkippedSize,
            format!(
                "File exceeds size limit ({} > {} bytes)",
                file_size, config.max_file_size
            ),
        )
        .with_path(path.display().to_string());
        return FileReadResult::skipped(format!(
            "File size {} exceeds limit {}",
            file_size, config.max_file_size
        ))
        .with_warning(warning);
    }

    let bytes = match read_file_bytes(path) {
        Ok(b) => b,
        Err(e) => {
            let warning =
                FileWarning::new(WarningCode::FileUnreadable, format!("Cannot read file: {}", e))
                    .with_path(path.display().to_string());
            return FileReadResult::skipped(format!("Cannot read file: {}", e))
                .with_warning(warning);
        }
    };

    // Binary if there is a NUL byte in the first 8KB
    let check_len = std::cmp::min(8192, bytes.len());
    if bytes[..check_len].contains(&0) {
        let warning = FileWarning::new(
            WarningCode::BinaryFile,
            "File appears to be binary (contains null bytes)",
        )
        .with_path(path.display().to_string());
        return FileReadResult::skipped("Binary file").with_warning(warning);
    }

    match String::from_utf8(bytes) {
        Ok(content) => FileReadResult::success(content),
        Err(err) => {
            let bytes = err.into_bytes();
            match config.encoding_strategy {
                EncodingStrategy::Skip => {
                    let warning = FileWarning::new(
                        WarningCode::FileSkippedEncoding,
                        "File contains invalid UTF-8 sequences",
                    )
                    .with_path(path.display().to_string());
                    FileReadResult::skipped("Invalid UTF-8").with_warning(warning)
                }
                EncodingStrategy::Lossy => {
                    let content = String::from_utf8_lossy(&bytes).into_owned();
                    let warning = FileWarning::new(
                        WarningCode::LossyConversion,
                        "Lossy UTF-8 conversion applied (some characters replaced)",
                    )
                    .with_path(path.display().to_string());
                    FileReadResult::success(content).with_warning(warning)
                }
                EncodingStrategy::Ignore => {
                    let content = decode_ignoring_invalid(&bytes);
                    let warning = FileWarning::new(
                        WarningCode::LossyConversion,
                        "Invalid UTF-8 sequences dropped",
                    )
                    .with_path(path.display().to_string());
                    FileReadResult::success(content).with_warning(warning)
                }
            }
        }
    }
}

/// Read the whole file; the handle is closed before returning on every path
fn read_file_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Decode UTF-8, silently dropping every invalid sequence
fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}
