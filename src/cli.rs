//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::file_reader::{EncodingStrategy, FileReadConfig, SizeStrategy, DEFAULT_MAX_FILE_SIZE};
use crate::core::model::DocumentReport;
use crate::core::paths::{absolutize, DEFAULT_TEX_EXTENSION};
use crate::core::render::{RenderConfig, Renderer, ReportFormat};
use crate::flows::report::{analyze_document, AnalyzerConfig};
use crate::latex::images::DEFAULT_IMAGE_EXTENSIONS;

/// texmeter - document statistics for multi-file LaTeX projects.
#[derive(Parser, Debug)]
#[command(name = "texmeter")]
#[command(
    author,
    version,
    about,
    long_about = r#"texmeter follows \input and \include from a main .tex file and reports
heuristic statistics over the whole document.

The report covers character classes (CJK, Latin, digits, other), English words,
formulas, code blocks, citations, cross-references, bibliography entries,
heading levels and referenced images. Counts come from the source text with
commands and math stripped, not from the compiled PDF.

Output formats:
- text: human-friendly report (default)
- json: the full report as a single JSON object

Examples:
    texmeter --main thesis/main.tex
    texmeter --main main.tex --out build/report.txt --out-sections build/sections.txt
    texmeter --main main.tex --format json --pretty
"#
)]
pub struct Cli {
    /// Main LaTeX file of the document.
    #[arg(
        long,
        value_name = "FILE",
        long_help = "Main LaTeX file of the document.\n\n\
Relative paths are resolved against the current directory. Included files are\n\
resolved relative to the file that includes them."
    )]
    pub main: PathBuf,

    /// Write the document report to FILE instead of stdout.
    #[arg(
        long,
        value_name = "FILE",
        long_help = "Write the document report to FILE instead of stdout.\n\n\
Missing parent directories are created."
    )]
    pub out: Option<PathBuf>,

    /// Also write the per-section report to FILE.
    #[arg(
        long,
        value_name = "FILE",
        long_help = "Write the per-section breakdown to FILE.\n\n\
Each heading lists counts that include all of its nested headings."
    )]
    pub out_sections: Option<PathBuf>,

    /// Output format (text/json).
    #[arg(
        long,
        default_value = "text",
        value_name = "FORMAT",
        long_help = "Select the output format for both reports.\n\n\
Supported values:\n\
- text (default)\n\
- json"
    )]
    pub format: String,

    /// Pretty-print JSON output with indentation.
    #[arg(
        long,
        long_help = "Pretty-print JSON output with indentation for human readability.\n\n\
Has no effect on the text format."
    )]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(
        long,
        long_help = "Disable colored diagnostics. This is useful when piping stderr to files or\n\
when your terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        long_help = "Do not print the `[report] <path>` lines for written files. Reports sent\n\
to stdout are still printed."
    )]
    pub quiet: bool,

    /// Verbose mode (print collected warnings).
    #[arg(
        short,
        long,
        long_help = "Print every non-fatal warning (missing includes, unreadable bibliographies,\n\
unresolved images, skipped files) to stderr."
    )]
    pub verbose: bool,

    /// Handling of non-UTF-8 source files (ignore/lossy/skip).
    #[arg(
        long,
        default_value = "ignore",
        value_name = "STRATEGY",
        long_help = "How to read files that are not valid UTF-8.\n\n\
Supported values:\n\
- ignore (default): drop invalid byte sequences\n\
- lossy: replace invalid bytes with U+FFFD\n\
- skip: leave the file out and record a warning"
    )]
    pub encoding: String,

    /// Skip files larger than this many bytes.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        value_name = "BYTES",
        long_help = "Files larger than this many bytes are skipped with a warning.\n\n\
Use --no-size-limit to read every file in full."
    )]
    pub max_file_size: u64,

    /// Read files regardless of size.
    #[arg(long, long_help = "Ignore --max-file-size and read every file in full.")]
    pub no_size_limit: bool,

    /// Extensions tried for images referenced without one.
    #[arg(
        long = "image-ext",
        value_name = "EXTS",
        value_delimiter = ',',
        long_help = "Comma-separated extensions tried, in order, for \\includegraphics targets\n\
without an extension.\n\n\
Default: png,pdf,jpg,jpeg,eps,svg"
    )]
    pub image_ext: Vec<String>,

    /// Extension appended to include targets without one.
    #[arg(
        long = "default-ext",
        default_value = DEFAULT_TEX_EXTENSION,
        value_name = "EXT",
        long_help = "Extension appended to \\input / \\include targets that have none."
    )]
    pub default_ext: String,
}

impl Cli {
    fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        let encoding_strategy: EncodingStrategy =
            self.encoding.parse().map_err(anyhow::Error::msg)?;
        let size_strategy = if self.no_size_limit {
            SizeStrategy::Full
        } else {
            SizeStrategy::Skip
        };

        let image_extensions = if self.image_ext.is_empty() {
            DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect()
        } else {
            self.image_ext
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty())
                .collect()
        };

        Ok(AnalyzerConfig {
            default_extension: self.default_ext.trim_start_matches('.').to_string(),
            image_extensions,
            read: FileReadConfig {
                max_file_size: self.max_file_size,
                encoding_strategy,
                size_strategy,
            },
        })
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: ReportFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let renderer = Renderer::with_config(RenderConfig::with_pretty(format, cli.pretty));
    let config = cli.analyzer_config()?;

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let main = absolutize(&cli.main, &cwd);

    let report = analyze_document(&main, &config)?;

    if cli.verbose {
        print_warnings(&report);
    }

    let rendered = renderer.render_report(&report, &cwd);
    match &cli.out {
        Some(path) => {
            let path = absolutize(path, &cwd);
            write_output(&path, &rendered)?;
            if !cli.quiet {
                eprintln!("{} {}", "[report]".green(), path.display());
            }
        }
        None => print!("{}", rendered),
    }

    if let Some(path) = &cli.out_sections {
        let path = absolutize(path, &cwd);
        write_output(&path, &renderer.render_sections(&report, &cwd))?;
        if !cli.quiet {
            eprintln!("{} {}", "[report]".green(), path.display());
        }
    }

    Ok(())
}

fn print_warnings(report: &DocumentReport) {
    for warning in &report.warnings {
        let label = format!("warning[{}]", warning.code.as_str()).yellow();
        match &warning.path {
            Some(path) => eprintln!("{}: {} ({})", label, warning.message, path),
            None => eprintln!("{}: {}", label, warning.message),
        }
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write report: {}", path.display()))
}
