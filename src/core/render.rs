//! Renderer module
//!
//! Renders a DocumentReport (and its per-section breakdown) as text or json

use std::path::Path;

use crate::core::model::{DocumentReport, HeadingLevel, SectionEntry};
use crate::core::paths::display_path;
use crate::core::util::format_size;

const HEURISTICS_NOTE: &str = "Note: Statistics are derived from source text heuristics (e.g. stripping TeX commands and math), not from the compiled PDF.";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: ReportFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: ReportFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for document reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render the document report; paths are shown relative to `root`
    pub fn render_report(&self, report: &DocumentReport, root: &Path) -> String {
        match self.config.format {
            ReportFormat::Text => render_report_text(report, root),
            ReportFormat::Json => self.to_json(report),
        }
    }

    /// Render the per-section breakdown
    pub fn render_sections(&self, report: &DocumentReport, root: &Path) -> String {
        match self.config.format {
            ReportFormat::Text => render_sections_text(report, root),
            ReportFormat::Json => self.to_json(&report.sections),
        }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        let mut output = rendered.unwrap_or_else(|_| "{}".to_string());
        output.push('\n');
        output
    }
}

fn render_report_text(report: &DocumentReport, root: &Path) -> String {
    let mut output = String::new();

    output.push_str("Document Info Report\n");
    output.push_str("====================\n\n");
    output.push_str(&format!(
        "Main file: {}\n",
        display_path(&report.main_file, root)
    ));
    output.push_str(&format!("Title: {}\n\n", report.title));
    output.push_str(HEURISTICS_NOTE);
    output.push_str("\n\n");

    output.push_str("Counted files:\n");
    for path in &report.files {
        output.push_str(&format!("  - {}\n", display_path(path, root)));
    }
    output.push('\n');

    let chars = &report.chars;
    output.push_str("Character counts (stripped of TeX and math):\n");
    output.push_str(&format!("  Chinese: {}\n", chars.cjk));
    output.push_str(&format!("  English: {}\n", chars.latin));
    output.push_str(&format!("  English words: {}\n", report.words));
    output.push_str(&format!("  Digits:  {}\n", chars.digits));
    output.push_str(&format!("  Unknown: {}\n", chars.other));
    output.push_str(&format!("  Total:   {}\n\n", chars.total));

    let formulas = &report.formulas;
    output.push_str("Formula counts:\n");
    output.push_str(&format!("  Total:   {}\n", formulas.total));
    output.push_str(&format!("  Env:     {}\n", formulas.env));
    output.push_str(&format!("  $$:      {}\n", formulas.display));
    output.push_str(&format!("  \\[\\]:    {}\n", formulas.bracket));
    output.push_str(&format!("  \\(\\):    {}\n", formulas.paren));
    output.push_str(&format!("  Inline $: {}\n\n", formulas.inline));

    let code = &report.code_blocks;
    output.push_str("Code blocks:\n");
    output.push_str(&format!("  Total:     {}\n", code.total));
    output.push_str(&format!("  lstlisting:{}\n", code.lstlisting));
    output.push_str(&format!("  verbatim:  {}\n", code.verbatim));
    output.push_str(&format!("  lstinput:  {}\n\n", code.lstinput));

    let refs = &report.references;
    output.push_str("References:\n");
    output.push_str(&format!("  Cite commands: {}\n", refs.cites));
    output.push_str(&format!("  Ref commands:  {}\n", refs.refs));
    output.push_str(&format!("  Bib entries:   {}\n\n", refs.bib_entries));

    output.push_str("Section levels:\n");
    for level in HeadingLevel::ALL {
        output.push_str(&format!(
            "  {}: {}\n",
            level.as_str(),
            report.sections.level(level).count
        ));
    }
    output.push('\n');

    output.push_str("Images:\n");
    output.push_str(&format!("  Count: {}\n", report.images.len()));
    output.push_str(&format!(
        "  Total size: {}\n",
        format_size(report.total_image_size)
    ));
    for image in &report.images {
        match (&image.resolved, image.size) {
            (Some(path), Some(size)) => output.push_str(&format!(
                "  - {} ({})\n",
                display_path(path, root),
                format_size(size)
            )),
            _ => output.push_str(&format!("  - {} (missing)\n", image.requested)),
        }
    }

    output
}

fn render_sections_text(report: &DocumentReport, root: &Path) -> String {
    let mut output = String::new();

    output.push_str("Per-section Character Counts\n");
    output.push_str("============================\n\n");
    output.push_str(HEURISTICS_NOTE);
    output.push_str("\n\n");
    output.push_str(&format!(
        "Main file: {}\n",
        display_path(&report.main_file, root)
    ));
    output.push_str(&format!("Title: {}\n\n", report.title));
    output.push_str("Per-section character counts (inclusive of sublevels):\n");

    for entry in &report.sections.entries {
        render_section_entry(&mut output, entry);
    }

    output
}

fn render_section_entry(output: &mut String, entry: &SectionEntry) {
    let indent = "\t".repeat(entry.level.depth() - 1);
    let chars = &entry.chars;

    output.push_str(&format!(
        "{}[{}] {}\n",
        indent,
        entry.level.as_str(),
        entry.display_title()
    ));
    output.push_str(&format!("{}\tChinese: {}\n", indent, chars.cjk));
    output.push_str(&format!("{}\tEnglish: {}\n", indent, chars.latin));
    output.push_str(&format!("{}\tEnglish words: {}\n", indent, entry.words));
    output.push_str(&format!("{}\tDigits:  {}\n", indent, chars.digits));
    output.push_str(&format!("{}\tUnknown: {}\n", indent, chars.other));
    output.push_str(&format!("{}\tTotal:   {}\n", indent, chars.total));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{CharTally, ImageRef};
    use std::path::PathBuf;

    fn sample_report() -> DocumentReport {
        let mut report = DocumentReport {
            main_file: PathBuf::from("/work/thesis/main.tex"),
            title: "My Thesis".to_string(),
            files: vec![
                PathBuf::from("/work/thesis/main.tex"),
                PathBuf::from("/work/thesis/chapters/intro.tex"),
            ],
            words: 7,
            total_image_size: 2048,
            ..Default::default()
        };
        report.chars = CharTally {
            cjk: 4,
            latin: 30,
            digits: 2,
            other: 1,
            total: 37,
        };
        report.formulas.display = 1;
        report.formulas.total = 1;
        report.images = vec![
            ImageRef {
                requested: "arch".to_string(),
                resolved: Some(PathBuf::from("/work/thesis/figs/arch.png")),
                size: Some(2048),
            },
            ImageRef::unresolved("missing"),
        ];
        report.sections.level_mut(HeadingLevel::Section).count = 1;
        report.sections.level_mut(HeadingLevel::Subsection).count = 1;
        let mut section = SectionEntry::new(HeadingLevel::Section, "Intro");
        section.chars.latin = 10;
        section.chars.total = 10;
        section.words = 2;
        report.sections.entries = vec![section, SectionEntry::new(HeadingLevel::Subsection, "")];
        report
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("TXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("yaml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_render_report_text() {
        let renderer = Renderer::with_config(RenderConfig::default());
        let output = renderer.render_report(&sample_report(), Path::new("/work/thesis"));

        assert!(output.starts_with("Document Info Report\n====================\n\n"));
        assert!(output.contains("Main file: main.tex\n"));
        assert!(output.contains("Title: My Thesis\n"));
        assert!(output.contains("  - chapters/intro.tex\n"));
        assert!(output.contains("  Chinese: 4\n"));
        assert!(output.contains("  English words: 7\n"));
        assert!(output.contains("  $$:      1\n"));
        assert!(output.contains("  section: 1\n  subsection: 1\n  subsubsection: 0\n"));
        assert!(output.contains("  Total size: 2.0 KB\n"));
        assert!(output.contains("  - figs/arch.png (2.0 KB)\n"));
        assert!(output.contains("  - missing (missing)\n"));
    }

    #[test]
    fn test_render_paths_outside_root() {
        let renderer = Renderer::with_config(RenderConfig::default());
        let output = renderer.render_report(&sample_report(), Path::new("/elsewhere"));
        assert!(output.contains("Main file: /work/thesis/main.tex\n"));
    }

    #[test]
    fn test_render_sections_text() {
        let renderer = Renderer::with_config(RenderConfig::default());
        let output = renderer.render_sections(&sample_report(), Path::new("/work/thesis"));

        assert!(output.starts_with("Per-section Character Counts\n"));
        assert!(output.contains("[section] Intro\n\tChinese: 0\n\tEnglish: 10\n\tEnglish words: 2\n"));
        assert!(output.contains("\t[subsection] untitled\n\t\tChinese: 0\n"));
        assert!(output.ends_with("\t\tTotal:   0\n"));
    }

    #[test]
    fn test_render_json() {
        let renderer = Renderer::with_config(RenderConfig::with_pretty(ReportFormat::Json, false));
        let output = renderer.render_report(&sample_report(), Path::new("/work/thesis"));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["title"], "My Thesis");
        assert_eq!(value["words"], 7);
        assert_eq!(value["images"][1]["requested"], "missing");
        assert!(value["images"][1].get("resolved").is_none());

        let sections = renderer.render_sections(&sample_report(), Path::new("/work/thesis"));
        let value: serde_json::Value = serde_json::from_str(&sections).unwrap();
        assert_eq!(value["entries"][0]["title"], "Intro");
        assert_eq!(value["entries"][0]["level"], "section");
    }

    #[test]
    fn test_render_json_pretty() {
        let renderer = Renderer::with_config(RenderConfig::with_pretty(ReportFormat::Json, true));
        let output = renderer.render_report(&sample_report(), Path::new("/"));
        assert!(output.contains("\n  \"title\": \"My Thesis\""));
    }
}
