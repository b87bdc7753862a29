//! Document title detection

use once_cell::sync::Lazy;
use regex::Regex;

use crate::latex::classify::is_cjk_ideograph;
use crate::latex::normalize::strip_for_count;

/// Title used when nothing better is found
pub const UNKNOWN_TITLE: &str = "unknown";

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\title\{([^}]*)\}").expect("Invalid TITLE_RE regex"));

static TITLEPAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\\begin\{titlepage\}(.*?)\\end\{titlepage\}").expect("Invalid TITLEPAGE_RE regex")
});

static SECTION_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\section\*?\{([^}]*)\}").expect("Invalid SECTION_TITLE_RE regex"));

/// Pick the document title.
///
/// In order of preference: `\title{..}`; the titlepage line with the most CJK
/// ideographs (then the longest, then the earliest); the first `\section`;
/// [`UNKNOWN_TITLE`].
pub fn find_title<S: AsRef<str>>(text: &str, lines: &[S]) -> String {
    if let Some(title) = TITLE_RE.captures(text).and_then(|caps| caps.get(1)) {
        return strip_for_count(title.as_str()).trim().to_string();
    }

    if let Some(body) = TITLEPAGE_RE.captures(text).and_then(|caps| caps.get(1)) {
        let mut best: Option<(usize, usize, String)> = None;
        for raw in body.as_str().lines() {
            let cleaned = strip_for_count(raw).trim().to_string();
            if cleaned.is_empty() {
                continue;
            }
            let cjk = cleaned.chars().filter(|&c| is_cjk_ideograph(c)).count();
            let len = cleaned.chars().count();
            let better = match &best {
                Some((best_cjk, best_len, _)) => (cjk, len) > (*best_cjk, *best_len),
                None => true,
            };
            if better {
                best = Some((cjk, len, cleaned));
            }
        }
        if let Some((_, _, title)) = best {
            return title;
        }
    }

    for line in lines {
        if let Some(title) = SECTION_TITLE_RE
            .captures(line.as_ref())
            .and_then(|caps| caps.get(1))
        {
            return strip_for_count(title.as_str()).trim().to_string();
        }
    }

    UNKNOWN_TITLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();
        find_title(text, &lines)
    }

    #[test]
    fn test_explicit_title() {
        assert_eq!(run("\\title{A \\textbf{Study}}\n\\section{Intro}"), "A Study");
    }

    #[test]
    fn test_titlepage_prefers_cjk_dense_line() {
        let text = "\\begin{titlepage}\n\\centering\nUniversity of Somewhere\n{\\Huge 基于深度学习的研究}\n毕业论文\n\\end{titlepage}";
        assert_eq!(run(text), "基于深度学习的研究");
    }

    #[test]
    fn test_titlepage_tie_keeps_earliest() {
        let text = "\\begin{titlepage}\nAlpha\nBravo\n\\end{titlepage}";
        assert_eq!(run(text), "Alpha");
    }

    #[test]
    fn test_titlepage_tie_prefers_longer() {
        let text = "\\begin{titlepage}\nShort\nMuch longer line\n\\end{titlepage}";
        assert_eq!(run(text), "Much longer line");
    }

    #[test]
    fn test_first_section_fallback() {
        assert_eq!(run("text\n\\subsection{Nope}\n\\section*{Overview}"), "Overview");
    }

    #[test]
    fn test_unknown() {
        assert_eq!(run("nothing here"), UNKNOWN_TITLE);
    }
}
