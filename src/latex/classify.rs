//! Character classification and markup counters
//!
//! `count_chars` / `count_words` run on normalized text. The formula, code,
//! citation and bibliography counters run on comment-stripped raw markup.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::core::file_reader::{read_file_with_config, FileReadConfig, FileWarning, WarningCode};
use crate::core::model::{CharTally, CodeBlockCounts, FormulaCounts};
use crate::core::paths::{join_normalized, normalize_lexically};
use crate::latex::comments::strip_comments_text;
use crate::latex::normalize::{
    inline_dollar_spans, strip_for_count, BRACKET_MATH_RE, DISPLAY_DOLLAR_RE, MATH_ENVS,
    PAREN_MATH_RE,
};

/// English word: letters with at most one internal apostrophe contraction
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z]+(?:'[A-Za-z]+)?\b").expect("Invalid WORD_RE regex"));

static MATH_BEGIN_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    MATH_ENVS
        .iter()
        .map(|env| {
            Regex::new(&format!(r"\\begin\{{{}\}}", regex::escape(env)))
                .expect("Invalid math begin regex")
        })
        .collect()
});

static LSTLISTING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\begin\{lstlisting\}").expect("Invalid LSTLISTING_RE regex"));

static VERBATIM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\begin\{verbatim\}").expect("Invalid VERBATIM_RE regex"));

static LSTINPUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\lstinputlisting(?:\[[^\]]*\])?\{[^}]+\}").expect("Invalid LSTINPUT_RE regex")
});

static CITE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\cite[a-zA-Z]*\s*\{[^}]+\}").expect("Invalid CITE_RE regex"));

static REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\ref\s*\{[^}]+\}").expect("Invalid REF_RE regex"));

static BIBLIOGRAPHY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\bibliography\{([^}]+)\}").expect("Invalid BIBLIOGRAPHY_RE regex"));

static ADDBIBRESOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\addbibresource\{([^}]+)\}").expect("Invalid ADDBIBRESOURCE_RE regex")
});

static BIB_ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^@\w+\s*\{").expect("Invalid BIB_ENTRY_RE regex"));

/// Check if a character is a CJK unified ideograph
#[inline]
pub fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Classify every non-whitespace character of `text`
pub fn count_chars(text: &str) -> CharTally {
    let mut tally = CharTally::default();
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        if is_cjk_ideograph(c) {
            tally.cjk += 1;
        } else if c.is_ascii_alphabetic() {
            tally.latin += 1;
        } else if c.is_ascii_digit() {
            tally.digits += 1;
        } else {
            tally.other += 1;
        }
    }
    tally.total = tally.cjk + tally.latin + tally.digits + tally.other;
    tally
}

/// Count English words (CJK text contributes none)
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Document-wide tally and word count over normalized lines.
///
/// Each line is normalized on its own; lines that normalize to nothing are
/// skipped.
pub fn count_text<S: AsRef<str>>(lines: &[S]) -> (CharTally, usize) {
    let mut tally = CharTally::default();
    let mut words = 0;
    for line in lines {
        let cleaned = strip_for_count(line.as_ref());
        if cleaned.is_empty() {
            continue;
        }
        tally.add(&count_chars(&cleaned));
        words += count_words(&cleaned);
    }
    (tally, words)
}

/// Count formulas in raw markup
pub fn count_formulas(text: &str) -> FormulaCounts {
    let text = strip_comments_text(text);

    let env = MATH_BEGIN_RES
        .iter()
        .map(|re| re.find_iter(&text).count())
        .sum::<usize>();
    let display = DISPLAY_DOLLAR_RE.find_iter(&text).count();
    let bracket = BRACKET_MATH_RE.find_iter(&text).count();
    let paren = PAREN_MATH_RE.find_iter(&text).count();

    // $$..$$ spans go first so their delimiters are not read as inline math
    let without_display = DISPLAY_DOLLAR_RE.replace_all(&text, "");
    let inline = inline_dollar_spans(&without_display).len();

    FormulaCounts {
        env,
        display,
        bracket,
        paren,
        inline,
        total: env + display + bracket + paren + inline,
    }
}

/// Count listing, verbatim and `\lstinputlisting` code blocks
pub fn count_code_blocks(text: &str) -> CodeBlockCounts {
    let lstlisting = LSTLISTING_RE.find_iter(text).count();
    let verbatim = VERBATIM_RE.find_iter(text).count();
    let lstinput = LSTINPUT_RE.find_iter(text).count();
    CodeBlockCounts {
        lstlisting,
        verbatim,
        lstinput,
        total: lstlisting + verbatim + lstinput,
    }
}

/// Count `\cite`-family commands (`\citep`, `\citet`, ...)
pub fn count_cites(text: &str) -> usize {
    CITE_RE.find_iter(text).count()
}

/// Count `\ref{..}` commands
pub fn count_refs(text: &str) -> usize {
    REF_RE.find_iter(text).count()
}

/// Bibliography files declared via `\bibliography` or `\addbibresource`.
///
/// `\bibliography` names get `.bib` appended unless already present; all
/// names resolve against `base_dir`.
pub fn find_bib_files(text: &str, base_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for caps in BIBLIOGRAPHY_RE.captures_iter(text) {
        let Some(list) = caps.get(1) else {
            continue;
        };
        for part in list.as_str().split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let name = if part.to_lowercase().ends_with(".bib") {
                part.to_string()
            } else {
                format!("{}.bib", part)
            };
            files.push(normalize_lexically(&join_normalized(base_dir, &name)));
        }
    }

    for caps in ADDBIBRESOURCE_RE.captures_iter(text) {
        let Some(name) = caps.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        if !name.is_empty() {
            files.push(normalize_lexically(&join_normalized(base_dir, name)));
        }
    }

    files
}

/// Count `@type{` entries across bibliography files.
///
/// Unreadable files count as zero and produce a warning.
pub fn count_bib_entries(files: &[PathBuf], config: &FileReadConfig) -> (usize, Vec<FileWarning>) {
    let mut total = 0;
    let mut warnings = Vec::new();

    for path in files {
        let result = read_file_with_config(path, config);
        match result.content {
            Some(data) => total += BIB_ENTRY_RE.find_iter(&data).count(),
            None => warnings.push(
                FileWarning::new(
                    WarningCode::UnreadableBibliography,
                    result
                        .skip_reason
                        .unwrap_or_else(|| "Cannot read bibliography".to_string()),
                )
                .with_path(path.display().to_string()),
            ),
        }
    }

    (total, warnings)
}
