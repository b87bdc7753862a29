//! Text normalization
//!
//! Turns LaTeX source into the text a reader would see, for counting only.
//! Two stages, always in this order:
//!
//! 1. [`remove_math`] drops every formula, so commands inside math never reach
//!    the command stripper.
//! 2. [`strip_commands`] drops environment markers, administrative commands
//!    with their arguments, and generic command names (keeping their brace
//!    arguments), then unescapes punctuation and removes braces.
//!
//! Every function here is a pure `&str -> String` transform.

use once_cell::sync::Lazy;
use regex::Regex;

/// Math environments, removed (and counted) in this order
pub const MATH_ENVS: &[&str] = &[
    "equation",
    "equation*",
    "align",
    "align*",
    "gather",
    "gather*",
    "multline",
    "multline*",
    "eqnarray",
    "eqnarray*",
];

/// Commands whose arguments are never prose, as regex fragments. Alternation
/// is leftmost-first, so longer names sharing a prefix must come before the
/// shorter one.
pub const ADMIN_COMMANDS: &[&str] = &[
    "label",
    "ref",
    "pageref",
    "eqref",
    "cite[a-zA-Z]*",
    "includegraphics",
    "input",
    "include",
    "bibliographystyle",
    "bibliography",
    "usepackage",
    "documentclass",
    "graphicspath",
    "geometry",
    "lstset",
    "ctexset",
    "definecolor",
    "setlength",
    "linespread",
    "IfFileExists",
    "PassOptionsToPackage",
    "appendix",
    "tableofcontents",
    "newpage",
    "clearpage",
    "sloppy",
];

/// One `\begin{env}...\end{env}` regex per entry of [`MATH_ENVS`]
pub static MATH_ENV_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    MATH_ENVS
        .iter()
        .map(|env| {
            let env = regex::escape(env);
            Regex::new(&format!(r"(?s)\\begin\{{{env}\}}.*?\\end\{{{env}\}}"))
                .expect("Invalid math environment regex")
        })
        .collect()
});

pub static DISPLAY_DOLLAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$.*?\$\$").expect("Invalid DISPLAY_DOLLAR_RE regex"));

pub static BRACKET_MATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\\[.*?\\\]").expect("Invalid BRACKET_MATH_RE regex"));

pub static PAREN_MATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\\(.*?\\\)").expect("Invalid PAREN_MATH_RE regex"));

static BEGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\begin\{[^}]+\}").expect("Invalid BEGIN_RE regex"));

static END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\end\{[^}]+\}").expect("Invalid END_RE regex"));

static ADMIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\\({})\*?(?:\[[^\]]*\])?(?:\{{[^}}]*\}})*",
        ADMIN_COMMANDS.join("|")
    ))
    .expect("Invalid ADMIN_RE regex")
});

static GENERIC_CMD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z@]+\*?(?:\[[^\]]*\])?").expect("Invalid GENERIC_CMD_RE regex"));

static BRACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{}]").expect("Invalid BRACE_RE regex"));

/// Byte ranges of single-dollar inline formulas.
///
/// An opening `$` is neither preceded nor followed by another `$`; the span
/// ends at the first later `$` not preceded by a backslash. Spans do not
/// overlap and may cross line breaks.
pub fn inline_dollar_spans(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let opens = bytes[i] == b'$'
            && (i == 0 || bytes[i - 1] != b'$')
            && bytes.get(i + 1) != Some(&b'$');
        if !opens {
            i += 1;
            continue;
        }

        // Any close a later opener could use is also a close for this one,
        // so an unclosed opener ends the scan.
        let close = (i + 1..bytes.len()).find(|&j| bytes[j] == b'$' && bytes[j - 1] != b'\\');
        let Some(close) = close else {
            break;
        };
        spans.push((i, close + 1));
        i = close + 1;
    }

    spans
}

/// Remove `$...$` inline formulas (see [`inline_dollar_spans`])
pub fn remove_inline_dollar(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for (start, end) in inline_dollar_spans(text) {
        out.push_str(&text[pos..start]);
        pos = end;
    }
    out.push_str(&text[pos..]);
    out
}

/// Remove math environments
pub fn remove_math_envs(text: &str) -> String {
    MATH_ENV_RES.iter().fold(text.to_string(), |acc, re| {
        re.replace_all(&acc, "").into_owned()
    })
}

/// Remove every kind of formula, environments first and inline `$` last
pub fn remove_math(text: &str) -> String {
    let text = remove_math_envs(text);
    let text = DISPLAY_DOLLAR_RE.replace_all(&text, "");
    let text = BRACKET_MATH_RE.replace_all(&text, "");
    let text = PAREN_MATH_RE.replace_all(&text, "");
    remove_inline_dollar(&text)
}

/// Remove markup, leaving visible text
pub fn strip_commands(text: &str) -> String {
    let text = BEGIN_RE.replace_all(text, "");
    let text = END_RE.replace_all(&text, "");
    let text = ADMIN_RE.replace_all(&text, "");
    let text = GENERIC_CMD_RE.replace_all(&text, "");
    let text = text
        .replace("\\%", "%")
        .replace("\\_", "_")
        .replace("\\&", "&");
    BRACE_RE.replace_all(&text, "").into_owned()
}

/// Full normalization: math removal, then command stripping
pub fn strip_for_count(text: &str) -> String {
    strip_commands(&remove_math(text))
}
