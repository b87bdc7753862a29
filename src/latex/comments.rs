//! Line comment stripping

/// Drop everything from the first unescaped `%` to the end of the line.
///
/// A `%` directly preceded by `\` is literal text. Only the single previous
/// character is inspected, so `\\%` still keeps the `%`.
pub fn strip_comments(line: &str) -> &str {
    let mut prev: Option<char> = None;
    for (idx, ch) in line.char_indices() {
        if ch == '%' && prev != Some('\\') {
            return &line[..idx];
        }
        prev = Some(ch);
    }
    line
}

/// Apply [`strip_comments`] to every line of a multi-line text
pub fn strip_comments_text(text: &str) -> String {
    text.lines().map(strip_comments).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_trailing_comment() {
        assert_eq!(strip_comments("Hello % world"), "Hello ");
        assert_eq!(strip_comments("% whole line"), "");
        assert_eq!(strip_comments("no comment"), "no comment");
    }

    #[test]
    fn test_escaped_percent_is_literal() {
        assert_eq!(strip_comments("50\\% done % note"), "50\\% done ");
    }

    #[test]
    fn test_adjacent_escaped_percents() {
        assert_eq!(strip_comments("a\\%\\%b%c"), "a\\%\\%b");
        // the second % is preceded by %, not by a backslash
        assert_eq!(strip_comments("a\\%%b"), "a\\%");
    }

    #[test]
    fn test_double_backslash_keeps_percent() {
        assert_eq!(strip_comments("row\\\\%x"), "row\\\\%x");
    }

    #[test]
    fn test_multibyte_before_comment() {
        assert_eq!(strip_comments("中文%注释"), "中文");
    }

    #[test]
    fn test_strip_comments_text() {
        assert_eq!(strip_comments_text("a % x\nb\n% y\nc"), "a \nb\n\nc");
    }
}
