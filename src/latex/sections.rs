//! Section aggregation
//!
//! Tracks heading nesting with an explicit stack and adds every line's counts
//! to all open headings, so each heading's totals include its descendants.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::model::{HeadingLevel, SectionEntry, SectionStats};
use crate::latex::classify::{count_chars, count_words};
use crate::latex::normalize::strip_for_count;

/// Heading command, optionally starred, with its title argument
pub static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(section|subsection|subsubsection|paragraph|subparagraph)\*?\{([^}]*)\}")
        .expect("Invalid HEADING_RE regex")
});

/// Headings found on a line, in order
pub fn find_headings(line: &str) -> Vec<(HeadingLevel, &str)> {
    HEADING_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let level = HeadingLevel::from_command(caps.get(1)?.as_str())?;
            Some((level, caps.get(2).map_or("", |m| m.as_str())))
        })
        .collect()
}

/// Normalized heading title
pub fn heading_title(raw: &str) -> String {
    strip_for_count(raw).trim().to_string()
}

/// Build per-level counts and the inclusive per-heading breakdown
pub fn aggregate_sections<S: AsRef<str>>(lines: &[S]) -> SectionStats {
    let mut stats = SectionStats::default();
    // indices into stats.entries, strictly increasing in level
    let mut stack: Vec<usize> = Vec::new();

    for line in lines {
        let line = line.as_ref();

        for (level, raw_title) in find_headings(line) {
            stats.level_mut(level).count += 1;
            while let Some(&top) = stack.last() {
                if stats.entries[top].level >= level {
                    stack.pop();
                } else {
                    break;
                }
            }
            stats
                .entries
                .push(SectionEntry::new(level, heading_title(raw_title)));
            stack.push(stats.entries.len() - 1);
        }

        if stack.is_empty() {
            continue;
        }
        let cleaned = strip_for_count(line);
        if cleaned.is_empty() {
            continue;
        }

        let tally = count_chars(&cleaned);
        let words = count_words(&cleaned);
        for &idx in &stack {
            let entry = &mut stats.entries[idx];
            entry.chars.add(&tally);
            entry.words += words;
            let level = entry.level;
            stats.level_mut(level).chars += tally.total;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_find_headings() {
        let found = find_headings("\\section*{A} text \\subsection{B}");
        assert_eq!(
            found,
            vec![
                (HeadingLevel::Section, "A"),
                (HeadingLevel::Subsection, "B")
            ]
        );
        assert!(find_headings("\\chapter{X}").is_empty());
    }

    #[test]
    fn test_inclusive_tallies() {
        let stats = aggregate_sections(&lines(
            "\\section{Intro}\nHello 世界.\n\\subsection{Detail}\nMore text.",
        ));

        assert_eq!(stats.entries.len(), 2);
        let section = &stats.entries[0];
        let subsection = &stats.entries[1];

        assert_eq!(section.title, "Intro");
        assert_eq!(subsection.title, "Detail");

        // heading lines contribute their visible title text
        assert_eq!(subsection.chars, count_chars("DetailMoretext."));
        assert_eq!(subsection.words, 3);
        assert_eq!(section.chars, count_chars("IntroHello世界.DetailMoretext."));
        assert_eq!(section.words, 5);
    }

    #[test]
    fn test_inclusive_invariant() {
        let stats = aggregate_sections(&lines(
            "\\section{A}\naaa\n\\subsection{B}\nbb\n\\subsubsection{C}\nc\n\\subsection{D}\ndddd",
        ));
        let [a, b, c, d] = [0, 1, 2, 3].map(|i| stats.entries[i].chars.total);
        let direct_a = count_chars("Aaaa").total;
        assert_eq!(a, direct_a + b + d);
        assert_eq!(b, count_chars("Bbb").total + c);
    }

    #[test]
    fn test_new_section_closes_subsections() {
        let stats = aggregate_sections(&lines(
            "\\section{One}\n\\subsection{Sub}\nx\n\\section{Two}\ny",
        ));
        let sub = &stats.entries[1];
        assert_eq!(sub.chars, count_chars("Subx"));
        let two = &stats.entries[2];
        assert_eq!(two.chars, count_chars("Twoy"));
    }

    #[test]
    fn test_level_counts_and_starred() {
        let stats = aggregate_sections(&lines(
            "\\section{A}\n\\section*{B}\n\\paragraph{P}\n\\subparagraph{Q}",
        ));
        assert_eq!(stats.level(HeadingLevel::Section).count, 2);
        assert_eq!(stats.level(HeadingLevel::Paragraph).count, 1);
        assert_eq!(stats.level(HeadingLevel::Subparagraph).count, 1);
        assert_eq!(stats.level(HeadingLevel::Subsection).count, 0);
    }

    #[test]
    fn test_level_chars() {
        let stats = aggregate_sections(&lines("\\section{A}\nxy\n\\subsection{B}\nz"));
        // section open for "A", "xy", "B", "z"
        assert_eq!(stats.level(HeadingLevel::Section).chars, 5);
        // subsection open for "B", "z"
        assert_eq!(stats.level(HeadingLevel::Subsection).chars, 2);
    }

    #[test]
    fn test_text_before_first_heading_ignored() {
        let stats = aggregate_sections(&lines("Preamble text\n\\section{A}\nbody"));
        assert_eq!(stats.entries[0].chars, count_chars("Abody"));
    }

    #[test]
    fn test_empty_and_math_titles() {
        let stats = aggregate_sections(&lines("\\section{}\n\\subsection{$x$ \\textbf{Bold}}"));
        assert_eq!(stats.entries[0].title, "");
        assert_eq!(stats.entries[0].display_title(), "untitled");
        assert_eq!(stats.entries[1].title, "Bold");
    }

    #[test]
    fn test_no_headings() {
        let stats = aggregate_sections(&lines("just text"));
        assert!(stats.entries.is_empty());
        assert_eq!(stats.levels.len(), 5);
        assert_eq!(stats.level(HeadingLevel::Section).chars, 0);
    }
}
