//! Heading detection for the PDF outline.
//!
//! RFC text has no markup, so headings are guessed line by line: numbered
//! headings are recognised by their `N.`, `N.N` and `N.N.N.` prefixes, and any
//! other unindented line in the body of a page is taken to be an unnumbered
//! heading ("Acknowledgments", "Author's Address", "Appendix A", ...). The
//! second rule also picks up unindented body text and misses indented or
//! wrapped headings; that imprecision is part of the observable output.

use std::sync::OnceLock;

use regex::Regex;

use crate::pagination::Page;

/// Nesting depth of an outline entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutlineLevel {
    /// Top-level sections, appendices and other unnumbered headings.
    Section,
    /// `N.N` headings.
    Subsection,
    /// `N.N.N.` headings.
    Subsubsection,
}

impl OutlineLevel {
    /// Numeric depth, starting at `0` for top-level entries.
    pub fn depth(self) -> usize {
        match self {
            Self::Section => 0,
            Self::Subsection => 1,
            Self::Subsubsection => 2,
        }
    }
}

/// Line positions reserved for the running header and the page footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlinePolicy {
    /// Lines up to and including this index belong to the page header.
    pub last_header_line: usize,
    /// Lines from this index onwards belong to the page footer.
    pub first_footer_line: usize,
}

impl Default for OutlinePolicy {
    fn default() -> Self {
        Self {
            last_header_line: 3,
            first_footer_line: 53,
        }
    }
}

impl OutlinePolicy {
    fn is_body_line(&self, line_number: usize) -> bool {
        line_number > self.last_header_line && line_number < self.first_footer_line
    }
}

/// A heading recognised on a single line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// Heading text without surrounding whitespace.
    pub label: String,
    /// Nesting level of the heading.
    pub level: OutlineLevel,
}

/// One navigation entry of the document outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Text shown in the PDF viewer's outline pane.
    pub label: String,
    /// Nesting level.
    pub level: OutlineLevel,
    /// Index of the page the heading was found on.
    pub page: usize,
    /// Index of the heading line within its page.
    pub line: usize,
}

static SUBSUBSECTION_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static SUBSECTION_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static SECTION_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn subsubsection_regex() -> Option<&'static Regex> {
    SUBSUBSECTION_REGEX
        .get_or_init(|| Regex::new(r"^[1-9]\.[1-9]\.[1-9]\.").ok())
        .as_ref()
}

fn subsection_regex() -> Option<&'static Regex> {
    // The trailing `.` is any character, not a literal dot.
    SUBSECTION_REGEX
        .get_or_init(|| Regex::new(r"^[1-9]\.[1-9].").ok())
        .as_ref()
}

fn section_regex() -> Option<&'static Regex> {
    SECTION_REGEX
        .get_or_init(|| Regex::new(r"^[1-9]\.").ok())
        .as_ref()
}

fn matches(regex: Option<&Regex>, line: &str) -> bool {
    regex.map_or(false, |regex| regex.is_match(line))
}

/// Classifies a single line found at `line_number` within its page.
///
/// Patterns are tried from the most to the least specific, so `1.1.1.` is
/// always a sub-subsection even though it also starts like a section.
pub fn classify_line(line: &str, line_number: usize, policy: &OutlinePolicy) -> Option<Heading> {
    let level = if matches(subsubsection_regex(), line) {
        OutlineLevel::Subsubsection
    } else if matches(subsection_regex(), line) {
        OutlineLevel::Subsection
    } else if matches(section_regex(), line) {
        OutlineLevel::Section
    } else if policy.is_body_line(line_number) && starts_unindented(line) {
        OutlineLevel::Section
    } else {
        return None;
    };

    Some(Heading {
        label: line.trim().to_string(),
        level,
    })
}

fn starts_unindented(line: &str) -> bool {
    line.chars().next().map_or(false, |first| !first.is_whitespace())
}

/// Collects the outline entries of a single page.
///
/// The cover page never contributes entries.
pub fn page_outline<S: AsRef<str>>(page: &Page<'_, S>, policy: &OutlinePolicy) -> Vec<OutlineEntry> {
    if page.is_cover() {
        return Vec::new();
    }

    page.numbered_lines()
        .filter_map(|(line_number, text)| {
            classify_line(text, line_number, policy).map(|heading| OutlineEntry {
                label: heading.label,
                level: heading.level,
                page: page.index(),
                line: line_number,
            })
        })
        .collect()
}

/// Collects the outline of a whole document in reading order.
pub fn extract_outline<S: AsRef<str>>(pages: &[Page<'_, S>], policy: &OutlinePolicy) -> Vec<OutlineEntry> {
    pages
        .iter()
        .flat_map(|page| page_outline(page, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{paginate, PaginationPolicy};

    fn classify(line: &str, line_number: usize) -> Option<(String, usize)> {
        classify_line(line, line_number, &OutlinePolicy::default())
            .map(|heading| (heading.label, heading.level.depth()))
    }

    #[test]
    fn numbered_section_is_level_zero() {
        assert_eq!(
            classify("3. Introduction\n", 10),
            Some(("3. Introduction".to_string(), 0))
        );
    }

    #[test]
    fn subsection_is_level_one() {
        assert_eq!(
            classify("4.2. Message Format\n", 20),
            Some(("4.2. Message Format".to_string(), 1))
        );
    }

    #[test]
    fn subsection_accepts_any_character_after_second_digit() {
        assert_eq!(classify("4.2 Message Format\n", 20).map(|(_, level)| level), Some(1));
        assert_eq!(classify("4.2x\n", 20).map(|(_, level)| level), Some(1));
    }

    #[test]
    fn subsubsection_takes_precedence() {
        assert_eq!(classify("1.1.1. Foo", 30), Some(("1.1.1. Foo".to_string(), 2)));
        assert_eq!(classify("1.1.1. Foo\n", 0).map(|(_, level)| level), Some(2));
    }

    #[test]
    fn subsubsection_needs_literal_dots() {
        // The any-character separator only exists at the subsection level.
        assert_eq!(classify("1.1x1. Foo\n", 30).map(|(_, level)| level), Some(1));
        assert_eq!(classify("   1.1x1. Foo\n", 30), None);
        assert_eq!(classify("1.1.1x Foo\n", 30).map(|(_, level)| level), Some(1));
    }

    #[test]
    fn numbered_headings_ignore_header_and_footer_rows() {
        assert_eq!(classify("2. Terminology\n", 0).map(|(_, level)| level), Some(0));
        assert_eq!(classify("2. Terminology\n", 55).map(|(_, level)| level), Some(0));
    }

    #[test]
    fn zero_and_multi_digit_numbers_are_not_sections() {
        assert_eq!(classify("   0. Zero\n", 10), None);
        assert_eq!(classify("   10. Ten\n", 10), None);
        // Unindented, so the body-line rule picks them up instead.
        assert_eq!(classify("10. Ten\n", 10), Some(("10. Ten".to_string(), 0)));
        // `1.1` followed by any character is already a subsection.
        assert_eq!(classify("1.10. Ten\n", 10), Some(("1.10. Ten".to_string(), 1)));
    }

    #[test]
    fn unindented_body_line_is_appendix_like() {
        assert_eq!(
            classify("Acknowledgments\n", 12),
            Some(("Acknowledgments".to_string(), 0))
        );
        assert_eq!(classify("Appendix A.  Examples\n", 4).map(|(_, level)| level), Some(0));
        assert_eq!(classify("Author's Address\n", 52).map(|(_, level)| level), Some(0));
    }

    #[test]
    fn header_and_footer_rows_are_never_appendix_like() {
        for line_number in [0, 1, 2, 3, 53, 54, 58] {
            assert_eq!(classify("RFC 4291   IPv6 Addressing   February 2006\n", line_number), None);
        }
    }

    #[test]
    fn indented_and_blank_lines_are_ignored() {
        assert_eq!(classify("   This is body text.\n", 20), None);
        assert_eq!(classify("\n", 20), None);
        assert_eq!(classify("", 20), None);
        assert_eq!(classify("\x0C\n", 20), None);
        assert_eq!(classify("\tTabbed\n", 20), None);
    }

    #[test]
    fn custom_policy_moves_the_footer() {
        let policy = OutlinePolicy {
            last_header_line: 3,
            first_footer_line: 40,
        };
        assert!(classify_line("Acknowledgments\n", 45, &policy).is_none());
        assert!(classify_line("Acknowledgments\n", 39, &policy).is_some());
    }

    #[test]
    fn cover_page_is_skipped() {
        let mut lines: Vec<String> = (0..70).map(|_| "   body\n".to_string()).collect();
        lines[10] = "1. Cover Heading\n".to_string();
        lines[60 + 10] = "2. Body Heading\n".to_string();
        lines.push("   tail\n".to_string());

        let pages = paginate(&lines, &PaginationPolicy::default());
        let outline = extract_outline(&pages, &OutlinePolicy::default());

        assert_eq!(
            outline,
            vec![OutlineEntry {
                label: "2. Body Heading".to_string(),
                level: OutlineLevel::Section,
                page: 1,
                line: 10,
            }]
        );
    }

    #[test]
    fn entries_follow_reading_order() {
        let mut lines: Vec<String> = Vec::new();
        lines.push("cover\x0C\n".to_string());
        for _ in 0..4 {
            lines.push("RFC 9999   Header\n".to_string());
        }
        lines.push("1. Intro\n".to_string());
        lines.push("1.1. Scope\n".to_string());
        lines.push("   text\n".to_string());
        lines.push("1.1.1. Detail\n".to_string());
        lines.push("Acknowledgments\x0C\n".to_string());
        lines.push("2. Next\n".to_string());

        let pages = paginate(&lines, &PaginationPolicy::default());
        let outline = extract_outline(&pages, &OutlinePolicy::default());
        let summary: Vec<(usize, usize, &str, usize)> = outline
            .iter()
            .map(|entry| (entry.page, entry.line, entry.label.as_str(), entry.level.depth()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (1, 4, "1. Intro", 0),
                (1, 5, "1.1. Scope", 1),
                (1, 7, "1.1.1. Detail", 2),
                (1, 8, "Acknowledgments", 0),
                (2, 0, "2. Next", 0),
            ]
        );
    }
}
