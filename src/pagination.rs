//! Splitting RFC text into printed pages.
//!
//! Older RFCs terminate every printed page with a form feed, newer ones carry
//! no page markers at all. [`paginate`] picks one of the two strategies per
//! document (see [`PageSplit`]) and always returns a lossless partition of the
//! input lines.

use std::ops::Range;

/// Control character marking the end of a printed page.
pub const PAGE_BREAK: char = '\x0C';

/// Tunable constants used when splitting a document into pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationPolicy {
    /// Number of lines on the cover page when no markers are present.
    pub cover_page_lines: usize,
    /// Number of lines on every following page when no markers are present.
    pub body_page_lines: usize,
    /// Whether a marker on the final line is ignored when looking for page
    /// boundaries, so it never opens an empty trailing page.
    pub exempt_last_line: bool,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            cover_page_lines: 60,
            body_page_lines: 56,
            exempt_last_line: true,
        }
    }
}

/// A contiguous, non-empty run of lines forming one printed page.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, S> {
    index: usize,
    first_line: usize,
    lines: &'a [S],
}

// Manual impls: derives would require `S: Clone`/`S: Copy`.
impl<S> Clone for Page<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Page<'_, S> {}

impl<'a, S: AsRef<str>> Page<'a, S> {
    pub(crate) fn new(index: usize, first_line: usize, lines: &'a [S]) -> Self {
        Self {
            index,
            first_line,
            lines,
        }
    }

    /// Position of the page within the document; `0` is the cover page.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the page's first line within the whole document.
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// Returns the lines of the page in order.
    pub fn lines(&self) -> &'a [S] {
        self.lines
    }

    /// Number of lines on the page.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Pages produced by [`paginate`] are never empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether this is the title page of the document.
    pub fn is_cover(&self) -> bool {
        self.index == 0
    }

    /// Iterates over `(line-within-page, text)` pairs.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.lines
            .iter()
            .enumerate()
            .map(|(number, line)| (number, line.as_ref()))
    }
}

/// How a document is cut into pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageSplit {
    /// Split right after each listed line, all of which contain a form feed.
    PageBreaks(Vec<usize>),
    /// Fixed-size slices for documents without a page-break convention.
    FixedSlices,
}

impl PageSplit {
    /// Chooses the strategy for `lines` from the positions of their markers.
    pub fn detect<S: AsRef<str>>(lines: &[S], policy: &PaginationPolicy) -> Self {
        let scanned = if policy.exempt_last_line {
            lines.len().saturating_sub(1)
        } else {
            lines.len()
        };

        let markers: Vec<usize> = lines[..scanned]
            .iter()
            .enumerate()
            .filter(|(_, line)| line.as_ref().contains(PAGE_BREAK))
            .map(|(index, _)| index)
            .collect();

        // A marker on the last line alone would leave a single page.
        if markers.iter().any(|&marker| marker + 1 < lines.len()) {
            Self::PageBreaks(markers)
        } else {
            Self::FixedSlices
        }
    }

    /// Line ranges of every page for a document of `total` lines.
    pub fn ranges(&self, total: usize, policy: &PaginationPolicy) -> Vec<Range<usize>> {
        if total == 0 {
            return Vec::new();
        }

        match self {
            Self::PageBreaks(markers) => {
                let mut ranges = Vec::with_capacity(markers.len() + 1);
                let mut start = 0;
                for &marker in markers {
                    ranges.push(start..marker + 1);
                    start = marker + 1;
                }
                // Only reachable when the last line may carry a boundary.
                if start < total {
                    ranges.push(start..total);
                }
                ranges
            }
            Self::FixedSlices => {
                let cover_end = total.min(policy.cover_page_lines.max(1));
                let mut ranges = vec![0..cover_end];
                let step = policy.body_page_lines.max(1);
                let mut start = cover_end;
                while start < total {
                    let end = total.min(start + step);
                    ranges.push(start..end);
                    start = end;
                }
                ranges
            }
        }
    }
}

/// Partitions `lines` into pages.
///
/// Concatenating the returned pages always reproduces `lines`; an empty input
/// yields no pages.
pub fn paginate<'a, S: AsRef<str>>(lines: &'a [S], policy: &PaginationPolicy) -> Vec<Page<'a, S>> {
    let split = PageSplit::detect(lines, policy);
    split
        .ranges(lines.len(), policy)
        .into_iter()
        .enumerate()
        .map(|(index, range)| Page::new(index, range.start, &lines[range]))
        .collect()
}
