//! Paginated RFC documents together with their outline.

use std::ops::Range;

use log::debug;

use crate::outline::{page_outline, OutlineEntry, OutlinePolicy};
use crate::pagination::{Page, PageSplit, PaginationPolicy};

/// Analysis settings applied to a document's text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisPolicy {
    /// Page splitting constants.
    pub pagination: PaginationPolicy,
    /// Header/footer rows excluded from unnumbered-heading detection.
    pub outline: OutlinePolicy,
}

/// The lines of an RFC split into pages, plus the outline derived from them.
///
/// Built once by [`RfcDocument::analyze`] and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RfcDocument {
    lines: Vec<String>,
    split: PageSplit,
    page_ranges: Vec<Range<usize>>,
    outline: Vec<OutlineEntry>,
}

impl RfcDocument {
    /// Paginates `lines` and, when `with_outline` is set, extracts the outline.
    pub fn analyze(lines: Vec<String>, policy: &AnalysisPolicy, with_outline: bool) -> Self {
        let split = PageSplit::detect(&lines, &policy.pagination);
        let page_ranges = split.ranges(lines.len(), &policy.pagination);

        let mut document = Self {
            lines,
            split,
            page_ranges,
            outline: Vec::new(),
        };

        if with_outline {
            let outline = document
                .pages()
                .flat_map(|page| page_outline(&page, &policy.outline))
                .collect();
            document.outline = outline;
        }

        debug!(
            "analyzed {} lines into {} pages ({}), {} outline entries",
            document.lines.len(),
            document.page_ranges.len(),
            match document.split {
                PageSplit::PageBreaks(_) => "form feeds",
                PageSplit::FixedSlices => "fixed slices",
            },
            document.outline.len()
        );

        document
    }

    /// All lines of the document in reading order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The strategy used to split the document.
    pub fn split(&self) -> &PageSplit {
        &self.split
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ranges.len()
    }

    /// Whether the document has no pages at all (empty input).
    pub fn is_empty(&self) -> bool {
        self.page_ranges.is_empty()
    }

    /// Returns the page at `index`, if any.
    pub fn page(&self, index: usize) -> Option<Page<'_, String>> {
        self.page_ranges
            .get(index)
            .map(|range| Page::new(index, range.start, &self.lines[range.clone()]))
    }

    /// Iterates over the pages in order.
    pub fn pages(&self) -> impl Iterator<Item = Page<'_, String>> + '_ {
        self.page_ranges
            .iter()
            .enumerate()
            .map(|(index, range)| Page::new(index, range.start, &self.lines[range.clone()]))
    }

    /// The complete outline in reading order.
    pub fn outline(&self) -> &[OutlineEntry] {
        &self.outline
    }

    /// Outline entries found on the page at `index`.
    pub fn page_outline(&self, index: usize) -> &[OutlineEntry] {
        let start = self.outline.partition_point(|entry| entry.page < index);
        let end = self.outline.partition_point(|entry| entry.page <= index);
        &self.outline[start..end]
    }

    /// Number of lines on every page, in order.
    pub fn page_lengths(&self) -> Vec<usize> {
        self.page_ranges.iter().map(|range| range.len()).collect()
    }
}
