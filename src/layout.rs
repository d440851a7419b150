//! Fixed-grid page geometry.
//!
//! Every printed page is an A4 sheet divided into [`ROWS_PER_PAGE`] rows of
//! equal height between the top and bottom margin. A page of text longer than
//! the grid continues on the next sheet, so the sheet holding a given line is
//! derived from the lengths of all preceding pages.

/// A4 paper width in millimetres.
pub const PAPER_WIDTH_MM: f64 = 210.0;
/// A4 paper height in millimetres.
pub const PAPER_HEIGHT_MM: f64 = 297.0;
/// Text rows on one sheet.
pub const ROWS_PER_PAGE: usize = 60;
/// Font size used for every line.
pub const FONT_SIZE_PT: u8 = 12;

const MM_PER_POINT: f64 = 0.35277;

/// Converts millimetres to typographic points.
pub fn mm_to_points(mm: f64) -> f64 {
    mm / MM_PER_POINT
}

/// Margins and row height of a sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    top_margin_mm: f64,
    side_margin_mm: f64,
}

impl PageGeometry {
    /// Creates the geometry for the given margins.
    ///
    /// The same margin is applied above and below the grid.
    pub fn new(top_margin_mm: f64, side_margin_mm: f64) -> Self {
        Self {
            top_margin_mm,
            side_margin_mm,
        }
    }

    /// Margin above the first and below the last row.
    pub fn top_margin_mm(&self) -> f64 {
        self.top_margin_mm
    }

    /// Left and right margin.
    pub fn side_margin_mm(&self) -> f64 {
        self.side_margin_mm
    }

    /// Height of a single row.
    pub fn row_height_mm(&self) -> f64 {
        (PAPER_HEIGHT_MM - 2.0 * self.top_margin_mm) / ROWS_PER_PAGE as f64
    }

    /// Distance of `row` from the top margin.
    pub fn row_offset_mm(&self, row: usize) -> f64 {
        row as f64 * self.row_height_mm()
    }

    /// Distance of `row` from the top edge of the sheet.
    pub fn row_top_mm(&self, row: usize) -> f64 {
        self.top_margin_mm + self.row_offset_mm(row)
    }

    /// Vertical position of `row` in PDF user space (points, origin at the
    /// bottom-left corner), as used by outline destinations.
    pub fn row_top_points(&self, row: usize) -> f64 {
        mm_to_points(PAPER_HEIGHT_MM - self.row_top_mm(row))
    }

    /// Left text edge in PDF user space.
    pub fn left_points(&self) -> f64 {
        mm_to_points(self.side_margin_mm)
    }
}

/// Where a line ends up once rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// 0-indexed sheet within the rendered PDF.
    pub sheet: usize,
    /// Row on that sheet.
    pub row: usize,
}

/// Number of sheets a page of `lines` lines occupies.
pub fn sheets_for(lines: usize) -> usize {
    ((lines + ROWS_PER_PAGE - 1) / ROWS_PER_PAGE).max(1)
}

/// Maps `(page, line-within-page)` pairs to sheets and rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetMap {
    first_sheets: Vec<usize>,
    total_sheets: usize,
}

impl SheetMap {
    /// Builds the map from the number of lines on each page.
    pub fn new(page_lengths: &[usize]) -> Self {
        let mut first_sheets = Vec::with_capacity(page_lengths.len());
        let mut next = 0;
        for &length in page_lengths {
            first_sheets.push(next);
            next += sheets_for(length);
        }
        Self {
            first_sheets,
            total_sheets: next,
        }
    }

    /// Total number of sheets in the rendered document.
    pub fn total_sheets(&self) -> usize {
        self.total_sheets
    }

    /// Placement of `line` on `page`, or `None` for an unknown page.
    pub fn place(&self, page: usize, line: usize) -> Option<Placement> {
        self.first_sheets.get(page).map(|first| Placement {
            sheet: first + line / ROWS_PER_PAGE,
            row: line % ROWS_PER_PAGE,
        })
    }
}
