//! genpdf elements used to print RFC pages.
//!
//! genpdf normally flows text from top to bottom. RFC pages instead need every
//! line on a fixed row, so [`PageGrid`] places each line itself at a multiple
//! of the row height.

use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Element, Mm, Position, RenderResult, Size};
use log::warn;

use crate::layout::{PageGeometry, ROWS_PER_PAGE};

const TAB_WIDTH: usize = 8;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Prepares a source line for printing: trailing whitespace (including the
/// line terminator and form feeds) is removed, tabs are expanded and other
/// control characters are dropped.
pub fn printable_text(line: &str) -> String {
    let mut text = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.trim_end().chars() {
        if ch == '\t' {
            let spaces = TAB_WIDTH - column % TAB_WIDTH;
            text.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else if !ch.is_control() {
            text.push(ch);
            column += 1;
        }
    }
    text
}

/// One RFC page printed on a fixed grid of rows.
///
/// Pages longer than [`ROWS_PER_PAGE`] continue on the next sheet.
pub struct PageGrid {
    lines: Vec<String>,
    row_height: f64,
    next_line: usize,
}

impl PageGrid {
    /// Creates a grid for `lines` using the row height of `geometry`.
    pub fn new<S: AsRef<str>>(lines: &[S], geometry: &PageGeometry) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|line| printable_text(line.as_ref()))
                .collect(),
            row_height: geometry.row_height_mm(),
            next_line: 0,
        }
    }
}

impl Element for PageGrid {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let end = self.lines.len().min(self.next_line + ROWS_PER_PAGE);
        let rows = end - self.next_line;

        for (row, text) in self.lines[self.next_line..end].iter().enumerate() {
            if text.is_empty() {
                continue;
            }

            let position = Position::new(0, mm_from_f64(row as f64 * self.row_height));
            match area.text_section(&context.font_cache, position, style) {
                Some(mut section) => section.print_str(text, style)?,
                None => warn!(
                    "Row {} does not fit on the sheet; dropping {:?}",
                    self.next_line + row,
                    text
                ),
            }
        }

        self.next_line = end;

        let mut result = RenderResult::default();
        result.has_more = self.next_line < self.lines.len();
        result.size = Size::new(
            area.size().width,
            mm_from_f64(rows.max(1) as f64 * self.row_height),
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_text_strips_terminators_and_form_feeds() {
        assert_eq!(printable_text("   Abstract\n"), "   Abstract");
        assert_eq!(printable_text("\x0C\n"), "");
        assert_eq!(printable_text("page [3]\x0C\r\n"), "page [3]");
    }

    #[test]
    fn printable_text_expands_tabs_to_columns() {
        assert_eq!(printable_text("a\tb\n"), "a       b");
        assert_eq!(printable_text("\tb"), "        b");
        assert_eq!(printable_text("x\x07y"), "xy");
    }

    #[test]
    fn grid_prepares_every_line() {
        let geometry = PageGeometry::new(25.0, 15.0);
        let lines: Vec<String> = (0..75).map(|n| format!("{n}\t.\n")).collect();
        let grid = PageGrid::new(&lines, &geometry);
        assert_eq!(grid.lines.len(), 75);
        assert_eq!(grid.lines[3], "3       .");
        assert_eq!(grid.next_line, 0);
        assert!((grid.row_height - geometry.row_height_mm()).abs() < 1e-12);
    }
}
