//! Conversion options.

use std::path::PathBuf;

use log::warn;

use crate::document::AnalysisPolicy;
use crate::error::ConvertError;
use crate::layout::{PageGeometry, PAPER_HEIGHT_MM, PAPER_WIDTH_MM};

/// Top margins at or below this value usually crowd the page.
pub const CRAMPED_TOP_MARGIN_MM: f64 = 20.0;

/// Settings controlling a single RFC to PDF conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionOptions {
    /// Margin above the first and below the last row, in millimetres.
    pub top_margin_mm: f64,
    /// Left and right margin, in millimetres.
    pub side_margin_mm: f64,
    /// Whether the outline is extracted and written as PDF bookmarks.
    pub generate_bookmarks: bool,
    /// Monospaced TrueType font; looked up automatically when unset.
    pub font_path: Option<PathBuf>,
    /// Pagination and heading-detection constants.
    pub analysis: AnalysisPolicy,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            top_margin_mm: 25.0,
            side_margin_mm: 15.0,
            generate_bookmarks: true,
            font_path: None,
            analysis: AnalysisPolicy::default(),
        }
    }
}

impl ConversionOptions {
    /// Sets both margins and returns the updated options.
    pub fn with_margins(mut self, top_margin_mm: f64, side_margin_mm: f64) -> Self {
        self.top_margin_mm = top_margin_mm;
        self.side_margin_mm = side_margin_mm;
        self
    }

    /// Enables or disables bookmark generation.
    pub fn with_bookmarks(mut self, generate_bookmarks: bool) -> Self {
        self.generate_bookmarks = generate_bookmarks;
        self
    }

    /// Uses the font at `path` instead of searching for one.
    pub fn with_font_path(mut self, path: impl Into<Option<PathBuf>>) -> Self {
        self.font_path = path.into();
        self
    }

    /// Checks the margins and returns the resulting page geometry.
    ///
    /// Small top margins are accepted with a warning; margins that leave no
    /// room for text are rejected.
    pub fn validate(&self) -> Result<PageGeometry, ConvertError> {
        let top = self.top_margin_mm;
        let side = self.side_margin_mm;

        if !top.is_finite() || top < 0.0 || 2.0 * top >= PAPER_HEIGHT_MM {
            return Err(ConvertError::InvalidConfig(format!(
                "top margin must be between 0 and {} mm, got {top}",
                PAPER_HEIGHT_MM / 2.0
            )));
        }

        if !side.is_finite() || side < 0.0 || 2.0 * side >= PAPER_WIDTH_MM {
            return Err(ConvertError::InvalidConfig(format!(
                "side margin must be between 0 and {} mm, got {side}",
                PAPER_WIDTH_MM / 2.0
            )));
        }

        if top <= CRAMPED_TOP_MARGIN_MM {
            warn!(
                "Top margin of {top} mm is at most {CRAMPED_TOP_MARGIN_MM} mm; this usually produces bad results"
            );
        }

        Ok(PageGeometry::new(top, side))
    }
}
