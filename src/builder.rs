//! Rendering of analyzed RFC documents to PDF.

use std::fs;
use std::path::Path;

use genpdf::elements::PageBreak;
use genpdf::error::Error;
use genpdf::style;
use genpdf::{Margins, PageDecorator, PaperSize};
use log::{debug, info, trace, warn};

use crate::bookmarks;
use crate::config::ConversionOptions;
use crate::document::RfcDocument;
use crate::elements::{mm_from_f64, PageGrid};
use crate::error::ConvertError;
use crate::fonts;
use crate::layout::{PageGeometry, SheetMap, FONT_SIZE_PT};
use crate::metadata::{apply_metadata, DocumentMetadata};
use crate::source;

/// Result of rendering a document.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// Serialized PDF file.
    pub bytes: Vec<u8>,
    /// Number of physical pages.
    pub sheets: usize,
    /// Number of bookmarks written into the outline.
    pub bookmarks: usize,
}

/// Converts RFC text into PDF files.
#[derive(Clone, Debug, Default)]
pub struct RfcPdfBuilder {
    options: ConversionOptions,
    metadata: DocumentMetadata,
}

impl RfcPdfBuilder {
    /// Creates a builder with default options and empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the conversion options.
    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the document metadata.
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the configured options.
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Returns the configured metadata.
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Paginates `lines` with the configured policies. The outline is only
    /// extracted when bookmarks are enabled.
    pub fn analyze(&self, lines: Vec<String>) -> RfcDocument {
        RfcDocument::analyze(lines, &self.options.analysis, self.options.generate_bookmarks)
    }

    /// Renders `document` to PDF bytes.
    pub fn render(&self, document: &RfcDocument) -> Result<RenderedPdf, ConvertError> {
        self.render_with(document, &self.metadata)
    }

    fn render_with(
        &self,
        document: &RfcDocument,
        metadata: &DocumentMetadata,
    ) -> Result<RenderedPdf, ConvertError> {
        let geometry = self.options.validate()?;
        if document.is_empty() {
            return Err(ConvertError::EmptyDocument);
        }

        let family = fonts::monospace_font_family(self.options.font_path.as_deref())
            .map_err(ConvertError::Font)?;

        let mut pdf = genpdf::Document::new(family);
        pdf.set_paper_size(PaperSize::A4);
        pdf.set_title(metadata.title());
        pdf.set_font_size(FONT_SIZE_PT);
        pdf.set_minimal_conformance();
        pdf.set_page_decorator(GridPageDecorator::new(&geometry));

        for page in document.pages() {
            if page.index() > 0 {
                pdf.push(PageBreak::new());
            }
            pdf.push(PageGrid::new(page.lines(), &geometry));
        }

        let mut raw = Vec::new();
        pdf.render(&mut raw).map_err(ConvertError::Render)?;

        let sheets = SheetMap::new(&document.page_lengths());
        self.finish(raw, document, metadata, &sheets, &geometry)
    }

    /// Writes metadata and bookmarks into the PDF produced by genpdf and
    /// compresses its streams.
    fn finish(
        &self,
        raw: Vec<u8>,
        document: &RfcDocument,
        metadata: &DocumentMetadata,
        sheets: &SheetMap,
        geometry: &PageGeometry,
    ) -> Result<RenderedPdf, ConvertError> {
        let mut pdf = lopdf::Document::load_mem(&raw)?;

        let rendered_sheets = pdf.get_pages().len();
        if rendered_sheets != sheets.total_sheets() {
            warn!(
                "Rendered {} sheets but expected {}; bookmarks may point at the wrong page",
                rendered_sheets,
                sheets.total_sheets()
            );
        }

        apply_metadata(&mut pdf, metadata)?;

        let bookmarks = if self.options.generate_bookmarks {
            bookmarks::apply_outline(&mut pdf, document.outline(), sheets, geometry)?
        } else {
            0
        };

        pdf.compress();
        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes).map_err(lopdf::Error::from)?;

        debug!(
            "rendered {} pages onto {} sheets with {} bookmarks ({} bytes)",
            document.page_count(),
            rendered_sheets,
            bookmarks,
            bytes.len()
        );

        Ok(RenderedPdf {
            bytes,
            sheets: rendered_sheets,
            bookmarks,
        })
    }

    /// Reads the RFC at `input`, renders it and writes the PDF to `output`.
    ///
    /// When no title is configured the input's file stem is used.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<RenderedPdf, ConvertError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let lines = source::read_lines(input)?;
        let document = self.analyze(lines);

        let rendered = if self.metadata.title().is_empty() {
            let stem = input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.render_with(&document, &self.metadata.clone().with_title(stem))?
        } else {
            self.render(&document)?
        };

        fs::write(output, &rendered.bytes).map_err(|source| ConvertError::io(output, source))?;
        info!(
            "{} -> {} ({} sheets, {} bookmarks)",
            input.display(),
            output.display(),
            rendered.sheets,
            rendered.bookmarks
        );
        Ok(rendered)
    }
}

/// Applies the sheet margins on every page.
///
/// No bottom margin is reserved: the grid itself ends one top margin above the
/// bottom edge, and the glyphs of the last row need the space below it.
struct GridPageDecorator {
    sheet: usize,
    margins: Margins,
}

impl GridPageDecorator {
    fn new(geometry: &PageGeometry) -> Self {
        let side = mm_from_f64(geometry.side_margin_mm());
        Self {
            sheet: 0,
            margins: Margins::trbl(mm_from_f64(geometry.top_margin_mm()), side, 0, side),
        }
    }
}

impl PageDecorator for GridPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.sheet += 1;
        trace!("decorating sheet {}", self.sheet);
        area.add_margins(self.margins);
        Ok(area)
    }
}
