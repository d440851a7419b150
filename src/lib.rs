//! Conversion of plain-text RFCs into paginated PDF documents.
//!
//! The text is split into pages ([`pagination`]), headings are collected into
//! an outline ([`outline`]), and [`builder::RfcPdfBuilder`] prints every page
//! on a fixed grid of rows and attaches the outline as PDF bookmarks.

pub mod batch;
pub mod bookmarks;
pub mod builder;
pub mod config;
pub mod document;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod index;
pub mod layout;
pub mod metadata;
pub mod outline;
pub mod pagination;
pub mod source;

pub use builder::{RenderedPdf, RfcPdfBuilder};
pub use config::ConversionOptions;
pub use document::{AnalysisPolicy, RfcDocument};
pub use error::ConvertError;
pub use metadata::DocumentMetadata;
pub use outline::{OutlineEntry, OutlineLevel, OutlinePolicy};
pub use pagination::{paginate, Page, PageSplit, PaginationPolicy};
