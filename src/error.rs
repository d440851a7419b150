//! Error type shared by the conversion pipeline.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::bookmarks::BookmarkError;

/// Errors that can occur while turning an RFC text file into a PDF.
#[derive(Debug)]
pub enum ConvertError {
    /// Reading or writing a file failed.
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// No usable monospaced font could be loaded.
    Font(genpdf::error::Error),
    /// genpdf failed to lay out or serialize the document.
    Render(genpdf::error::Error),
    /// The rendered PDF could not be reopened or rewritten by `lopdf`.
    Pdf(lopdf::Error),
    /// The outline could not be attached to the rendered PDF.
    Bookmark(BookmarkError),
    /// The RFC index could not be parsed.
    Index(String),
    /// Page geometry or other options are unusable.
    InvalidConfig(String),
    /// The input contained no lines, so there is no page to render.
    EmptyDocument,
}

impl ConvertError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<BookmarkError> for ConvertError {
    fn from(err: BookmarkError) -> Self {
        Self::Bookmark(err)
    }
}

impl From<lopdf::Error> for ConvertError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf(err)
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
            Self::Font(err) => write!(f, "Failed to load font: {err}"),
            Self::Render(err) => write!(f, "Failed to render PDF: {err}"),
            Self::Pdf(err) => write!(f, "Failed to post-process PDF: {err}"),
            Self::Bookmark(err) => write!(f, "Failed to add bookmarks: {err}"),
            Self::Index(message) => write!(f, "Failed to read RFC index: {message}"),
            Self::InvalidConfig(message) => write!(f, "Invalid configuration: {message}"),
            Self::EmptyDocument => write!(f, "Input contains no lines"),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Font(err) | Self::Render(err) => Some(err),
            Self::Pdf(err) => Some(err),
            Self::Bookmark(err) => Some(err),
            Self::Index(_) | Self::InvalidConfig(_) | Self::EmptyDocument => None,
        }
    }
}
