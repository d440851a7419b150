//! Reading RFC text files.
//!
//! RFCs published before the move to UTF-8 are plain ASCII or Latin-1; newer
//! ones start with a UTF-8 byte order mark. Files are decoded accordingly and
//! split into lines that keep their `\n` terminator.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::UTF_8;
use log::debug;

use crate::error::ConvertError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Character encoding of an RFC text file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8, announced by a byte order mark.
    Utf8Bom,
    /// ISO-8859-1, assumed whenever no byte order mark is present.
    Latin1,
}

impl SourceEncoding {
    /// Detects the encoding from the first bytes of a file.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(UTF8_BOM) {
            Self::Utf8Bom
        } else {
            Self::Latin1
        }
    }
}

/// Decodes raw file contents into text.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match SourceEncoding::detect(bytes) {
        SourceEncoding::Utf8Bom => UTF_8.decode_with_bom_removal(bytes).0,
        SourceEncoding::Latin1 => encoding_rs::mem::decode_latin1(bytes),
    }
}

/// Splits text into lines the way a text-mode reader with universal newlines
/// would: `\r\n` and `\r` become `\n`, every line keeps its terminator and a
/// trailing fragment without terminator is kept as the last line.
pub fn split_lines(text: &str) -> Vec<String> {
    let normalized = if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    };

    normalized
        .split_inclusive('\n')
        .map(str::to_string)
        .collect()
}

/// Decodes `bytes` and splits them into lines.
pub fn lines_from_bytes(bytes: &[u8]) -> Vec<String> {
    split_lines(&decode(bytes))
}

/// Reads the RFC text file at `path` into lines.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>, ConvertError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ConvertError::io(path, source))?;
    let encoding = SourceEncoding::detect(&bytes);
    let lines = lines_from_bytes(&bytes);
    debug!(
        "read {} lines from {} ({:?})",
        lines.len(),
        path.display(),
        encoding
    );
    Ok(lines)
}
