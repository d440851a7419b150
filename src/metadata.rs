//! Document information written into the PDF `/Info` dictionary.

use lopdf::{Dictionary, Document, Object, StringFormat};

/// Creator string recorded in every generated PDF.
pub const DEFAULT_CREATOR: &str = concat!("rfc2pdf ", env!("CARGO_PKG_VERSION"));

/// Descriptive metadata of a converted RFC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentMetadata {
    title: String,
    author: String,
    keywords: String,
    creator: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            keywords: String::new(),
            creator: DEFAULT_CREATOR.to_string(),
        }
    }
}

impl DocumentMetadata {
    /// Creates metadata with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Returns the document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the authors, comma separated.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the keywords, space separated.
    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    /// Returns the producing application.
    pub fn creator(&self) -> &str {
        &self.creator
    }

    /// Sets the title and returns the updated metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the author and returns the updated metadata.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the keywords and returns the updated metadata.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    /// Sets the creator and returns the updated metadata.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("Title", self.title.as_str()),
            ("Author", self.author.as_str()),
            ("Keywords", self.keywords.as_str()),
            ("Creator", self.creator.as_str()),
        ]
    }
}

/// Encodes `text` as a PDF text string.
///
/// ASCII stays a literal string; anything else is written as UTF-16BE with a
/// byte order mark so viewers show it correctly.
pub fn pdf_text(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Writes the non-empty fields of `metadata` into the document's `/Info`
/// dictionary, creating the dictionary when the document has none.
pub fn apply_metadata(document: &mut Document, metadata: &DocumentMetadata) -> Result<(), lopdf::Error> {
    let existing = document
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .ok();

    let info_id = match existing {
        Some(id) => id,
        None => {
            let id = document.add_object(Dictionary::new());
            document.trailer.set("Info", Object::Reference(id));
            id
        }
    };

    let info = document.get_object_mut(info_id)?.as_dict_mut()?;
    for (key, value) in metadata.fields() {
        if !value.is_empty() {
            info.set(key, pdf_text(value));
        }
    }

    Ok(())
}
