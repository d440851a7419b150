//! Lookup of RFC titles, authors and keywords in the RFC Editor's
//! `rfc-index.xml`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ConvertError;
use crate::metadata::DocumentMetadata;

/// Length of a padded RFC name such as `rfc0013`.
pub const PADDED_NAME_LEN: usize = 7;

/// Pads the number of an RFC file stem with zeros: `rfc13` becomes `rfc0013`.
///
/// Names that are already long enough, or too short to carry the `rfc` prefix,
/// are returned unchanged.
pub fn pad_rfc_name(name: &str) -> String {
    match (name.get(..3), name.get(3..)) {
        (Some(prefix), Some(number)) if name.len() < PADDED_NAME_LEN => {
            format!("{prefix}{}{number}", "0".repeat(PADDED_NAME_LEN - name.len()))
        }
        _ => name.to_string(),
    }
}

/// Bibliographic data of a single RFC.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RfcIndexEntry {
    /// Identifier such as `RFC0013`.
    pub doc_id: String,
    /// Document title.
    pub title: String,
    /// Author names in index order.
    pub authors: Vec<String>,
    /// Keywords in index order.
    pub keywords: Vec<String>,
}

impl RfcIndexEntry {
    /// PDF metadata for this RFC.
    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata::new(format!("[{}] {}", self.doc_id, self.title))
            .with_author(self.authors.join(", "))
            .with_keywords(self.keywords.join(" "))
    }
}

/// Parsed `rfc-index.xml`, keyed by upper-case document identifier.
#[derive(Clone, Debug, Default)]
pub struct RfcIndex {
    entries: HashMap<String, RfcIndexEntry>,
}

#[derive(Clone, Copy)]
enum Field {
    DocId,
    Title,
    Author,
    Keyword,
}

fn field_at(path: &[Vec<u8>]) -> Option<Field> {
    let entry = path.iter().rposition(|name| name.as_slice() == b"rfc-entry")?;
    match &path[entry + 1..] {
        [name] if name.as_slice() == b"doc-id" => Some(Field::DocId),
        [name] if name.as_slice() == b"title" => Some(Field::Title),
        [outer, inner] if outer.as_slice() == b"author" && inner.as_slice() == b"name" => {
            Some(Field::Author)
        }
        [outer, inner] if outer.as_slice() == b"keywords" && inner.as_slice() == b"kw" => {
            Some(Field::Keyword)
        }
        _ => None,
    }
}

impl RfcIndex {
    /// Parses the XML text of an RFC index.
    ///
    /// Element names are matched without their namespace, so both the
    /// namespaced files published by the RFC Editor and plain copies work.
    pub fn parse(xml: &str) -> Result<Self, ConvertError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut entries = HashMap::new();
        let mut path: Vec<Vec<u8>> = Vec::new();
        let mut current: Option<RfcIndexEntry> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    path.push(name);
                    if path.last().map(Vec::as_slice) == Some(b"rfc-entry".as_slice()) {
                        current = Some(RfcIndexEntry::default());
                    } else if let Some(entry) = current.as_mut() {
                        // Every <name>/<kw> opens a new value.
                        match field_at(&path) {
                            Some(Field::Author) => entry.authors.push(String::new()),
                            Some(Field::Keyword) => entry.keywords.push(String::new()),
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    path.pop();
                    if e.local_name().as_ref() == b"rfc-entry" {
                        if let Some(entry) = current.take() {
                            if !entry.doc_id.is_empty() {
                                entries.insert(entry.doc_id.to_uppercase(), entry);
                            }
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    let (Some(entry), Some(field)) = (current.as_mut(), field_at(&path)) else {
                        continue;
                    };
                    let text = e
                        .unescape()
                        .map_err(|err| ConvertError::Index(err.to_string()))?;
                    let target = match field {
                        Field::DocId => &mut entry.doc_id,
                        Field::Title => &mut entry.title,
                        Field::Author => match entry.authors.last_mut() {
                            Some(author) => author,
                            None => continue,
                        },
                        Field::Keyword => match entry.keywords.last_mut() {
                            Some(keyword) => keyword,
                            None => continue,
                        },
                    };
                    target.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Err(err) => {
                    return Err(ConvertError::Index(format!(
                        "XML error at position {}: {err}",
                        reader.buffer_position()
                    )))
                }
                _ => {}
            }
        }

        debug!("parsed RFC index with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Reads and parses the index file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|source| ConvertError::io(path, source))?;
        Self::parse(&xml)
    }

    /// Looks up an entry by identifier (`RFC0013`, case-insensitive).
    pub fn get(&self, doc_id: &str) -> Option<&RfcIndexEntry> {
        self.entries.get(&doc_id.to_uppercase())
    }

    /// Number of RFC entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
