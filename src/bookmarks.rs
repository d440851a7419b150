//! PDF outline (bookmark) generation built on top of `lopdf`.
//!
//! The outline extractor yields a flat list of entries with levels. Here the
//! list is turned into the `/Outlines` tree of a rendered PDF: an entry becomes
//! a child of the nearest preceding entry with a smaller level, and each item
//! jumps to the row its heading is printed on.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::layout::{PageGeometry, SheetMap};
use crate::metadata::pdf_text;
use crate::outline::OutlineEntry;

/// Errors that can occur while embedding bookmarks into a rendered PDF document.
#[derive(Debug)]
pub enum BookmarkError {
    /// A required catalog entry was missing from the document trailer.
    MissingCatalog,
    /// The catalog object was not a dictionary, preventing outline injection.
    InvalidCatalog,
    /// An outline entry points at a sheet that was not rendered.
    MissingPage {
        /// Index of the outline entry whose page reference is missing.
        entry_index: usize,
        /// The requested (1-indexed) page number that could not be resolved.
        page_number: usize,
    },
}

impl std::fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage {
                entry_index,
                page_number,
            } => write!(
                f,
                "Outline entry {} refers to missing page {} for bookmark destination",
                entry_index, page_number
            ),
        }
    }
}

impl std::error::Error for BookmarkError {}

/// Computes the parent of every entry from the entries' nesting depths.
///
/// An entry's parent is the closest earlier entry with a smaller depth; entries
/// without one are top-level. Skipped levels (a depth-2 entry right after a
/// depth-0 one) simply attach to the closest shallower entry.
pub fn parent_indices(depths: &[usize]) -> Vec<Option<usize>> {
    let mut parents = Vec::with_capacity(depths.len());
    let mut open: Vec<usize> = Vec::new();

    for (index, &depth) in depths.iter().enumerate() {
        while open.last().map_or(false, |&last| depths[last] >= depth) {
            open.pop();
        }
        parents.push(open.last().copied());
        open.push(index);
    }

    parents
}

struct OutlineItem {
    object_id: ObjectId,
    page_ref: ObjectId,
    top: f64,
    title: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Adds the outline to `document` and returns the number of bookmarks written.
///
/// `sheets` maps the entries' page/line positions to rendered sheets and
/// `geometry` to the vertical position of their row. An empty outline leaves
/// the document untouched.
pub fn apply_outline(
    document: &mut Document,
    outline: &[OutlineEntry],
    sheets: &SheetMap,
    geometry: &PageGeometry,
) -> Result<usize, BookmarkError> {
    if outline.is_empty() {
        return Ok(0);
    }

    let pages = document.get_pages();
    let items = collect_outline_items(document, outline, sheets, geometry, &pages)?;

    let outlines_id = document.new_object_id();
    link_outline_items(outlines_id, document, &items, geometry.left_points());
    insert_outlines_root(outlines_id, document, &items)?;

    Ok(items.len())
}

fn collect_outline_items(
    document: &mut Document,
    outline: &[OutlineEntry],
    sheets: &SheetMap,
    geometry: &PageGeometry,
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineItem>, BookmarkError> {
    let depths: Vec<usize> = outline.iter().map(|entry| entry.level.depth()).collect();
    let parents = parent_indices(&depths);
    let mut items = Vec::with_capacity(outline.len());

    for (index, (entry, parent)) in outline.iter().zip(parents).enumerate() {
        let placement = sheets.place(entry.page, entry.line);
        let page_number = placement.map_or(entry.page, |placement| placement.sheet) + 1;
        let page_ref = u32::try_from(page_number)
            .ok()
            .and_then(|number| pages.get(&number).copied())
            .ok_or(BookmarkError::MissingPage {
                entry_index: index,
                page_number,
            })?;

        items.push(OutlineItem {
            object_id: document.new_object_id(),
            page_ref,
            top: geometry.row_top_points(placement.map_or(0, |placement| placement.row)),
            title: entry.label.clone(),
            parent,
            children: Vec::new(),
        });
    }

    for index in 0..items.len() {
        if let Some(parent) = items[index].parent {
            items[parent].children.push(index);
        }
    }

    Ok(items)
}

fn descendant_count(items: &[OutlineItem], index: usize) -> usize {
    items[index]
        .children
        .iter()
        .map(|&child| 1 + descendant_count(items, child))
        .sum()
}

fn link_outline_items(
    outlines_id: ObjectId,
    document: &mut Document,
    items: &[OutlineItem],
    left: f64,
) {
    let top_level: Vec<usize> = (0..items.len())
        .filter(|&index| items[index].parent.is_none())
        .collect();

    for index in 0..items.len() {
        let siblings: &[usize] = match items[index].parent {
            Some(parent) => &items[parent].children,
            None => &top_level,
        };
        let position = siblings.iter().position(|&sibling| sibling == index);

        let mut dictionary = Dictionary::new();
        dictionary.set("Title", pdf_text(&items[index].title));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(items[index].page_ref),
                Object::Name("XYZ".into()),
                Object::from(left),
                Object::from(items[index].top),
                Object::Null,
            ]),
        );
        dictionary.set(
            "Parent",
            Object::Reference(
                items[index]
                    .parent
                    .map_or(outlines_id, |parent| items[parent].object_id),
            ),
        );

        if let Some(position) = position {
            if position > 0 {
                dictionary.set("Prev", Object::Reference(items[siblings[position - 1]].object_id));
            }
            if position + 1 < siblings.len() {
                dictionary.set("Next", Object::Reference(items[siblings[position + 1]].object_id));
            }
        }

        if let (Some(&first), Some(&last)) = (items[index].children.first(), items[index].children.last()) {
            dictionary.set("First", Object::Reference(items[first].object_id));
            dictionary.set("Last", Object::Reference(items[last].object_id));
            dictionary.set("Count", Object::Integer(descendant_count(items, index) as i64));
        }

        document
            .objects
            .insert(items[index].object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    items: &[OutlineItem],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let top_level: Vec<&OutlineItem> = items.iter().filter(|item| item.parent.is_none()).collect();

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(items.len() as i64));
    if let Some(first) = top_level.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = top_level.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;

    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    Ok(())
}
