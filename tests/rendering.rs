use lopdf::{Dictionary, Document, Object, ObjectId};
use rfc2pdf::{fonts, ConversionOptions, DocumentMetadata, RenderedPdf, RfcPdfBuilder};
use sha2::{Digest, Sha256};

const SKIP_MESSAGE: &str =
    "no monospaced font found. Set RFC2PDF_FONT or RFC2PDF_FONTS_DIR, or copy a font to assets/fonts.";

fn push_page(text: &mut String, lines: &[(usize, &str)], length: usize, page: usize) {
    let mut body = vec![String::new(); length];
    body[0] = "RFC 9999                 Synthetic Document                June 2024".to_string();
    for (row, line) in lines {
        body[*row] = line.to_string();
    }
    body[length - 1] = format!("Doe                        Informational                   [Page {page}]");
    for line in body {
        text.push_str(&line);
        text.push('\n');
    }
}

/// Three pages separated by form feeds: a cover, a page with numbered
/// headings and a page with an appendix heading.
fn synthetic_rfc() -> Vec<String> {
    let mut text = String::new();
    push_page(
        &mut text,
        &[(4, "                         Synthetic Document"), (10, "Abstract")],
        56,
        1,
    );
    text.push_str("\x0C\n");
    push_page(
        &mut text,
        &[
            (5, "1.  Introduction"),
            (7, "   Lines are printed on a fixed grid."),
            (12, "1.1.  Scope"),
        ],
        56,
        2,
    );
    text.push_str("\x0C\n");
    push_page(
        &mut text,
        &[
            (4, "Appendix A.  Example"),
            (8, "2.1.3.  Deep Heading"),
            (20, "   Last words."),
        ],
        56,
        3,
    );
    rfc2pdf::source::split_lines(&text)
}

fn render(lines: Vec<String>, options: ConversionOptions) -> Option<RenderedPdf> {
    if !fonts::monospace_font_available() {
        return None;
    }

    let builder = RfcPdfBuilder::new()
        .with_options(options)
        .with_metadata(
            DocumentMetadata::new("[RFC9999] Synthetic Document")
                .with_author("J. Doe, R. Roe")
                .with_keywords("synthetic test"),
        );
    let document = builder.analyze(lines);
    Some(builder.render(&document).expect("render synthetic rfc"))
}

fn dictionary(document: &Document, id: ObjectId) -> &Dictionary {
    document.get_object(id).and_then(Object::as_dict).unwrap()
}

fn reference(dictionary: &Dictionary, key: &[u8]) -> ObjectId {
    dictionary.get(key).and_then(Object::as_reference).unwrap()
}

fn string(dictionary: &Dictionary, key: &[u8]) -> String {
    let bytes = dictionary.get(key).and_then(Object::as_str).unwrap();
    String::from_utf8_lossy(bytes).into_owned()
}

fn outline_titles(document: &Document) -> Vec<String> {
    let catalog = dictionary(document, reference(&document.trailer, b"Root"));
    let root = dictionary(document, reference(catalog, b"Outlines"));

    let mut titles = Vec::new();
    let mut stack = vec![reference(root, b"First")];
    while let Some(id) = stack.pop() {
        let item = dictionary(document, id);
        titles.push(string(item, b"Title"));
        if let Ok(next) = item.get(b"Next").and_then(Object::as_reference) {
            stack.push(next);
        }
        if let Ok(first) = item.get(b"First").and_then(Object::as_reference) {
            stack.push(first);
        }
    }
    titles
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() && data[cursor] != terminator {
                    data[cursor] = b'0';
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_pages_outline_and_metadata() {
    let Some(rendered) = render(synthetic_rfc(), ConversionOptions::default()) else {
        eprintln!("Skipping renders_pages_outline_and_metadata: {SKIP_MESSAGE}");
        return;
    };

    assert_eq!(rendered.sheets, 3);
    assert_eq!(rendered.bookmarks, 4);

    let document = Document::load_mem(&rendered.bytes).expect("output parses");
    assert_eq!(document.get_pages().len(), 3);

    let info = dictionary(&document, reference(&document.trailer, b"Info"));
    assert_eq!(string(info, b"Title"), "[RFC9999] Synthetic Document");
    assert_eq!(string(info, b"Author"), "J. Doe, R. Roe");
    assert_eq!(string(info, b"Keywords"), "synthetic test");

    let catalog = dictionary(&document, reference(&document.trailer, b"Root"));
    assert_eq!(catalog.get(b"PageMode").and_then(Object::as_name).unwrap(), b"UseOutlines");
    assert_eq!(
        outline_titles(&document),
        vec![
            "1.  Introduction",
            "1.1.  Scope",
            "Appendix A.  Example",
            "2.1.3.  Deep Heading",
        ]
    );
}

#[test]
fn bookmarks_can_be_disabled() {
    let options = ConversionOptions::default().with_bookmarks(false);
    let Some(rendered) = render(synthetic_rfc(), options) else {
        eprintln!("Skipping bookmarks_can_be_disabled: {SKIP_MESSAGE}");
        return;
    };

    assert_eq!(rendered.bookmarks, 0);
    let document = Document::load_mem(&rendered.bytes).unwrap();
    let catalog = dictionary(&document, reference(&document.trailer, b"Root"));
    assert!(catalog.get(b"Outlines").is_err());
}

#[test]
fn text_without_form_feeds_uses_fixed_slices() {
    let lines: Vec<String> = (0..130).map(|n| format!("   line {n}\n")).collect();
    let Some(rendered) = render(lines, ConversionOptions::default()) else {
        eprintln!("Skipping text_without_form_feeds_uses_fixed_slices: {SKIP_MESSAGE}");
        return;
    };

    assert_eq!(rendered.sheets, 3);
    assert_eq!(rendered.bookmarks, 0);
}

#[test]
fn long_pages_continue_on_the_next_sheet() {
    let mut lines: Vec<String> = (0..10).map(|n| format!("   cover {n}\n")).collect();
    lines.push("\x0C\n".to_string());
    lines.extend((0..75).map(|n| format!("   body {n}\n")));
    lines[11 + 65] = "2.  Late Heading\n".to_string();

    let Some(rendered) = render(lines, ConversionOptions::default()) else {
        eprintln!("Skipping long_pages_continue_on_the_next_sheet: {SKIP_MESSAGE}");
        return;
    };

    assert_eq!(rendered.sheets, 3);
    assert_eq!(rendered.bookmarks, 1);

    let document = Document::load_mem(&rendered.bytes).unwrap();
    let catalog = dictionary(&document, reference(&document.trailer, b"Root"));
    let root = dictionary(&document, reference(catalog, b"Outlines"));
    let item = dictionary(&document, reference(root, b"First"));
    let dest = item.get(b"Dest").and_then(Object::as_array).unwrap();
    assert_eq!(dest[0].as_reference().unwrap(), document.get_pages()[&3]);
}

#[test]
fn converts_files_on_disk() {
    if !fonts::monospace_font_available() {
        eprintln!("Skipping converts_files_on_disk: {SKIP_MESSAGE}");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rfc9999.txt");
    let output = dir.path().join("rfc9999.pdf");
    std::fs::write(&input, synthetic_rfc().concat()).unwrap();

    let rendered = RfcPdfBuilder::new().convert_file(&input, &output).unwrap();
    let written = std::fs::read(&output).unwrap();
    assert_eq!(written, rendered.bytes);

    let document = Document::load_mem(&written).unwrap();
    let info = dictionary(&document, reference(&document.trailer, b"Info"));
    assert_eq!(string(info, b"Title"), "rfc9999");
}

#[test]
fn rendering_is_deterministic() {
    let Some(first) = render(synthetic_rfc(), ConversionOptions::default()) else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_MESSAGE}");
        return;
    };
    let Some(second) = render(synthetic_rfc(), ConversionOptions::default()) else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_MESSAGE}");
        return;
    };

    assert_eq!(first.bytes.len(), second.bytes.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "PDF renders must be deterministic after metadata normalization"
    );
}
