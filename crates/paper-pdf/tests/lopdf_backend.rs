//! Backend tests against PDFs generated with lopdf

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};
use paper_core::{
    describe_annotations, read_annotations, IdentifierTitleSource, LocalTitleSource, ObjectKind,
    PageRect, PaperError, PdfBackend, Rgb, TitleRecord, TitleResolver, TreeReporter,
};
use paper_pdf::{LopdfBackend, PdfTitleGuesser};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn text_op(size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    text_in_font("F1", size, x, y, text)
}

fn text_in_font(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)]),
        Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
        Operation::new(
            "Tj",
            vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn numbers(values: &[f64]) -> Object {
    Object::Array(values.iter().map(|v| Object::Real(*v as f32)).collect())
}

fn utf16(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Single Letter page with a 24pt title, a 12pt body line and `annots`.
fn build_pdf(operations: Vec<Operation>, annots: Vec<Dictionary>, info_title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));
    let resources = Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]);

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

    let annot_refs: Vec<Object> = annots
        .into_iter()
        .map(|annot| Object::Reference(doc.add_object(annot)))
        .collect();

    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
        ("Annots", Object::Array(annot_refs)),
    ]));

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(1)),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    if let Some(title) = info_title {
        let info_id = doc.add_object(Dictionary::from_iter(vec![(
            "Title",
            Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
        )]));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn title_page() -> Vec<Operation> {
    let mut ops = text_op(24, 72, 700, "Hello World");
    ops.extend(text_op(12, 72, 650, "Body text of the paper"));
    ops
}

fn highlight(quad_points: &[f64], color: Option<&[f64]>, contents: Option<Object>) -> Dictionary {
    let mut dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Highlight".to_vec())),
        ("Rect", numbers(&[70.0, 690.0, 210.0, 725.0])),
        ("QuadPoints", numbers(quad_points)),
    ]);
    if let Some(color) = color {
        dict.set("C", numbers(color));
    }
    if let Some(contents) = contents {
        dict.set("Contents", contents);
    }
    dict
}

fn note(subtype: &str, contents: &str) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(subtype.as_bytes().to_vec())),
        ("Rect", numbers(&[300.0, 300.0, 320.0, 320.0])),
        (
            "Contents",
            Object::String(contents.as_bytes().to_vec(), StringFormat::Literal),
        ),
    ])
}

/// Quad points (UL, UR, LL, LR) around the title line
const TITLE_QUAD: [f64; 8] = [70.0, 722.0, 210.0, 722.0, 70.0, 695.0, 210.0, 695.0];

fn annotated_pdf() -> Vec<u8> {
    build_pdf(
        title_page(),
        vec![
            highlight(&TITLE_QUAD, Some(&[1.0, 1.0, 0.0]), Some(utf16("Key claim"))),
            highlight(&TITLE_QUAD, None, None),
            note("Text", "Read again"),
            note("Link", "ignored"),
        ],
        None,
    )
}

/// One page without a `/MediaBox` whose `/Pages` node names the page as its parent.
fn cyclic_parent_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let content = Content {
        operations: title_page(),
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
    let note_id = doc.add_object(note("Text", "lost in the loop"));
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
        ("Annots", Object::Array(vec![Object::Reference(note_id)])),
    ]));
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(1)),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            ("Parent", Object::Reference(page_id)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Title line set in `/F9`, which the page resources do not define.
fn undefined_font_pdf() -> Vec<u8> {
    build_pdf(
        text_in_font("F9", 12, 72, 700, "Hello World"),
        vec![
            highlight(&TITLE_QUAD, Some(&[0.0, 1.0, 0.0]), Some(utf16("check wording"))),
            note("Text", "keep me"),
        ],
        None,
    )
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_page_annotations_kinds_and_colors() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "a.pdf", &annotated_pdf());
    let backend = LopdfBackend::new();
    let doc = backend.open(&path).unwrap();

    assert_eq!(backend.page_count(&doc), 1);
    let objects = backend.page_annotations(&doc, 0).unwrap();
    assert_eq!(objects.len(), 4);

    assert!(matches!(objects[0].kind, ObjectKind::Markup { ref quads } if quads.len() == 1));
    assert_eq!(objects[0].color, Some(Rgb(255, 255, 0)));
    assert_eq!(objects[0].contents, "Key claim");
    assert_eq!(objects[1].color, None);
    assert_eq!(objects[1].contents, "");
    assert_eq!(objects[2].kind, ObjectKind::Note);
    assert_eq!(objects[2].contents, "Read again");
    assert_eq!(objects[3].kind, ObjectKind::Other("Link".to_string()));
}

#[test]
fn test_quads_are_normalized_top_left() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "a.pdf", &annotated_pdf());
    let backend = LopdfBackend::new();
    let doc = backend.open(&path).unwrap();

    let objects = backend.page_annotations(&doc, 0).unwrap();
    let ObjectKind::Markup { quads } = &objects[0].kind else {
        panic!("expected markup, got {:?}", objects[0].kind);
    };
    let top_left = quads[0].top_left();
    let bottom_right = quads[0].bottom_right();
    assert!((top_left.x - 70.0 / 612.0).abs() < 1e-4);
    assert!((top_left.y - 70.0 / 792.0).abs() < 1e-4);
    assert!((bottom_right.x - 210.0 / 612.0).abs() < 1e-4);
    assert!((bottom_right.y - 97.0 / 792.0).abs() < 1e-4);

    let size = backend.page_size(&doc, 0).unwrap();
    assert_eq!((size.width, size.height), (612.0, 792.0));
}

#[test]
fn test_text_under_highlight() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "a.pdf", &annotated_pdf());
    let backend = LopdfBackend::new();
    let doc = backend.open(&path).unwrap();

    let title = PageRect {
        left: 70.0,
        top: 70.0,
        right: 210.0,
        bottom: 97.0,
    };
    assert_eq!(backend.text_in_rect(&doc, 0, &title).unwrap(), "Hello World");

    let blank = PageRect {
        left: 400.0,
        top: 400.0,
        right: 500.0,
        bottom: 500.0,
    };
    assert_eq!(backend.text_in_rect(&doc, 0, &blank).unwrap(), "");
    assert!(backend.text_in_rect(&doc, 3, &blank).is_err());
}

#[test]
fn test_read_annotations_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "a.pdf", &annotated_pdf());

    let annotations = read_annotations(&LopdfBackend::new(), &path).unwrap();
    assert_eq!(annotations.len(), 3);
    assert_eq!(annotations[0].text(), "Hello World");
    assert_eq!(annotations[0].color(), Rgb(255, 255, 0));
    assert_eq!(annotations[0].comment(), Some("Key claim"));
    assert_eq!(annotations[1].color(), Rgb::WHITE);
    assert_eq!(annotations[1].comment(), None);
    assert_eq!(annotations[2].text(), "Read again");
}

#[test]
fn test_describe_annotations_dump() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "a.pdf", &annotated_pdf());

    let dump = describe_annotations(&LopdfBackend::new(), &path).unwrap();
    assert!(dump.starts_with("========= PAGE 1 =========\nHello World\n[(255, 255, 0)]\n\t - Key claim\n"));
    assert!(dump.contains("Read again\n"));
    assert!(!dump.contains("ignored"));
}

#[test]
fn test_title_guess_prefers_largest_text() {
    let guesser = PdfTitleGuesser::new();
    let bytes = build_pdf(title_page(), vec![], Some("Metadata Title"));
    assert_eq!(guesser.guess_from_bytes(&bytes).unwrap(), "Hello World");
}

#[test]
fn test_title_guess_falls_back_to_info() {
    let guesser = PdfTitleGuesser::new();
    let bytes = build_pdf(vec![], vec![], Some("  Metadata Title "));
    assert_eq!(guesser.guess_from_bytes(&bytes).unwrap(), "Metadata Title");

    let bare = build_pdf(vec![], vec![], None);
    assert_eq!(guesser.guess_from_bytes(&bare).unwrap(), "");
}

#[test]
fn test_non_pdf_fails_to_open() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "broken.pdf", b"this is not a pdf");
    let err = LopdfBackend::new().open(&path).err();
    assert!(matches!(err, Some(PaperError::PdfLoad(_))));
}

struct StubLookup;

impl IdentifierTitleSource for StubLookup {
    fn lookup_titles(&self, identifiers: &[String]) -> paper_core::Result<Vec<TitleRecord>> {
        Ok(identifiers
            .iter()
            .map(|id| TitleRecord {
                identifier: format!("{}v2", id),
                title: "Stub\n  Paper".to_string(),
            })
            .collect())
    }
}

#[test]
fn test_tree_report_over_real_pdfs() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("papers");
    write(&root, "a.pdf", &annotated_pdf());
    write(&root, "sub/1704.05018.pdf", &build_pdf(title_page(), vec![], None));
    write(&root, "sub/broken.pdf", b"garbage");
    write(&root, "empty/notes.txt", b"nothing here");

    let backend = LopdfBackend::new();
    let guesser = PdfTitleGuesser::new();
    let lookup = StubLookup;
    let local: &dyn LocalTitleSource = &guesser;
    let reporter = TreeReporter::new(&backend, TitleResolver::new(local, &lookup), true);

    let report = reporter.report(&root).unwrap();
    assert_eq!(report.matches("function openAll").count(), 1);
    assert!(report.contains("<summary>papers"));
    assert!(report.contains("<summary>sub"));
    assert!(!report.contains("<summary>empty"));
    assert!(report.contains("Stub Paper"));
    assert!(report.contains(
        "<div title=\"Key claim\"><span style=\"background-color:rgb(255, 255, 0)\">Hello World</span></div>"
    ));
    assert!(report.find("a.pdf").unwrap() < report.find("<summary>sub").unwrap());
    assert!(!report.contains("broken.pdf"));
}

#[test]
fn test_cyclic_parent_chain_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "loop.pdf", &cyclic_parent_pdf());
    let backend = LopdfBackend::new();
    let doc = backend.open(&path).unwrap();

    assert!(matches!(backend.page_size(&doc, 0), Err(PaperError::PdfQuery(_))));
    assert!(matches!(backend.page_annotations(&doc, 0), Err(PaperError::PdfQuery(_))));
    assert!(matches!(
        read_annotations(&backend, &path),
        Err(PaperError::PdfQuery(_))
    ));
}

#[test]
fn test_cyclic_parent_chain_title_guess_falls_back() {
    let guess = PdfTitleGuesser::new().guess_from_bytes(&cyclic_parent_pdf());
    assert_eq!(guess.unwrap(), "");
}

#[test]
fn test_tree_report_skips_cyclic_parent_chain() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("papers");
    write(&root, "a.pdf", &annotated_pdf());
    write(&root, "loop.pdf", &cyclic_parent_pdf());

    let backend = LopdfBackend::new();
    let guesser = PdfTitleGuesser::new();
    let lookup = StubLookup;
    let reporter = TreeReporter::new(&backend, TitleResolver::new(&guesser, &lookup), false);

    let report = reporter.report(&root).unwrap();
    assert!(report.contains("a.pdf"));
    assert!(report.contains("Hello World"));
    assert!(!report.contains("loop.pdf"));
    assert!(!report.contains("lost in the loop"));
}

#[test]
fn test_undefined_font_keeps_annotations_without_text() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "a.pdf", &undefined_font_pdf());

    let annotations = read_annotations(&LopdfBackend::new(), &path).unwrap();
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[0].text(), "");
    assert_eq!(annotations[0].color(), Rgb(0, 255, 0));
    assert_eq!(annotations[0].comment(), Some("check wording"));
    assert_eq!(annotations[1].text(), "keep me");
}

#[test]
fn test_tree_report_keeps_pdf_with_undefined_font() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("papers");
    write(&root, "a.pdf", &undefined_font_pdf());

    let backend = LopdfBackend::new();
    let guesser = PdfTitleGuesser::new();
    let lookup = StubLookup;
    let reporter = TreeReporter::new(&backend, TitleResolver::new(&guesser, &lookup), false);

    let report = reporter.report(&root).unwrap();
    assert!(report.contains("a.pdf"));
    assert!(report.contains("keep me"));
    assert!(report.contains("check wording"));
}
