use egui::pos2;
use snotes::canvas::{CircleObject, ObjectStyle, PathCommand, PathObject};
use snotes::export::{self, render_pdf};
use snotes::{BlockKind, Canvas, CanvasObject, Document, DrawableObject, NoteStore, PersistenceError};

fn sketch() -> Canvas {
    let mut canvas = Canvas::new();
    canvas.push(CanvasObject::new(
        DrawableObject::Path(PathObject::new(vec![
            PathCommand::MoveTo(pos2(10.0, 10.0)),
            PathCommand::QuadCurveTo(pos2(100.0, 200.0), pos2(300.0, 50.0)),
        ])),
        ObjectStyle::default(),
    ));
    canvas.push(CanvasObject::new(
        DrawableObject::Circle(CircleObject {
            left: 200.0,
            top: 200.0,
            radius: 0.0,
            angle: 0.0,
        }),
        ObjectStyle::default(),
    ));
    canvas
}

#[test]
fn test_notes_render_to_pdf() {
    let mut doc = Document::new();
    doc.set_title("Linear algebra").unwrap();
    doc.add_block(None, BlockKind::Text("# Eigenvalues\n\n* **det**(A - tI) = 0".to_string()))
        .unwrap();
    doc.add_block(None, BlockKind::Drawing(sketch())).unwrap();

    let pdf = render_pdf(&doc, "Ana", "3 March 2025").unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert_eq!(pdf.pages, 1);
}

#[test]
fn test_long_notes_span_pages() {
    let mut doc = Document::new();
    let paragraph = "word ".repeat(2_000);
    doc.add_block(None, BlockKind::Text(paragraph)).unwrap();
    for _ in 0..3 {
        doc.add_block(None, BlockKind::Drawing(sketch())).unwrap();
    }

    let pdf = render_pdf(&doc, "Ana", "today").unwrap();
    assert!(pdf.pages > 2);
}

#[test]
fn test_export_is_written_next_to_the_notes() {
    let dir = tempfile::tempdir().unwrap();
    let store = NoteStore::new(dir.path());
    let doc = Document::new();
    let pdf = render_pdf(&doc, "Ana", "today").unwrap();

    let stem = export::file_stem("Week 3: vectors/matrices");
    let path = store.write_export(&stem, &pdf.bytes).unwrap();
    assert_eq!(path, store.export_dir().join("Week 3_ vectors_matrices.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), pdf.bytes);

    // Exports live in their own folder and stay out of the notes list
    assert!(store.list().unwrap().is_empty());

    assert!(matches!(
        store.write_export("../escape", &pdf.bytes),
        Err(PersistenceError::InvalidName(_))
    ));
}
