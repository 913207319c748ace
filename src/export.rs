//! Printable PDF of a notes document: the title, every text block and every
//! drawing, laid out top to bottom on A4 pages.

use egui::{Color32, Pos2};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, LineCapStyle, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};

use crate::canvas::{CANVAS_SIZE, Canvas, CanvasItem};
use crate::document::{BlockKind, DEFAULT_TITLE, Document};
use crate::error::ExportError;
use crate::geometry;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 22.0;
const HEADING_SIZES: [f32; 3] = [18.0, 15.0, 13.0];
const BODY_SIZE: f32 = 11.0;
const LINE_SPACING: f32 = 1.4;
const BLOCK_GAP: f32 = 5.0;

/// Characters per line at body size
const BODY_COLUMNS: usize = 90;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Flattening tolerance for drawings, in canvas pixels
const CURVE_TOLERANCE: f64 = 0.5;

/// A rendered document
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Renders `doc` with a byline naming `author` and `date`
pub fn render_pdf(doc: &Document, author: &str, date: &str) -> Result<RenderedPdf, ExportError> {
    let title = doc.title().unwrap_or(DEFAULT_TITLE);
    let mut writer = PageWriter::new(title)?;

    for line in wrap(title, columns_at(TITLE_SIZE)) {
        writer.text_line(&line, TITLE_SIZE, true);
    }
    writer.text_line(&format!("{author} - {date}"), BODY_SIZE, false);
    writer.gap(BLOCK_GAP);

    for kind in doc.printable() {
        match kind {
            BlockKind::Text(text) => writer.markdown(text),
            BlockKind::Drawing(canvas) => writer.drawing(canvas),
            BlockKind::Title(_) => {}
        }
    }

    writer.finish()
}

/// File name stem for the export of a document titled `title`
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        "notes".to_string()
    } else {
        stem.to_string()
    }
}

/// Greedy word wrap to `columns` characters; longer words are split
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(columns) {
            let len = current.chars().count();
            if len > 0 && len + 1 + piece.len() > columns {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Whether strokes are, on average, light enough to vanish on white paper
pub fn is_light(strokes: impl IntoIterator<Item = Color32>) -> bool {
    let (sum, count) = strokes.into_iter().fold((0.0, 0usize), |(sum, count), color| {
        let luminance = 0.299 * color.r() as f32 + 0.587 * color.g() as f32 + 0.114 * color.b() as f32;
        (sum + luminance, count + 1)
    });
    count > 0 && sum / count as f32 > 127.0
}

/// Text, size in points and weight of one markdown source line
fn markdown_line(line: &str) -> (String, f32, bool) {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&level) && trimmed[level..].starts_with(' ') {
        let size = HEADING_SIZES[(level - 1).min(HEADING_SIZES.len() - 1)];
        return (plain(&trimmed[level + 1..]), size, true);
    }

    let text = match trimmed.strip_prefix("* ").or_else(|| trimmed.strip_prefix("+ ")) {
        Some(item) => format!("- {item}"),
        None => line.to_string(),
    };
    (plain(&text), BODY_SIZE, false)
}

/// Drops inline emphasis and code markers
fn plain(text: &str) -> String {
    text.replace("**", "").replace("__", "").replace('`', "")
}

fn columns_at(size: f32) -> usize {
    (BODY_COLUMNS as f32 * BODY_SIZE / size) as usize
}

fn ink(color: Color32, inverted: bool) -> Color {
    let channel = |c: u8| {
        let c = if inverted { 255 - c } else { c };
        c as f32 / 255.0
    };
    Color::Rgb(Rgb::new(channel(color.r()), channel(color.g()), channel(color.b()), None))
}

fn pdf_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

/// Writes content downwards, starting a new page when the current one is full
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance of the next free line from the bottom of the page, in mm
    cursor: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn reserve(&mut self, height: f32) {
        if self.cursor - height >= MARGIN {
            return;
        }
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn gap(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn text_line(&mut self, text: &str, size: f32, bold: bool) {
        let height = size * PT_TO_MM * LINE_SPACING;
        self.reserve(height);
        self.cursor -= height;
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.cursor), font);
    }

    fn markdown(&mut self, text: &str) {
        for line in text.lines() {
            let (content, size, bold) = markdown_line(line);
            if content.trim().is_empty() {
                self.gap(BODY_SIZE * PT_TO_MM);
                continue;
            }
            for wrapped in wrap(&content, columns_at(size)) {
                self.text_line(&wrapped, size, bold);
            }
        }
        self.gap(BLOCK_GAP);
    }

    fn drawing(&mut self, canvas: &Canvas) {
        let scale = CONTENT_WIDTH / CANVAS_SIZE.x;
        let height = CANVAS_SIZE.y * scale;
        self.reserve(height);
        let top = self.cursor;
        let to_page = |p: Pos2| Point::new(Mm(MARGIN + p.x * scale), Mm(top - p.y * scale));

        self.layer.set_outline_color(ink(Color32::GRAY, false));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: [
                egui::pos2(0.0, 0.0),
                egui::pos2(CANVAS_SIZE.x, 0.0),
                egui::pos2(CANVAS_SIZE.x, CANVAS_SIZE.y),
                egui::pos2(0.0, CANVAS_SIZE.y),
            ]
            .into_iter()
            .map(|p| (to_page(p), false))
            .collect(),
            is_closed: true,
        });

        let objects: Vec<_> = canvas.items().iter().filter_map(CanvasItem::as_object).collect();
        let inverted = is_light(objects.iter().map(|object| object.style.stroke));
        self.layer.set_line_cap_style(LineCapStyle::Round);

        for object in objects {
            let polylines = match object.shape.to_path() {
                Ok(outline) if outline.segments().next().is_some() => {
                    geometry::flatten(&outline, CURVE_TOLERANCE)
                }
                // Dots have no outline, only their vertex
                Ok(_) => object.shape.vertices().unwrap_or_default().into_iter().map(|p| vec![p]).collect(),
                Err(err) => {
                    log::debug!("Not exporting {} {}: {}", object.shape.kind(), object.id, err);
                    continue;
                }
            };

            self.layer.set_outline_color(ink(object.style.stroke, inverted));
            self.layer.set_outline_thickness(object.style.stroke_width * scale / PT_TO_MM);
            for mut polyline in polylines {
                if polyline.len() == 1 {
                    polyline.push(polyline[0]);
                }
                self.layer.add_line(Line {
                    points: polyline.into_iter().map(|p| (to_page(p), false)).collect(),
                    is_closed: false,
                });
            }
        }

        self.cursor = top - height;
        self.gap(BLOCK_GAP);
    }

    fn finish(self) -> Result<RenderedPdf, ExportError> {
        let pages = self.pages;
        let bytes = self.doc.save_to_bytes().map_err(pdf_error)?;
        log::info!("Rendered {} pages ({} bytes) of PDF", pages, bytes.len());
        Ok(RenderedPdf { bytes, pages })
    }
}
