use egui::{Color32, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui};

use crate::canvas::{CANVAS_SIZE, Canvas, CanvasObject, DrawableObject, Tool, ToolSettings};
use crate::geometry::FLATTEN_TOLERANCE;

/// Semi-transparent eraser selection shown while dragging
const ERASER_PREVIEW: Color32 = Color32::from_rgba_premultiplied(0x4b, 0x1e, 0x4a, 96);

/// Interactive view of one canvas.
///
/// Holds the gesture in progress; the canvas itself only receives finished shapes.
#[derive(Debug, Default)]
pub struct CanvasView {
    gesture: Vec<Pos2>,
    generation: u64,
}

impl CanvasView {
    /// Draws the canvas and turns pointer input into objects using `settings`.
    ///
    /// Returns true when the canvas content changed.
    pub fn show(&mut self, ui: &mut Ui, canvas: &mut Canvas, settings: &ToolSettings) -> bool {
        let (response, painter) = ui.allocate_painter(CANVAS_SIZE, Sense::click_and_drag());
        let rect = response.rect;
        let origin = rect.min;

        if self.generation != canvas.generation() {
            self.gesture.clear();
            self.generation = canvas.generation();
        }

        paint_canvas(&painter, rect, canvas, ui.visuals().extreme_bg_color);
        painter.rect_stroke(rect, 0.0, ui.visuals().widgets.active.bg_stroke);

        let pointer = response.interact_pointer_pos().map(|p| (p - origin).to_pos2());
        let mut finished = false;

        match settings.tool {
            Tool::Point => {
                if let (true, Some(p)) = (response.clicked(), pointer) {
                    self.gesture = vec![p];
                    finished = true;
                }
            }
            Tool::Polygon => {
                if let (true, Some(p)) = (response.clicked(), pointer) {
                    self.extend_gesture(p);
                }
                finished = response.double_clicked() || response.secondary_clicked();
            }
            _ => {
                if response.drag_started() {
                    self.gesture.clear();
                }
                if let (true, Some(p)) = (response.dragged(), pointer) {
                    self.extend_gesture(p);
                }
                finished = response.drag_stopped();
            }
        }

        if !finished {
            paint_gesture(&painter, &self.gesture, settings, origin);
            return false;
        }

        let points = std::mem::take(&mut self.gesture);
        let Some(shape) = settings.tool.build(&points, settings.point_radius) else {
            return false;
        };
        canvas.push(CanvasObject::new(shape, settings.style()));

        if settings.tool == Tool::Eraser {
            match canvas.commit_eraser() {
                Ok(_) => self.generation = canvas.generation(),
                Err(err) => log::error!("Eraser failed: {}", err),
            }
        }
        true
    }

    fn extend_gesture(&mut self, p: Pos2) {
        if self.gesture.last() != Some(&p) {
            self.gesture.push(p);
        }
    }
}

/// Read-only rendering of a canvas
pub fn show_static(ui: &mut Ui, canvas: &Canvas) {
    let (response, painter) = ui.allocate_painter(CANVAS_SIZE, Sense::hover());
    paint_canvas(&painter, response.rect, canvas, Color32::TRANSPARENT);
}

fn paint_canvas(painter: &Painter, rect: Rect, canvas: &Canvas, background: Color32) {
    painter.rect_filled(rect, 0.0, background);
    for object in canvas.items().iter().filter_map(|item| item.as_object()) {
        paint_object(painter, object, rect.min);
    }
}

fn paint_object(painter: &Painter, object: &CanvasObject, origin: Pos2) {
    let offset = origin.to_vec2();
    let stroke = Stroke::new(object.style.stroke_width, object.style.stroke);

    match &object.shape {
        DrawableObject::Path(path) => {
            for line in path.polylines(FLATTEN_TOLERANCE) {
                let points: Vec<Pos2> = line.into_iter().map(|p| p + offset).collect();
                if points.len() == 1 || points.windows(2).all(|w| w[0] == w[1]) {
                    painter.circle_filled(points[0], stroke.width / 2.0, stroke.color);
                } else {
                    painter.add(Shape::line(points, stroke));
                }
            }
        }
        DrawableObject::Line(line) => {
            let (a, b) = line.endpoints();
            painter.line_segment([a + offset, b + offset], stroke);
        }
        DrawableObject::Circle(circle) => {
            painter.circle(circle.center() + offset, circle.radius, object.style.fill, stroke);
        }
        DrawableObject::Rect(rect) => {
            painter.rect(rect.bounds().translate(offset), 0.0, object.style.fill, stroke);
        }
    }
}

fn paint_gesture(painter: &Painter, gesture: &[Pos2], settings: &ToolSettings, origin: Pos2) {
    let (Some(&first), Some(&last)) = (gesture.first(), gesture.last()) else {
        return;
    };
    let offset = origin.to_vec2();
    let stroke = Stroke::new(settings.stroke_width, settings.stroke);

    match settings.tool {
        Tool::Eraser => {
            let rect = Rect::from_two_pos(first + offset, last + offset);
            painter.rect(rect, 0.0, ERASER_PREVIEW, Stroke::new(1.0, ERASER_PREVIEW));
        }
        _ => {
            if let Some(shape) = settings.tool.build(gesture, settings.point_radius) {
                let preview = CanvasObject::new(shape, settings.style());
                paint_object(painter, &preview, origin);
            }
        }
    }
}
