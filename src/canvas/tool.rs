use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use super::{
    CircleObject, DrawableObject, ERASER_FILL, LineObject, ObjectStyle, PathCommand, PathObject,
    RectObject,
};
use crate::error::ToolError;

/// Fill used when the requested one is not allowed
pub const DEFAULT_FILL: Color32 = Color32::from_rgb(0xee, 0xee, 0xee);
pub const DEFAULT_STROKE: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

/// Drawing tools offered on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Freedraw,
    Eraser,
    Line,
    Rect,
    Circle,
    Polygon,
    Point,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Freedraw,
        Tool::Eraser,
        Tool::Line,
        Tool::Rect,
        Tool::Circle,
        Tool::Polygon,
        Tool::Point,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Freedraw => "freedraw",
            Tool::Eraser => "eraser",
            Tool::Line => "line",
            Tool::Rect => "rect",
            Tool::Circle => "circle",
            Tool::Polygon => "polygon",
            Tool::Point => "point",
        }
    }

    /// The shape the tool actually draws; the eraser draws a selection rectangle
    pub fn drawing_mode(&self) -> Tool {
        match self {
            Tool::Eraser => Tool::Rect,
            other => *other,
        }
    }

    /// Builds the shape for a finished gesture, in canvas coordinates.
    ///
    /// Drag tools use the first and last points; freedraw and polygon use all
    /// of them. Returns `None` when the gesture is too short for the tool.
    pub fn build(&self, points: &[Pos2], point_radius: f32) -> Option<DrawableObject> {
        let (&first, &last) = (points.first()?, points.last()?);
        match self.drawing_mode() {
            Tool::Freedraw => Some(freedraw(points)),
            Tool::Line => Some(line(first, last)),
            Tool::Rect => Some(rect(first, last)),
            Tool::Circle => Some(circle(first, last)),
            Tool::Point => Some(point(first, point_radius)),
            Tool::Polygon => polygon(points),
            Tool::Eraser => None,
        }
    }
}

/// Current tool and the style new shapes get
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool: Tool,
    pub stroke: Color32,
    pub stroke_width: f32,
    pub point_radius: f32,
    #[serde(deserialize_with = "user_fill")]
    fill: Color32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            stroke: DEFAULT_STROKE,
            stroke_width: 5.0,
            point_radius: 3.0,
            fill: DEFAULT_FILL,
        }
    }
}

impl ToolSettings {
    pub fn fill(&self) -> Color32 {
        self.fill
    }

    /// Sets the user fill; the eraser marker is refused and replaced by the default
    pub fn set_fill(&mut self, fill: Color32) -> Result<(), ToolError> {
        if fill == ERASER_FILL {
            self.fill = DEFAULT_FILL;
            return Err(ToolError::ReservedColor(hex(fill)));
        }
        self.fill = fill;
        Ok(())
    }

    /// Style for the next shape; the eraser tool always carries the marker fill
    pub fn style(&self) -> ObjectStyle {
        ObjectStyle {
            stroke: self.stroke,
            fill: if self.tool == Tool::Eraser {
                ERASER_FILL
            } else {
                self.fill
            },
            stroke_width: self.stroke_width,
        }
    }
}

/// Restored settings get the same reserved-color check as [`ToolSettings::set_fill`]
fn user_fill<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
    let mut settings = ToolSettings::default();
    if let Err(err) = settings.set_fill(Color32::deserialize(deserializer)?) {
        log::warn!("Ignoring stored fill: {}", err);
    }
    Ok(settings.fill)
}

fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    egui::pos2((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Smoothed stroke: quadratic curves through the midpoints between samples
fn freedraw(points: &[Pos2]) -> DrawableObject {
    let mut commands = vec![PathCommand::MoveTo(points[0])];
    if points.len() == 1 {
        commands.push(PathCommand::LineTo(points[0]));
    } else {
        for pair in points.windows(2) {
            commands.push(PathCommand::QuadCurveTo(pair[0], midpoint(pair[0], pair[1])));
        }
        commands.push(PathCommand::LineTo(points[points.len() - 1]));
    }
    DrawableObject::Path(PathObject::new(commands))
}

fn line(start: Pos2, end: Pos2) -> DrawableObject {
    DrawableObject::Line(LineObject {
        left: start.x,
        top: start.y,
        x1: 0.0,
        y1: 0.0,
        x2: end.x - start.x,
        y2: end.y - start.y,
    })
}

fn rect(start: Pos2, end: Pos2) -> DrawableObject {
    DrawableObject::Rect(RectObject {
        left: start.x.min(end.x),
        top: start.y.min(end.y),
        width: (end.x - start.x).abs(),
        height: (end.y - start.y).abs(),
    })
}

/// Circle spanning the drag: anchored at the start, centered on the midpoint
fn circle(start: Pos2, end: Pos2) -> DrawableObject {
    let delta = end - start;
    DrawableObject::Circle(CircleObject {
        left: start.x,
        top: start.y,
        radius: delta.length() / 2.0,
        angle: delta.y.atan2(delta.x).to_degrees(),
    })
}

fn point(at: Pos2, radius: f32) -> DrawableObject {
    DrawableObject::Circle(CircleObject {
        left: at.x - radius,
        top: at.y,
        radius,
        angle: 0.0,
    })
}

fn polygon(points: &[Pos2]) -> Option<DrawableObject> {
    if points.len() < 2 {
        return None;
    }
    let mut commands = vec![PathCommand::MoveTo(points[0])];
    commands.extend(points[1..].iter().map(|&p| PathCommand::LineTo(p)));
    commands.push(PathCommand::Close);
    Some(DrawableObject::Path(PathObject::new(commands)))
}
