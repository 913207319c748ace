use std::fmt;

use egui::{Color32, Pos2, Rect, pos2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use kurbo::{BezPath, Shape};
use uuid::Uuid;

use crate::error::MalformedObject;
use crate::geometry::{self, FLATTEN_TOLERANCE, finite, to_point};

/// Fill color that marks a rectangle as the eraser's selection.
///
/// Never offered to users as a drawing color.
pub const ERASER_FILL: Color32 = Color32::from_rgb(0xc7, 0x51, 0xc6);

/// Unique identifier of an object on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single drawing instruction of a path object.
///
/// Stored in the canvas array form: `["M", x, y]`, `["L", x, y]`,
/// `["Q", cx, cy, x, y]` and `["Z"]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub enum PathCommand {
    MoveTo(Pos2),
    LineTo(Pos2),
    QuadCurveTo(Pos2, Pos2),
    Close,
}

impl PathCommand {
    pub fn letter(&self) -> char {
        match self {
            PathCommand::MoveTo(_) => 'M',
            PathCommand::LineTo(_) => 'L',
            PathCommand::QuadCurveTo(..) => 'Q',
            PathCommand::Close => 'Z',
        }
    }

    /// Coordinates the command names explicitly, control point included
    pub fn points(&self) -> Vec<Pos2> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::QuadCurveTo(ctrl, to) => vec![ctrl, to],
            PathCommand::Close => Vec::new(),
        }
    }
}

impl TryFrom<Vec<Value>> for PathCommand {
    type Error = MalformedObject;

    fn try_from(raw: Vec<Value>) -> Result<Self, Self::Error> {
        let Some((op, args)) = raw.split_first() else {
            return Err(MalformedObject::UnknownCommand(String::new()));
        };
        let op = op.as_str().ok_or_else(|| MalformedObject::UnknownCommand(op.to_string()))?;

        let mut chars = op.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(letter), None) => letter,
            _ => return Err(MalformedObject::UnknownCommand(op.to_owned())),
        };
        let expected = match letter {
            'M' | 'L' => 2,
            'Q' => 4,
            'Z' | 'z' => 0,
            _ => return Err(MalformedObject::UnknownCommand(op.to_owned())),
        };
        if args.len() != expected {
            return Err(MalformedObject::WrongArity {
                command: letter,
                expected,
                found: args.len(),
            });
        }

        let coords = args
            .iter()
            .map(|arg| arg.as_f64().map(|n| n as f32).ok_or(MalformedObject::NonNumeric(letter)))
            .collect::<Result<Vec<f32>, _>>()?;

        Ok(match letter {
            'M' => PathCommand::MoveTo(pos2(coords[0], coords[1])),
            'L' => PathCommand::LineTo(pos2(coords[0], coords[1])),
            'Q' => PathCommand::QuadCurveTo(pos2(coords[0], coords[1]), pos2(coords[2], coords[3])),
            _ => PathCommand::Close,
        })
    }
}

impl From<PathCommand> for Vec<Value> {
    fn from(command: PathCommand) -> Self {
        let mut raw = vec![Value::from(command.letter().to_string())];
        for p in command.points() {
            raw.push(Value::from(p.x));
            raw.push(Value::from(p.y));
        }
        raw
    }
}

/// Freeform stroke or polygon outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathObject {
    pub commands: Vec<PathCommand>,
}

impl PathObject {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    fn to_path(&self) -> Result<BezPath, MalformedObject> {
        let mut outline = BezPath::new();
        let mut started = false;
        for command in &self.commands {
            for p in command.points() {
                finite(p, "path")?;
            }
            match *command {
                PathCommand::MoveTo(p) => {
                    outline.move_to(to_point(p));
                    started = true;
                }
                _ if !started => return Err(MalformedObject::MissingMoveTo(command.letter())),
                PathCommand::LineTo(p) => outline.line_to(to_point(p)),
                PathCommand::QuadCurveTo(ctrl, to) => outline.quad_to(to_point(ctrl), to_point(to)),
                PathCommand::Close => outline.close_path(),
            }
        }
        Ok(outline)
    }

    /// Polylines approximating each subpath within `tolerance` pixels.
    ///
    /// Empty when the commands do not form a valid outline.
    pub fn polylines(&self, tolerance: f64) -> Vec<Vec<Pos2>> {
        match self.to_path() {
            Ok(outline) => geometry::flatten(&outline, tolerance),
            Err(err) => {
                log::debug!("Not flattening path: {}", err);
                Vec::new()
            }
        }
    }
}

/// Straight segment whose endpoints are offsets from the `left`/`top` anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineObject {
    pub left: f32,
    pub top: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl LineObject {
    pub fn endpoints(&self) -> (Pos2, Pos2) {
        (
            pos2(self.left + self.x1, self.top + self.y1),
            pos2(self.left + self.x2, self.top + self.y2),
        )
    }
}

/// Circle anchored at `left`/`top`; the center sits one radius away from the
/// anchor in the direction of `angle` (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleObject {
    pub left: f32,
    pub top: f32,
    pub radius: f32,
    pub angle: f32,
}

impl CircleObject {
    pub fn center(&self) -> Pos2 {
        let theta = self.angle.to_radians();
        pos2(
            self.left + self.radius * theta.cos(),
            self.top + self.radius * theta.sin(),
        )
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectObject {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl RectObject {
    pub fn bounds(&self) -> Rect {
        geometry::rect_from_origin(self.left, self.top, self.width, self.height)
    }
}

/// Geometry of anything a user can place on a canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DrawableObject {
    Path(PathObject),
    Line(LineObject),
    Circle(CircleObject),
    Rect(RectObject),
}

impl DrawableObject {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawableObject::Path(_) => "path",
            DrawableObject::Line(_) => "line",
            DrawableObject::Circle(_) => "circle",
            DrawableObject::Rect(_) => "rect",
        }
    }

    /// Discrete points the object's outline visits.
    ///
    /// Circles have none, their containment is decided analytically. A
    /// zero-radius circle is a dot and its center is its only vertex.
    pub fn vertices(&self) -> Result<Vec<Pos2>, MalformedObject> {
        let points = match self {
            DrawableObject::Path(path) => path.commands.iter().flat_map(PathCommand::points).collect(),
            DrawableObject::Line(line) => {
                let (a, b) = line.endpoints();
                vec![a, b]
            }
            DrawableObject::Circle(circle) if circle.radius == 0.0 => vec![circle.center()],
            DrawableObject::Circle(_) => Vec::new(),
            DrawableObject::Rect(rect) => {
                let r = rect.bounds();
                vec![r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom()]
            }
        };
        points.into_iter().map(|p| finite(p, self.kind())).collect()
    }

    /// Outline of the object; empty for a zero-radius circle
    pub fn to_path(&self) -> Result<BezPath, MalformedObject> {
        match self {
            DrawableObject::Path(path) => path.to_path(),
            DrawableObject::Line(line) => {
                let (a, b) = line.endpoints();
                let line = kurbo::Line::new(to_point(finite(a, "line")?), to_point(finite(b, "line")?));
                Ok(line.to_path(FLATTEN_TOLERANCE))
            }
            DrawableObject::Circle(circle) => {
                if !circle.radius.is_finite() {
                    return Err(MalformedObject::NonFinite("circle"));
                }
                if circle.radius < 0.0 {
                    return Err(MalformedObject::NegativeRadius(circle.radius));
                }
                let center = finite(circle.center(), "circle")?;
                if circle.radius == 0.0 {
                    return Ok(BezPath::new());
                }
                Ok(kurbo::Circle::new(to_point(center), circle.radius as f64).to_path(FLATTEN_TOLERANCE))
            }
            DrawableObject::Rect(rect) => {
                let bounds = rect.bounds();
                finite(bounds.min, "rect")?;
                finite(bounds.max, "rect")?;
                Ok(geometry::to_kurbo_rect(bounds).to_path(FLATTEN_TOLERANCE))
            }
        }
    }

    /// Axis-aligned box holding the whole outline.
    ///
    /// Paths use the hull of their control points, which encloses every
    /// quadratic segment. `Rect::NOTHING` when a coordinate is not finite.
    pub fn bounds(&self) -> Rect {
        match self {
            DrawableObject::Circle(circle) if circle.radius.is_finite() && circle.radius >= 0.0 => {
                Rect::from_center_size(circle.center(), egui::Vec2::splat(circle.radius * 2.0))
            }
            DrawableObject::Circle(_) => Rect::NOTHING,
            _ => geometry::bounds_of(self.vertices().unwrap_or_default()),
        }
    }
}

/// Colors and width a shape is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectStyle {
    pub stroke: Color32,
    pub fill: Color32,
    pub stroke_width: f32,
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            stroke: Color32::from_rgb(0xcc, 0xcc, 0xcc),
            fill: Color32::from_rgb(0xee, 0xee, 0xee),
            stroke_width: 5.0,
        }
    }
}

/// A styled shape on a canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    #[serde(default)]
    pub id: ObjectId,
    #[serde(default)]
    pub style: ObjectStyle,
    pub shape: DrawableObject,
}

impl CanvasObject {
    pub fn new(shape: DrawableObject, style: ObjectStyle) -> Self {
        Self {
            id: ObjectId::new(),
            style,
            shape,
        }
    }

    pub fn is_eraser(&self) -> bool {
        EraserRect::from_object(self).is_some()
    }
}

/// Entry of a canvas list: either a readable object or raw data kept as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanvasItem {
    Object(CanvasObject),
    Malformed(Value),
}

impl CanvasItem {
    pub fn id(&self) -> Option<ObjectId> {
        match self {
            CanvasItem::Object(object) => Some(object.id),
            CanvasItem::Malformed(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&CanvasObject> {
        match self {
            CanvasItem::Object(object) => Some(object),
            CanvasItem::Malformed(_) => None,
        }
    }
}

impl From<CanvasObject> for CanvasItem {
    fn from(object: CanvasObject) -> Self {
        CanvasItem::Object(object)
    }
}

/// The eraser's selection rectangle, identified by the object it was drawn as
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraserRect {
    id: ObjectId,
    rect: RectObject,
}

impl EraserRect {
    /// Recognizes a rectangle carrying the reserved eraser fill
    pub fn from_object(object: &CanvasObject) -> Option<Self> {
        match object.shape {
            DrawableObject::Rect(rect) if object.style.fill == ERASER_FILL => Some(Self {
                id: object.id,
                rect,
            }),
            _ => None,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.rect.bounds()
    }
}
