//! Rectangle tests and the bridge between egui coordinates and kurbo outlines.

use egui::{Pos2, Rect};
use kurbo::{BezPath, Line, PathEl, PathSeg, Shape};

use crate::error::MalformedObject;

/// Flattening tolerance for outlines, in canvas pixels
pub const FLATTEN_TOLERANCE: f64 = 0.25;

pub fn to_point(p: Pos2) -> kurbo::Point {
    kurbo::Point::new(p.x as f64, p.y as f64)
}

pub fn to_pos2(p: kurbo::Point) -> Pos2 {
    egui::pos2(p.x as f32, p.y as f32)
}

pub fn to_kurbo_rect(rect: Rect) -> kurbo::Rect {
    kurbo::Rect::from_points(to_point(rect.min), to_point(rect.max))
}

/// Rejects NaN and infinite coordinates before they reach the outline math
pub(crate) fn finite(p: Pos2, what: &'static str) -> Result<Pos2, MalformedObject> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(p)
    } else {
        Err(MalformedObject::NonFinite(what))
    }
}

/// Axis-aligned rectangle from an anchor and a size; negative sizes extend left/up
pub fn rect_from_origin(left: f32, top: f32, width: f32, height: f32) -> Rect {
    Rect::from_two_pos(egui::pos2(left, top), egui::pos2(left + width, top + height))
}

/// Closed-bounds containment: points on an edge count as inside
pub fn contains_inclusive(rect: Rect, p: Pos2) -> bool {
    rect.min.x <= p.x && p.x <= rect.max.x && rect.min.y <= p.y && p.y <= rect.max.y
}

/// Circle overlaps the rectangle when the rectangle's closest point to the
/// center lies strictly within `radius`. A circle merely tangent to an edge
/// does not overlap.
pub fn circle_overlaps_rect(center: Pos2, radius: f32, rect: Rect) -> bool {
    let closest_x = center.x.clamp(rect.min.x, rect.max.x);
    let closest_y = center.y.clamp(rect.min.y, rect.max.y);
    let dx = center.x - closest_x;
    let dy = center.y - closest_y;
    dx * dx + dy * dy < radius * radius
}

/// Bounding box of a set of points, `Rect::NOTHING` when empty
pub fn bounds_of(points: impl IntoIterator<Item = Pos2>) -> Rect {
    let mut points = points.into_iter();
    let Some(first) = points.next() else {
        return Rect::NOTHING;
    };
    points.fold(Rect::from_min_max(first, first), |rect, p| rect.union(Rect::from_min_max(p, p)))
}

/// Edges of `rect` as lines, skipping the zero-length ones of a degenerate rectangle
pub fn rect_edges(rect: Rect) -> Vec<Line> {
    to_kurbo_rect(rect)
        .path_segments(FLATTEN_TOLERANCE)
        .filter_map(|seg| match seg {
            PathSeg::Line(line) if line.p0 != line.p1 => Some(line),
            _ => None,
        })
        .collect()
}

/// Whether any segment of `outline` meets one of `edges`.
///
/// kurbo reports no intersection for collinear overlap. Against axis-aligned
/// edges such an outline either has an endpoint on the edge or passes
/// through a corner, where the perpendicular edge catches it.
pub fn outline_crosses(outline: &BezPath, edges: &[Line]) -> bool {
    outline
        .segments()
        .any(|seg| edges.iter().any(|edge| !seg.intersect_line(*edge).is_empty()))
}

/// Flattens `outline` into one polyline per subpath
pub fn flatten(outline: &BezPath, tolerance: f64) -> Vec<Vec<Pos2>> {
    let mut lines: Vec<Vec<Pos2>> = Vec::new();
    kurbo::flatten(outline.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => lines.push(vec![to_pos2(p)]),
        PathEl::LineTo(p) => {
            if let Some(line) = lines.last_mut() {
                line.push(to_pos2(p));
            }
        }
        PathEl::ClosePath => {
            if let Some(line) = lines.last_mut() {
                if let Some(&start) = line.first() {
                    line.push(start);
                }
            }
        }
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    lines
}
