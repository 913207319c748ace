//! Removal of canvas objects touched by the eraser rectangle.

use egui::Rect;
use kurbo::Line;

use crate::canvas::{CanvasItem, DrawableObject, EraserRect};
use crate::error::{EraseError, MalformedObject};
use crate::geometry;

/// Returns the canvas list without the eraser and without every object that
/// touches or lies inside it.
///
/// Survivors keep their relative order and are returned unchanged. Items whose
/// geometry cannot be interpreted are always kept. The eraser must be one of
/// `objects`, otherwise the caller's list is out of sync and
/// [`EraseError::EraserNotFound`] is returned.
pub fn remove_intersecting(
    objects: &[CanvasItem],
    eraser: &EraserRect,
) -> Result<Vec<CanvasItem>, EraseError> {
    if !objects.iter().any(|item| item.id() == Some(eraser.id())) {
        return Err(EraseError::EraserNotFound(eraser.id()));
    }

    let bounds = eraser.bounds();
    let edges = geometry::rect_edges(bounds);

    let mut kept = Vec::with_capacity(objects.len().saturating_sub(1));
    for item in objects {
        let object = match item {
            CanvasItem::Object(object) if object.id == eraser.id() => continue,
            CanvasItem::Object(object) => object,
            CanvasItem::Malformed(raw) => {
                log::warn!(
                    "Keeping unreadable canvas object (type {})",
                    raw.get("type").unwrap_or(&serde_json::Value::Null)
                );
                kept.push(item.clone());
                continue;
            }
        };

        match overlaps(&object.shape, bounds, &edges) {
            Ok(true) => log::debug!("Erasing {} {}", object.shape.kind(), object.id),
            Ok(false) => kept.push(item.clone()),
            Err(err) => {
                log::warn!("Keeping malformed {} {}: {}", object.shape.kind(), object.id, err);
                kept.push(item.clone());
            }
        }
    }

    log::info!(
        "Eraser {} removed {} of {} objects",
        eraser.id(),
        objects.len() - 1 - kept.len(),
        objects.len() - 1
    );
    Ok(kept)
}

/// Whether `shape` touches the eraser rectangle `bounds`.
///
/// A shape is hit when one of its vertices lies within the closed bounds, or
/// when its outline crosses one of `edges`, the edges of `bounds`. Circles
/// also count as hit when the bounds come strictly closer than the radius to
/// their center.
pub fn overlaps(
    shape: &DrawableObject,
    bounds: Rect,
    edges: &[Line],
) -> Result<bool, MalformedObject> {
    let outline = shape.to_path()?;

    if !shape.bounds().intersects(bounds) {
        return Ok(false);
    }

    if shape
        .vertices()?
        .into_iter()
        .any(|p| geometry::contains_inclusive(bounds, p))
    {
        return Ok(true);
    }

    if let DrawableObject::Circle(circle) = shape {
        if geometry::circle_overlaps_rect(circle.center(), circle.radius, bounds) {
            return Ok(true);
        }
    }

    Ok(geometry::outline_crosses(&outline, edges))
}
