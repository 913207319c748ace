mod object;
pub mod tool;

use serde::{Deserialize, Serialize};

pub use object::{
    CanvasItem, CanvasObject, CircleObject, DrawableObject, ERASER_FILL, EraserRect, LineObject,
    ObjectId, ObjectStyle, PathCommand, PathObject, RectObject,
};
pub use tool::{Tool, ToolSettings};

use crate::eraser;
use crate::error::EraseError;

/// Drawing area of a canvas block, in canvas pixels
pub const CANVAS_SIZE: egui::Vec2 = egui::Vec2::new(500.0, 400.0);

/// Ordered list of everything drawn on one canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    items: Vec<CanvasItem>,
    /// Bumped whenever the list is replaced wholesale, so views can drop
    /// gestures started against the old content
    #[serde(skip)]
    generation: u64,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: CanvasObject) {
        self.items.push(CanvasItem::Object(object));
    }

    pub fn items(&self) -> &[CanvasItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.generation += 1;
    }

    /// The most recent object, when it is an eraser selection
    pub fn last_eraser(&self) -> Option<EraserRect> {
        self.items
            .last()
            .and_then(CanvasItem::as_object)
            .and_then(EraserRect::from_object)
    }

    /// Applies a just-finished eraser selection.
    ///
    /// Returns `Ok(false)` when the last object is not an eraser selection.
    pub fn commit_eraser(&mut self) -> Result<bool, EraseError> {
        let Some(rect) = self.last_eraser() else {
            return Ok(false);
        };
        self.items = eraser::remove_intersecting(&self.items, &rect)?;
        self.generation += 1;
        Ok(true)
    }
}
