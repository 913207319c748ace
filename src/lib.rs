#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod config;
pub mod document;
pub mod eraser;
pub mod export;
pub mod error;
pub mod geometry;
pub mod panels;
pub mod persistence;
pub mod util;
pub mod widgets;

pub use app::NotesApp;
pub use canvas::{Canvas, CanvasItem, CanvasObject, DrawableObject, EraserRect, Tool, ToolSettings};
pub use config::Config;
pub use document::{Block, BlockId, BlockKind, Document};
pub use eraser::remove_intersecting;
pub use error::{
    ConfigError, DocumentError, EraseError, ExportError, MalformedObject, PersistenceError,
};
pub use persistence::NoteStore;
