pub mod canvas_view;

pub use canvas_view::CanvasView;
