mod central_panel;
mod sidebar;

pub use central_panel::{BlockAction, central_panel};
pub use sidebar::sidebar;
