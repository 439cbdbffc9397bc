//! The side panel context.

mod controller;
mod view;

pub use controller::{PanelController, PanelError, PanelOutcome, PANEL_MIN_CHARS};
pub use view::{LogView, PanelView, UsageDisplay};
