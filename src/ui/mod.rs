// ============================================================================
// Module: ui
// ============================================================================
// Terminal user interface: event handling and per-screen rendering.
// ============================================================================

pub mod dashboard;
pub mod deposit;
pub mod events;
pub mod history;
pub mod support;
pub mod transfer;

pub use dashboard::render;
pub use events::{Event, EventHandler};
