// ============================================================================
// paydash - terminal client for the international payments backend
// ============================================================================

pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod ui;
