// ============================================================================
// Module: api
// ============================================================================
// HTTP clients for the external collaborators: the market-data provider,
// the payments backend (user surface), and the back-office admin API.
// ============================================================================

pub mod admin;
pub mod backend;
pub mod market;

pub use admin::{AdminClient, Resource};
pub use backend::{BackendClient, MailRequest};
pub use market::fetch_market_data;
