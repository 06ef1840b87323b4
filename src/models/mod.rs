// ============================================================================
// Module: models
// ============================================================================
// Data structures shared by the API clients, the app state, and the UI.
// ============================================================================

pub mod balance;
pub mod market;
pub mod transfer;
pub mod user;

pub use balance::{AssetCard, BalanceSheet, ASSET_CARDS};
pub use market::{ChangeRange, MarketCoin, PriceTable};
pub use transfer::{
    asset_by_title, run_pipeline, FieldError, TransferAsset, TransferRequest, TransferStage,
    TransferTimings, TRANSFER_ASSETS,
};
pub use user::{EurDetails, Transaction, TxKind, TxStatus, UserProfile};
