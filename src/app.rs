// ============================================================================
// Application state
// ============================================================================
// Central state for the TUI. Every view reads from App; every mutation goes
// through its methods. The worker thread and the event loop share it behind
// Arc<Mutex<App>>, so methods keep their work short and never block.
// ============================================================================

use std::time::{Duration, Instant};

use crate::api::backend::{DepositAddress, StatusLabel};
use crate::models::{
    ChangeRange, FieldError, PriceTable, TransferRequest, TransferStage, UserProfile,
    TRANSFER_ASSETS,
};

/// How long a toast stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level screens. One active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Transfer,
    History,
    Deposit,
    Support,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Overview => "Overview",
            Screen::Transfer => "Transfer",
            Screen::History => "History",
            Screen::Deposit => "Deposit",
            Screen::Support => "Support Center",
        }
    }
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    shown_at: Instant,
}

// ============================================================================
// Transfer form state
// ============================================================================

/// Editable fields of the transfer form, in tab order. Currency is a
/// selector (cycled left/right), the rest are text buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferField {
    Currency,
    FullName,
    Wallet,
    Network,
    Amount,
}

impl TransferField {
    pub fn label(&self) -> &'static str {
        match self {
            TransferField::Currency => "Currency",
            TransferField::FullName => "Full Name",
            TransferField::Wallet => "Wallet Address",
            TransferField::Network => "Network",
            TransferField::Amount => "Amount",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            TransferField::Currency => TransferField::FullName,
            TransferField::FullName => TransferField::Wallet,
            TransferField::Wallet => TransferField::Network,
            TransferField::Network => TransferField::Amount,
            TransferField::Amount => TransferField::Currency,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            TransferField::Currency => TransferField::Amount,
            TransferField::FullName => TransferField::Currency,
            TransferField::Wallet => TransferField::FullName,
            TransferField::Network => TransferField::Wallet,
            TransferField::Amount => TransferField::Network,
        }
    }
}

/// UI state for the transfer screen: the form being edited plus the
/// simulated pipeline's visual state.
#[derive(Debug, Clone)]
pub struct TransferUi {
    /// Index into TRANSFER_ASSETS for the selected currency.
    pub asset_index: usize,
    pub full_name: String,
    pub wallet: String,
    pub network: String,
    pub amount: String,
    pub active_field: TransferField,
    pub errors: Vec<FieldError>,
    /// Current pipeline stage (Idle when no transfer is running).
    pub stage: TransferStage,
    /// Whether the progress overlay is drawn. Dismissing the overlay hides
    /// it without touching the stage — timers keep running underneath.
    pub overlay_visible: bool,
    /// True from submission until completion/failure; blocks resubmission.
    pub in_flight: bool,
}

impl Default for TransferUi {
    fn default() -> Self {
        // USDT is the default selection; its network pre-fills the form.
        Self {
            asset_index: 0,
            full_name: String::new(),
            wallet: String::new(),
            network: TRANSFER_ASSETS[0].network.to_string(),
            amount: String::new(),
            active_field: TransferField::Currency,
            errors: Vec::new(),
            stage: TransferStage::Idle,
            overlay_visible: false,
            in_flight: false,
        }
    }
}

impl TransferUi {
    pub fn request(&self) -> TransferRequest {
        TransferRequest {
            currency: TRANSFER_ASSETS[self.asset_index].title.to_string(),
            full_name: self.full_name.clone(),
            wallet: self.wallet.clone(),
            network: self.network.clone(),
            amount: self.amount.clone(),
        }
    }

    fn select_asset(&mut self, index: usize) {
        self.asset_index = index % TRANSFER_ASSETS.len();
        // Selecting a currency pre-fills its network.
        self.network = TRANSFER_ASSETS[self.asset_index].network.to_string();
    }

    fn active_buffer(&mut self) -> Option<&mut String> {
        match self.active_field {
            TransferField::Currency => None,
            TransferField::FullName => Some(&mut self.full_name),
            TransferField::Wallet => Some(&mut self.wallet),
            TransferField::Network => Some(&mut self.network),
            TransferField::Amount => Some(&mut self.amount),
        }
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub running: bool,
    pub confirm_quit: bool,
    pub current_screen: Screen,

    /// Last fetched profile (None until the first /users/me succeeds).
    pub profile: Option<UserProfile>,
    /// Last successfully polled price table (empty until the first poll).
    pub prices: PriceTable,
    /// Derived USD total. Display artifact only, never authoritative.
    pub aggregate_balance: f64,
    pub change_range: ChangeRange,

    pub deposit_addresses: Vec<DepositAddress>,
    pub status_labels: Vec<StatusLabel>,

    /// Selection index for whichever list the active screen shows.
    pub selected_index: usize,

    pub transfer: TransferUi,
    pub support_input: String,

    pub notification: Option<Notification>,
    pub is_loading: bool,
    pub loading_message: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            confirm_quit: false,
            current_screen: Screen::Overview,
            profile: None,
            prices: PriceTable::default(),
            aggregate_balance: 0.0,
            change_range: ChangeRange::default(),
            deposit_addresses: Vec::new(),
            status_labels: Vec::new(),
            selected_index: 0,
            transfer: TransferUi::default(),
            support_input: String::new(),
            notification: None,
            is_loading: false,
            loading_message: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ------------------------------------------------------------------
    // Screens and navigation
    // ------------------------------------------------------------------

    pub fn show_screen(&mut self, screen: Screen) {
        if self.current_screen != screen {
            self.current_screen = screen;
            self.selected_index = 0;
        }
    }

    /// Number of rows the active screen's list has (0 when not a list).
    fn list_len(&self) -> usize {
        match self.current_screen {
            Screen::History => self
                .profile
                .as_ref()
                .map(|p| p.transactions.len())
                .unwrap_or(0),
            Screen::Deposit => self.deposit_addresses.len(),
            _ => 0,
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.list_len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    // ------------------------------------------------------------------
    // Data updates (called when worker results arrive)
    // ------------------------------------------------------------------

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
        self.recompute_balance();
    }

    pub fn set_prices(&mut self, prices: PriceTable) {
        self.prices = prices;
        self.recompute_balance();
    }

    /// Recomputed on every profile or price replacement. Guaranteed finite;
    /// zero while either input is missing.
    fn recompute_balance(&mut self) {
        self.aggregate_balance = self
            .profile
            .as_ref()
            .map(|p| p.balance.aggregate_usd(&self.prices))
            .unwrap_or(0.0);
    }

    pub fn cycle_change_range(&mut self) {
        self.change_range = self.change_range.next();
    }

    // ------------------------------------------------------------------
    // Notifications and loading
    // ------------------------------------------------------------------

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    /// Called every loop iteration; expires the toast after its TTL.
    pub fn tick(&mut self) {
        if let Some(notification) = &self.notification {
            if notification.shown_at.elapsed() >= NOTIFICATION_TTL {
                self.notification = None;
            }
        }
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    // ------------------------------------------------------------------
    // Transfer form editing
    // ------------------------------------------------------------------

    pub fn transfer_next_field(&mut self) {
        self.transfer.active_field = self.transfer.active_field.next();
    }

    pub fn transfer_previous_field(&mut self) {
        self.transfer.active_field = self.transfer.active_field.previous();
    }

    pub fn transfer_next_asset(&mut self) {
        let next = (self.transfer.asset_index + 1) % TRANSFER_ASSETS.len();
        self.transfer.select_asset(next);
    }

    pub fn transfer_previous_asset(&mut self) {
        let count = TRANSFER_ASSETS.len();
        let previous = (self.transfer.asset_index + count - 1) % count;
        self.transfer.select_asset(previous);
    }

    pub fn transfer_push_char(&mut self, c: char) {
        if let Some(buffer) = self.transfer.active_buffer() {
            buffer.push(c);
        }
    }

    pub fn transfer_backspace(&mut self) {
        if let Some(buffer) = self.transfer.active_buffer() {
            buffer.pop();
        }
    }

    // ------------------------------------------------------------------
    // Transfer pipeline (visual state; the worker drives the timers)
    // ------------------------------------------------------------------

    /// Validates the form and, if clean, marks the transfer in flight and
    /// returns the request for the worker. Returns None when validation
    /// fails or another transfer is still running — a second submission is
    /// rejected for the full simulated duration.
    pub fn begin_transfer(&mut self) -> Option<TransferRequest> {
        if self.transfer.in_flight {
            self.notify(
                NotificationKind::Error,
                "A transfer is already in progress",
            );
            return None;
        }

        let request = self.transfer.request();
        let errors = request.validate();
        if !errors.is_empty() {
            self.transfer.errors = errors;
            return None;
        }

        self.transfer.errors.clear();
        self.transfer.in_flight = true;
        self.transfer.overlay_visible = true;
        Some(request)
    }

    /// Applies a stage transition reported by the worker. Visibility is
    /// untouched: a dismissed overlay stays hidden through later stages.
    pub fn apply_transfer_stage(&mut self, stage: TransferStage) {
        self.transfer.stage = stage;
        if stage == TransferStage::Completed {
            self.transfer.in_flight = false;
            self.notify(
                NotificationKind::Success,
                "Transfer request submitted successfully!",
            );
        }
    }

    /// The real call failed at the Processing checkpoint: hide the overlay,
    /// show an error, keep the form populated for retry.
    pub fn transfer_failed(&mut self, error: &str) {
        self.transfer.stage = TransferStage::Idle;
        self.transfer.overlay_visible = false;
        self.transfer.in_flight = false;
        self.notify(
            NotificationKind::Error,
            format!("Failed to submit transfer request: {}", error),
        );
    }

    /// Automatic reset a few seconds after completion: clears the form and
    /// returns the pipeline to rest.
    pub fn transfer_reset(&mut self) {
        self.transfer = TransferUi::default();
    }

    /// User dismissal (Esc / click-away): hides the overlay but cancels
    /// nothing — the pipeline and any in-flight call keep going.
    pub fn dismiss_transfer_overlay(&mut self) {
        self.transfer.overlay_visible = false;
    }

    // ------------------------------------------------------------------
    // Support form
    // ------------------------------------------------------------------

    /// Takes the support message if it is non-empty.
    pub fn take_support_message(&mut self) -> Option<String> {
        let message = self.support_input.trim().to_string();
        if message.is_empty() {
            return None;
        }
        self.support_input.clear();
        Some(message)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BalanceSheet, MarketCoin, PriceTable};

    fn profile_with(balance: &[(&str, &str)]) -> UserProfile {
        UserProfile {
            account_id: 1,
            email: "user@example.com".to_string(),
            balance: BalanceSheet(
                balance
                    .iter()
                    .map(|&(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn filled_form(app: &mut App) {
        app.transfer.full_name = "Jane Doe".to_string();
        app.transfer.wallet = "TXkzPm29a41vN7qLrB8".to_string();
        app.transfer.amount = "100".to_string();
    }

    #[test]
    fn aggregate_recomputes_on_profile_and_prices() {
        let mut app = App::new();
        app.set_profile(profile_with(&[("usd", "100"), ("btc", "0.01")]));
        // No prices yet: defined as zero, never NaN.
        assert_eq!(app.aggregate_balance, 0.0);

        app.set_prices(PriceTable::new(vec![MarketCoin::for_test("btc", 65000.0)]));
        assert!((app.aggregate_balance - 750.0).abs() < 1e-9);

        // Profile replaced wholesale: aggregate follows.
        app.set_profile(profile_with(&[("usd", "10")]));
        assert!((app.aggregate_balance - 10.0).abs() < 1e-9);
    }

    #[test]
    fn begin_transfer_validates_before_any_work() {
        let mut app = App::new();
        app.transfer.full_name = "Jane Doe".to_string();
        app.transfer.wallet = "short".to_string();
        app.transfer.amount = "100".to_string();

        assert!(app.begin_transfer().is_none());
        assert_eq!(app.transfer.errors, vec![FieldError::WalletTooShort]);
        assert!(!app.transfer.in_flight);
    }

    #[test]
    fn begin_transfer_rejects_while_in_flight() {
        let mut app = App::new();
        filled_form(&mut app);

        assert!(app.begin_transfer().is_some());
        assert!(app.transfer.in_flight);

        // Second submission while the pipeline runs is refused.
        assert!(app.begin_transfer().is_none());
        assert_eq!(
            app.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }

    #[test]
    fn dismissing_overlay_does_not_stop_the_pipeline() {
        let mut app = App::new();
        filled_form(&mut app);
        app.begin_transfer().unwrap();
        app.apply_transfer_stage(TransferStage::Verification);

        app.dismiss_transfer_overlay();
        assert!(!app.transfer.overlay_visible);
        // Stage and in-flight flag are untouched.
        assert_eq!(app.transfer.stage, TransferStage::Verification);
        assert!(app.transfer.in_flight);

        // Later stage transitions do not resurrect the dismissed overlay.
        app.apply_transfer_stage(TransferStage::Processing);
        app.apply_transfer_stage(TransferStage::Completed);
        assert!(!app.transfer.overlay_visible);
    }

    #[test]
    fn failure_keeps_form_populated_for_retry() {
        let mut app = App::new();
        filled_form(&mut app);
        app.begin_transfer().unwrap();
        app.apply_transfer_stage(TransferStage::Processing);

        app.transfer_failed("mail relay unreachable");
        assert_eq!(app.transfer.stage, TransferStage::Idle);
        assert!(!app.transfer.overlay_visible);
        assert!(!app.transfer.in_flight);
        assert_eq!(app.transfer.full_name, "Jane Doe");
        assert_eq!(app.transfer.amount, "100");
    }

    #[test]
    fn completion_unlocks_submission_and_reset_clears_form() {
        let mut app = App::new();
        filled_form(&mut app);
        app.begin_transfer().unwrap();

        app.apply_transfer_stage(TransferStage::Completed);
        assert!(!app.transfer.in_flight);

        app.transfer_reset();
        assert!(app.transfer.full_name.is_empty());
        assert_eq!(app.transfer.stage, TransferStage::Idle);
    }

    #[test]
    fn selecting_an_asset_prefills_its_network() {
        let mut app = App::new();
        assert_eq!(app.transfer.network, "TRC20");

        app.transfer_next_asset();
        assert_eq!(app.transfer.network, "BTC");

        app.transfer_previous_asset();
        assert_eq!(app.transfer.network, "TRC20");

        // Wrapping backwards lands on the last asset.
        app.transfer_previous_asset();
        assert_eq!(app.transfer.network, "DASH");
    }

    #[test]
    fn field_cycle_covers_every_field() {
        let mut field = TransferField::Currency;
        for _ in 0..5 {
            field = field.next();
        }
        assert_eq!(field, TransferField::Currency);
        assert_eq!(TransferField::Currency.previous(), TransferField::Amount);
    }

    #[test]
    fn history_navigation_is_bounded() {
        let mut app = App::new();
        let mut profile = profile_with(&[]);
        profile.transactions = vec![Default::default(), Default::default()];
        app.set_profile(profile);
        app.show_screen(Screen::History);

        app.navigate_down();
        assert_eq!(app.selected_index, 1);
        app.navigate_down();
        assert_eq!(app.selected_index, 1);
        app.navigate_up();
        app.navigate_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn support_message_is_taken_once() {
        let mut app = App::new();
        app.support_input = "  need help  ".to_string();
        assert_eq!(app.take_support_message().as_deref(), Some("need help"));
        assert!(app.take_support_message().is_none());
    }

    #[test]
    fn notification_expires_after_ttl() {
        let mut app = App::new();
        app.notify(NotificationKind::Success, "done");
        app.tick();
        assert!(app.notification.is_some());

        // Backdate the toast beyond its TTL.
        if let Some(notification) = &mut app.notification {
            notification.shown_at = Instant::now() - NOTIFICATION_TTL - Duration::from_millis(1);
        }
        app.tick();
        assert!(app.notification.is_none());
    }
}
