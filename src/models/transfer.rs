// ============================================================================
// Transfer request, validation, and the five-stage progress pipeline
// ============================================================================
// A "transfer" here is a notification to a human operator, not a ledger
// mutation: the backend effect is a single POST to the mail relay. The
// pipeline wraps that call in five sequential stages so the user sees a
// multi-step flow. Stages 1->2->3 and 4->5 advance on wall-clock timers;
// the 3->4 transition is the one real checkpoint, gated on the mail call
// succeeding. A failed call halts the pipeline at Processing.
// ============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::Result;

// ============================================================================
// Transfer assets
// ============================================================================

/// One currency the transfer form offers, with the indicative figures shown
/// alongside it. `code` is the balance-sheet key; `network` pre-fills the
/// form's network field on selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferAsset {
    pub title: &'static str,
    pub code: &'static str,
    pub network: &'static str,
    /// Indicative USD rate used only for the "≈ $x USD" hint and the mail
    /// body; the authoritative valuation lives server-side.
    pub rate: f64,
    pub processing_time: &'static str,
    pub fee: &'static str,
}

pub const TRANSFER_ASSETS: [TransferAsset; 6] = [
    TransferAsset {
        title: "USDT",
        code: "trc20",
        network: "TRC20",
        rate: 1.0,
        processing_time: "10-30 minutes",
        fee: "1 USDT",
    },
    TransferAsset {
        title: "BTC",
        code: "btc",
        network: "BTC",
        rate: 65000.0,
        processing_time: "30-60 minutes",
        fee: "0.0001 BTC",
    },
    TransferAsset {
        title: "ETH",
        code: "eth",
        network: "ETH",
        rate: 3500.0,
        processing_time: "15-45 minutes",
        fee: "0.002 ETH",
    },
    TransferAsset {
        title: "USD",
        code: "usd",
        network: "SWIFT",
        rate: 1.0,
        processing_time: "1-3 business days",
        fee: "25 USD",
    },
    TransferAsset {
        title: "EUR",
        code: "eur",
        network: "SEPA",
        rate: 1.08,
        processing_time: "1-2 business days",
        fee: "20 EUR",
    },
    TransferAsset {
        title: "DASH",
        code: "usdtd",
        network: "DASH",
        rate: 32.5,
        processing_time: "5-15 minutes",
        fee: "0.01 DASH",
    },
];

pub fn asset_by_title(title: &str) -> Option<&'static TransferAsset> {
    TRANSFER_ASSETS.iter().find(|asset| asset.title == title)
}

// ============================================================================
// Transfer request and validation
// ============================================================================

/// Minimum length for a wallet / destination reference.
pub const MIN_WALLET_LEN: usize = 10;

/// The ephemeral form object the user builds. It has no persisted identity;
/// its only realization is the mail body sent to the operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferRequest {
    pub currency: String,
    pub full_name: String,
    pub wallet: String,
    pub network: String,
    pub amount: String,
}

/// Field-level validation failures, rendered inline next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    CurrencyRequired,
    FullNameRequired,
    WalletRequired,
    WalletTooShort,
    NetworkRequired,
    AmountRequired,
    AmountNotPositive,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self {
            FieldError::CurrencyRequired => "Currency is required",
            FieldError::FullNameRequired => "Full name is required",
            FieldError::WalletRequired => "Wallet address is required",
            FieldError::WalletTooShort => "Enter a valid wallet address",
            FieldError::NetworkRequired => "Network is required",
            FieldError::AmountRequired => "Amount is required",
            FieldError::AmountNotPositive => "Amount must be greater than 0",
        }
    }
}

impl TransferRequest {
    /// Client-side validation. No network call is attempted while this
    /// returns any error.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.currency.trim().is_empty()
            || asset_by_title(self.currency.trim()).is_none()
        {
            errors.push(FieldError::CurrencyRequired);
        }
        if self.full_name.trim().is_empty() {
            errors.push(FieldError::FullNameRequired);
        }
        let wallet = self.wallet.trim();
        if wallet.is_empty() {
            errors.push(FieldError::WalletRequired);
        } else if wallet.chars().count() < MIN_WALLET_LEN {
            errors.push(FieldError::WalletTooShort);
        }
        if self.network.trim().is_empty() {
            errors.push(FieldError::NetworkRequired);
        }
        let amount = self.amount.trim();
        if amount.is_empty() {
            errors.push(FieldError::AmountRequired);
        } else {
            match amount.parse::<f64>() {
                Ok(value) if value > 0.0 && value.is_finite() => {}
                _ => errors.push(FieldError::AmountNotPositive),
            }
        }

        errors
    }

    /// Indicative USD value from the asset's fixed rate, for the hint line
    /// and the mail body.
    pub fn usd_value(&self) -> f64 {
        let rate = asset_by_title(self.currency.trim())
            .map(|asset| asset.rate)
            .unwrap_or(0.0);
        let amount = self.amount.trim().parse::<f64>().unwrap_or(0.0);
        amount * rate
    }

    /// Human-readable mail body — this text is the entire server-side effect
    /// of a transfer.
    pub fn mail_body(&self) -> String {
        format!(
            "Currency: {}\nFull Name: {}\nWallet: {}\nNetwork: {}\nAmount: {}\nPriority: Standard\nUSD Value: ${:.2}\n",
            self.currency, self.full_name, self.wallet, self.network, self.amount,
            self.usd_value(),
        )
    }

    pub fn mail_subject(&self) -> String {
        format!("Transfer - {}", self.currency)
    }
}

// ============================================================================
// Progress stages
// ============================================================================

/// Ordinal stages of the simulated pipeline. `Idle` is the resting state;
/// the five visible stages advance strictly in order with no branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TransferStage {
    #[default]
    Idle,
    Submitted,
    Verification,
    Processing,
    Confirmation,
    Completed,
}

impl TransferStage {
    pub fn ordinal(&self) -> u8 {
        match self {
            TransferStage::Idle => 0,
            TransferStage::Submitted => 1,
            TransferStage::Verification => 2,
            TransferStage::Processing => 3,
            TransferStage::Confirmation => 4,
            TransferStage::Completed => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransferStage::Idle => "Idle",
            TransferStage::Submitted => "Request Submitted",
            TransferStage::Verification => "Verification",
            TransferStage::Processing => "Processing",
            TransferStage::Confirmation => "Confirmation",
            TransferStage::Completed => "Completed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TransferStage::Idle => "",
            TransferStage::Submitted => {
                "Your transfer request has been submitted and is being processed"
            }
            TransferStage::Verification => "Verifying transaction details and security checks",
            TransferStage::Processing => "Transaction is being processed by the network",
            TransferStage::Confirmation => "Waiting for network confirmations",
            TransferStage::Completed => "Transfer has been successfully completed",
        }
    }

    /// Progress fraction for the overlay ring: stage / 5.
    pub fn progress_percent(&self) -> u8 {
        (u16::from(self.ordinal()) * 100 / 5) as u8
    }
}

/// Wall-clock dwell between stage transitions. Defaults match the product
/// behavior; tests inject zero durations.
#[derive(Debug, Clone, Copy)]
pub struct TransferTimings {
    /// Submitted -> Verification.
    pub submitted: Duration,
    /// Verification -> Processing.
    pub verification: Duration,
    /// Mail call resolved -> Confirmation.
    pub confirmation: Duration,
    /// Confirmation -> Completed.
    pub completion: Duration,
    /// Completed -> form reset.
    pub reset: Duration,
}

impl Default for TransferTimings {
    fn default() -> Self {
        Self {
            submitted: Duration::from_secs(2),
            verification: Duration::from_secs(3),
            confirmation: Duration::from_secs(2),
            completion: Duration::from_millis(1500),
            reset: Duration::from_secs(5),
        }
    }
}

impl TransferTimings {
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            submitted: Duration::ZERO,
            verification: Duration::ZERO,
            confirmation: Duration::ZERO,
            completion: Duration::ZERO,
            reset: Duration::ZERO,
        }
    }
}

/// Drives the five stages in order, reporting each transition through
/// `on_stage`. `submit` performs the one real network call; it runs at the
/// Processing stage, and a failure aborts the pipeline there (no later
/// stage is ever reported after an error).
///
/// The reset delay is the caller's concern — the pipeline ends at
/// `Completed`.
pub async fn run_pipeline<F, Fut>(
    timings: TransferTimings,
    mut on_stage: impl FnMut(TransferStage),
    submit: F,
) -> Result<()>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    on_stage(TransferStage::Submitted);
    tokio::time::sleep(timings.submitted).await;

    on_stage(TransferStage::Verification);
    tokio::time::sleep(timings.verification).await;

    on_stage(TransferStage::Processing);
    submit().await?;

    tokio::time::sleep(timings.confirmation).await;
    on_stage(TransferStage::Confirmation);
    tokio::time::sleep(timings.completion).await;

    on_stage(TransferStage::Completed);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> TransferRequest {
        TransferRequest {
            currency: "USDT".to_string(),
            full_name: "Jane Doe".to_string(),
            wallet: "TXkzPm29a41vN7qLrB8".to_string(),
            network: "TRC20".to_string(),
            amount: "150".to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate().is_empty());
    }

    #[test]
    fn short_wallet_is_rejected() {
        let mut req = valid_request();
        req.wallet = "abc123".to_string();
        assert_eq!(req.validate(), vec![FieldError::WalletTooShort]);
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        let mut req = valid_request();
        req.amount = "0".to_string();
        assert_eq!(req.validate(), vec![FieldError::AmountNotPositive]);

        req.amount = "-5".to_string();
        assert_eq!(req.validate(), vec![FieldError::AmountNotPositive]);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let req = TransferRequest::default();
        let errors = req.validate();
        assert!(errors.contains(&FieldError::CurrencyRequired));
        assert!(errors.contains(&FieldError::FullNameRequired));
        assert!(errors.contains(&FieldError::WalletRequired));
        assert!(errors.contains(&FieldError::NetworkRequired));
        assert!(errors.contains(&FieldError::AmountRequired));
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let mut req = valid_request();
        req.currency = "XMR".to_string();
        assert_eq!(req.validate(), vec![FieldError::CurrencyRequired]);
    }

    #[test]
    fn mail_body_carries_all_fields() {
        let req = valid_request();
        let body = req.mail_body();
        assert!(body.contains("Currency: USDT"));
        assert!(body.contains("Full Name: Jane Doe"));
        assert!(body.contains("Wallet: TXkzPm29a41vN7qLrB8"));
        assert!(body.contains("Network: TRC20"));
        assert!(body.contains("Amount: 150"));
        assert!(body.contains("USD Value: $150.00"));
        assert_eq!(req.mail_subject(), "Transfer - USDT");
    }

    #[test]
    fn stage_ordinals_and_progress() {
        assert_eq!(TransferStage::Idle.ordinal(), 0);
        assert_eq!(TransferStage::Completed.ordinal(), 5);
        assert_eq!(TransferStage::Processing.progress_percent(), 60);
        assert_eq!(TransferStage::Completed.progress_percent(), 100);
    }

    #[test]
    fn asset_lookup_fills_network() {
        let asset = asset_by_title("EUR").unwrap();
        assert_eq!(asset.network, "SEPA");
        assert!(asset_by_title("DOGE").is_none());
    }

    #[tokio::test]
    async fn pipeline_advances_strictly_in_order() {
        let mut stages = Vec::new();
        run_pipeline(TransferTimings::instant(), |s| stages.push(s), || async {
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            stages,
            vec![
                TransferStage::Submitted,
                TransferStage::Verification,
                TransferStage::Processing,
                TransferStage::Confirmation,
                TransferStage::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn pipeline_halts_at_processing_on_failure() {
        let mut stages = Vec::new();
        let result = run_pipeline(
            TransferTimings::instant(),
            |s| stages.push(s),
            || async { anyhow::bail!("mail relay unreachable") },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(
            stages,
            vec![
                TransferStage::Submitted,
                TransferStage::Verification,
                TransferStage::Processing,
            ]
        );
    }
}
