// ============================================================================
// User profile and transaction history
// ============================================================================
// Shapes returned by the backend's "who am I" endpoint. The profile is the
// owner of the balance sheet and the transaction list; it is refetched and
// replaced wholesale, never patched client-side.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::balance::BalanceSheet;

/// The authenticated user, as returned by `GET /users/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub account_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub balance: BalanceSheet,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(rename = "detailsEUR", default, skip_serializing_if = "Option::is_none")]
    pub details_eur: Option<EurDetails>,
}

/// Bank details shown for EUR deposits (IBAN-style), configured per user by
/// the back office.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EurDetails {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    // Field name is the backend's own spelling.
    #[serde(rename = "nuberDetails", default)]
    pub number_details: String,
}

/// One ledger entry in the user's history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub sum: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Payment system code ("trc20", "btc", ...).
    #[serde(default)]
    pub ps: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub status: TxStatus,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TxKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    #[default]
    Pending,
    Error,
}

impl TxStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TxStatus::Success => "success",
            TxStatus::Pending => "pending",
            TxStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Deposit,
    Withdrawal,
}

impl Transaction {
    /// Formats the ISO-8601 timestamp for the history table, falling back to
    /// the raw string when the backend sends something unparseable.
    pub fn date_display(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| self.date.clone())
    }

    /// Display name for the payment system, normalized the way the history
    /// view shows it.
    pub fn payment_system_display(&self) -> String {
        match self.ps.to_ascii_lowercase().as_str() {
            "trc20" => "TRC-20".to_string(),
            "usdt" => "USDT".to_string(),
            "usdt-d" | "usdtd" => "USDTD".to_string(),
            other => other.to_uppercase(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_backend_shape() {
        let raw = r#"{
            "account_id": 645434241,
            "email": "user@example.com",
            "balance": {"usd": "100", "btc": "0.5", "trc20": "-20"},
            "blocked": false,
            "detailsEUR": {"label": "Main", "description": "", "nuberDetails": "DE89 3704"},
            "transactions": [{
                "_id": "abc",
                "date": "2024-11-02T10:00:00.000Z",
                "sum": 250.5,
                "ps": "trc20",
                "transaction_id": "tx-1",
                "status": "success",
                "type": "deposit"
            }]
        }"#;

        let profile: UserProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.account_id, 645434241);
        assert_eq!(profile.balance.amount("btc"), 0.5);
        assert_eq!(profile.balance.amount("trc20"), -20.0);
        assert_eq!(profile.transactions.len(), 1);
        assert_eq!(profile.transactions[0].status, TxStatus::Success);
        assert_eq!(profile.transactions[0].kind, Some(TxKind::Deposit));
        assert_eq!(profile.details_eur.unwrap().number_details, "DE89 3704");
    }

    #[test]
    fn missing_fields_default_cleanly() {
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert!(!profile.blocked);
        assert!(profile.transactions.is_empty());
        assert!(profile.details_eur.is_none());
    }

    #[test]
    fn dates_format_for_display() {
        let tx = Transaction {
            date: "2024-11-02T10:30:00.000Z".to_string(),
            ..Default::default()
        };
        assert_eq!(tx.date_display(), "2024-11-02 10:30");

        let tx = Transaction {
            date: "yesterday".to_string(),
            ..Default::default()
        };
        assert_eq!(tx.date_display(), "yesterday");
    }

    #[test]
    fn payment_system_normalization() {
        let tx = Transaction {
            ps: "trc20".to_string(),
            ..Default::default()
        };
        assert_eq!(tx.payment_system_display(), "TRC-20");

        let tx = Transaction {
            ps: "usdt-d".to_string(),
            ..Default::default()
        };
        assert_eq!(tx.payment_system_display(), "USDTD");

        let tx = Transaction {
            ps: "btc".to_string(),
            ..Default::default()
        };
        assert_eq!(tx.payment_system_display(), "BTC");
    }
}
