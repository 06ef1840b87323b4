// ============================================================================
// Balance sheet and USD aggregation
// ============================================================================
// A user's balance arrives from the backend as a mapping of currency code to
// a decimal string (amounts may be negative). The aggregator folds it into a
// single USD figure using the live price table.
//
// The display must never show NaN or crash on partial data: missing prices
// contribute nothing, unparseable amounts count as zero, and an empty price
// table yields an aggregate of exactly 0.0.
// ============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::market::PriceTable;

/// The asset cards shown on the overview, in their canonical order:
/// `(display title, balance-sheet code)`.
pub const ASSET_CARDS: [(&str, &str); 6] = [
    ("EUR", "eur"),
    ("USDT", "trc20"),
    ("BTC", "btc"),
    ("ETH", "eth"),
    ("USD", "usd"),
    ("DASH", "usdtd"),
];

/// Per-currency balances for one user, keyed by lowercase currency code.
///
/// The mapping is replaced wholesale whenever the profile is refetched.
/// Codes the client does not know about are kept (they round-trip through
/// serde) but simply never contribute to the aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet(pub HashMap<String, String>);

impl BalanceSheet {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Parsed amount for one currency code. Missing or unparseable values
    /// count as zero so a malformed backend field can never poison the UI.
    pub fn amount(&self, code: &str) -> f64 {
        self.0
            .get(code)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Total balance in USD across every entry.
    ///
    /// An empty price table means prices have not loaded (or the fetch
    /// failed); the aggregate is defined as 0.0 in that case rather than
    /// "unknown", so the dashboard never renders stale garbage.
    pub fn aggregate_usd(&self, prices: &PriceTable) -> f64 {
        if prices.is_empty() {
            return 0.0;
        }

        let total: f64 = self
            .0
            .iter()
            .map(|(code, raw)| {
                let amount = raw.trim().parse::<f64>().unwrap_or(0.0);
                if amount == 0.0 || !amount.is_finite() {
                    return 0.0;
                }
                amount * prices.unit_price(code)
            })
            .sum();

        if total.is_finite() {
            total
        } else {
            0.0
        }
    }

    /// Asset cards ordered for display: non-zero balances first (highest raw
    /// amount first, negatives included), zero balances last in canonical
    /// order.
    pub fn sorted_cards(&self) -> Vec<AssetCard> {
        let mut cards: Vec<AssetCard> = ASSET_CARDS
            .iter()
            .map(|&(title, code)| AssetCard {
                title,
                code,
                amount: self.amount(code),
            })
            .collect();

        cards.sort_by(|a, b| {
            match (a.amount == 0.0, b.amount == 0.0) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => b
                    .amount
                    .partial_cmp(&a.amount)
                    .unwrap_or(std::cmp::Ordering::Equal),
            }
        });

        cards
    }
}

/// One overview card: a known asset with its parsed balance.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCard {
    pub title: &'static str,
    pub code: &'static str,
    pub amount: f64,
}

impl AssetCard {
    /// USD value of this card, or None while the asset has no known price.
    pub fn usd_value(&self, prices: &PriceTable) -> Option<f64> {
        let price = prices.unit_price(self.code);
        if price == 0.0 {
            return None;
        }
        Some(self.amount * price)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::market::{MarketCoin, PriceTable};

    fn sheet(entries: &[(&str, &str)]) -> BalanceSheet {
        BalanceSheet(
            entries
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn prices(entries: &[(&str, f64)]) -> PriceTable {
        PriceTable::new(
            entries
                .iter()
                .map(|&(symbol, price)| MarketCoin::for_test(symbol, price))
                .collect(),
        )
    }

    #[test]
    fn empty_price_table_aggregates_to_zero() {
        let sheet = sheet(&[("usd", "100"), ("btc", "2")]);
        let total = sheet.aggregate_usd(&PriceTable::default());
        assert_eq!(total, 0.0);
    }

    #[test]
    fn all_zero_or_missing_amounts_aggregate_to_zero() {
        let sheet = sheet(&[("usd", "0"), ("btc", ""), ("eth", "not-a-number")]);
        let total = sheet.aggregate_usd(&prices(&[("btc", 65000.0), ("eth", 3500.0)]));
        assert_eq!(total, 0.0);
    }

    #[test]
    fn usd_plus_btc_example() {
        // 100 USD at fixed price 1.0 plus 0.01 BTC at 65000 = 750.
        let sheet = sheet(&[("usd", "100"), ("btc", "0.01")]);
        let total = sheet.aggregate_usd(&prices(&[("btc", 65000.0)]));
        assert!((total - 750.0).abs() < 1e-9);
    }

    #[test]
    fn trc20_resolves_through_usdt_alias() {
        let sheet = sheet(&[("trc20", "50")]);
        let total = sheet.aggregate_usd(&prices(&[("usdt", 1.0)]));
        assert!((total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn usdtd_resolves_through_dash_alias() {
        let sheet = sheet(&[("usdtd", "10")]);
        let total = sheet.aggregate_usd(&prices(&[("dash", 32.5)]));
        assert!((total - 325.0).abs() < 1e-9);

        // The card resolves too, so the overview never shows "$--" for a
        // priced DASH balance.
        let table = prices(&[("dash", 32.5)]);
        let card = sheet
            .sorted_cards()
            .into_iter()
            .find(|c| c.code == "usdtd")
            .unwrap();
        assert_eq!(card.usd_value(&table), Some(325.0));
    }

    #[test]
    fn eur_falls_back_to_fixed_rate_without_eurc() {
        let sheet = sheet(&[("eur", "10")]);
        // The table is non-empty but has no eurc entry: 10 * 1.1.
        let total = sheet.aggregate_usd(&prices(&[("btc", 65000.0)]));
        assert!((total - 11.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_currency_codes_are_ignored() {
        let sheet = sheet(&[("usd", "100"), ("xmr", "999")]);
        let total = sheet.aggregate_usd(&prices(&[("btc", 65000.0)]));
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn negative_balances_contribute_negatively() {
        let sheet = sheet(&[("usd", "100"), ("btc", "-0.001")]);
        let total = sheet.aggregate_usd(&prices(&[("btc", 65000.0)]));
        assert!((total - 35.0).abs() < 1e-9);
    }

    #[test]
    fn aggregate_is_always_finite() {
        let sheet = sheet(&[("usd", "inf"), ("btc", "NaN")]);
        let total = sheet.aggregate_usd(&prices(&[("btc", 65000.0)]));
        assert!(total.is_finite());
        assert_eq!(total, 0.0);
    }

    #[test]
    fn cards_sort_nonzero_first_descending() {
        let sheet = sheet(&[("usd", "5"), ("btc", "2"), ("eth", "0"), ("trc20", "-3")]);
        let cards = sheet.sorted_cards();
        let order: Vec<&str> = cards.iter().map(|c| c.code).collect();
        // Non-zero amounts descending (5, 2, -3), then the zeros.
        assert_eq!(&order[..3], &["usd", "btc", "trc20"]);
        assert!(order[3..].contains(&"eth"));
        assert!(order[3..].contains(&"eur"));
        assert!(order[3..].contains(&"usdtd"));
    }
}
