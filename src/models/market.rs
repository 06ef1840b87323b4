// ============================================================================
// Market data: coins and the live price table
// ============================================================================
// Mirrors the CoinGecko /coins/markets response for the fixed asset list the
// backend supports. The PriceTable wraps one polled snapshot; it lives for a
// single poll interval and is replaced wholesale by the next one.
// ============================================================================

use serde::Deserialize;

/// Unit price used for `eur` when the proxy asset is absent from the table.
pub const EUR_FALLBACK_PRICE: f64 = 1.1;

/// Symbol looked up to price `eur` balances (a euro stablecoin).
pub const EUR_PROXY_SYMBOL: &str = "eurc";

/// One coin row from the market-data endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCoin {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub price_change_percentage_1h_in_currency: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_percentage_7d_in_currency: Option<f64>,
    pub price_change_percentage_30d_in_currency: Option<f64>,
    #[serde(default)]
    pub market_cap: f64,
}

impl MarketCoin {
    /// Percentage change for the requested range, 0.0 when the endpoint did
    /// not return that series.
    pub fn change_for(&self, range: ChangeRange) -> f64 {
        let change = match range {
            ChangeRange::H1 => self.price_change_percentage_1h_in_currency,
            ChangeRange::H24 => self.price_change_percentage_24h,
            ChangeRange::W1 => self.price_change_percentage_7d_in_currency,
            ChangeRange::M1 => self.price_change_percentage_30d_in_currency,
        };
        change.unwrap_or(0.0)
    }

    /// Compact market-cap rendering ("$1.23T", "$45.00B", ...).
    pub fn market_cap_display(&self) -> String {
        let cap = self.market_cap;
        if cap >= 1e12 {
            format!("${:.2}T", cap / 1e12)
        } else if cap >= 1e9 {
            format!("${:.2}B", cap / 1e9)
        } else if cap >= 1e6 {
            format!("${:.2}M", cap / 1e6)
        } else if cap >= 1e3 {
            format!("${:.2}K", cap / 1e3)
        } else {
            format!("${:.2}", cap)
        }
    }

    #[cfg(test)]
    pub fn for_test(symbol: &str, price: f64) -> Self {
        Self {
            id: symbol.to_string(),
            name: symbol.to_uppercase(),
            symbol: symbol.to_string(),
            current_price: price,
            price_change_percentage_1h_in_currency: None,
            price_change_percentage_24h: None,
            price_change_percentage_7d_in_currency: None,
            price_change_percentage_30d_in_currency: None,
            market_cap: 0.0,
        }
    }
}

/// Time range selector for the markets table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeRange {
    H1,
    #[default]
    H24,
    W1,
    M1,
}

impl ChangeRange {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeRange::H1 => "1H",
            ChangeRange::H24 => "24H",
            ChangeRange::W1 => "1W",
            ChangeRange::M1 => "1M",
        }
    }

    /// Cycle 1H -> 24H -> 1W -> 1M -> 1H.
    pub fn next(&self) -> Self {
        match self {
            ChangeRange::H1 => ChangeRange::H24,
            ChangeRange::H24 => ChangeRange::W1,
            ChangeRange::W1 => ChangeRange::M1,
            ChangeRange::M1 => ChangeRange::H1,
        }
    }
}

/// One polled snapshot of live prices.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    coins: Vec<MarketCoin>,
}

impl PriceTable {
    pub fn new(coins: Vec<MarketCoin>) -> Self {
        Self { coins }
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn coins(&self) -> &[MarketCoin] {
        &self.coins
    }

    /// USD unit price for one balance-sheet currency code.
    ///
    /// - `usd` is pegged at 1.0 and needs no lookup.
    /// - `eur` resolves through the euro-stablecoin proxy, falling back to a
    ///   fixed 1.1 when the proxy is missing.
    /// - `trc20` and `usdtd` are balance-sheet codes, not asset symbols:
    ///   TRC20 is a network name for USDT, and the DASH card is keyed
    ///   `usdtd`, so both alias to the symbol the provider actually returns.
    /// - Anything else matches by case-insensitive symbol; no match means a
    ///   price of 0.0 (the asset contributes nothing — not an error).
    pub fn unit_price(&self, code: &str) -> f64 {
        let code = code.to_ascii_lowercase();

        if code == "usd" {
            return 1.0;
        }

        if code == "eur" {
            return self
                .find_symbol(EUR_PROXY_SYMBOL)
                .map(|coin| coin.current_price)
                .unwrap_or(EUR_FALLBACK_PRICE);
        }

        let symbol = match code.as_str() {
            "trc20" => "usdt",
            "usdtd" => "dash",
            other => other,
        };
        self.find_symbol(symbol)
            .map(|coin| coin.current_price)
            .unwrap_or(0.0)
    }

    fn find_symbol(&self, symbol: &str) -> Option<&MarketCoin> {
        self.coins
            .iter()
            .find(|coin| coin.symbol.eq_ignore_ascii_case(symbol))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64)]) -> PriceTable {
        PriceTable::new(
            entries
                .iter()
                .map(|&(symbol, price)| MarketCoin::for_test(symbol, price))
                .collect(),
        )
    }

    #[test]
    fn usd_is_pegged_without_lookup() {
        assert_eq!(PriceTable::default().unit_price("usd"), 1.0);
        assert_eq!(table(&[("usdt", 0.99)]).unit_price("USD"), 1.0);
    }

    #[test]
    fn eur_uses_proxy_then_fallback() {
        assert_eq!(table(&[("eurc", 1.08)]).unit_price("eur"), 1.08);
        assert_eq!(table(&[("btc", 65000.0)]).unit_price("eur"), EUR_FALLBACK_PRICE);
    }

    #[test]
    fn trc20_aliases_to_usdt() {
        assert_eq!(table(&[("usdt", 1.0)]).unit_price("trc20"), 1.0);
    }

    #[test]
    fn usdtd_aliases_to_dash() {
        assert_eq!(table(&[("dash", 32.5)]).unit_price("usdtd"), 32.5);
    }

    #[test]
    fn symbol_match_is_case_insensitive() {
        assert_eq!(table(&[("BTC", 65000.0)]).unit_price("btc"), 65000.0);
    }

    #[test]
    fn unknown_symbol_prices_at_zero() {
        assert_eq!(table(&[("btc", 65000.0)]).unit_price("xmr"), 0.0);
    }

    #[test]
    fn change_range_cycles() {
        assert_eq!(ChangeRange::H1.next(), ChangeRange::H24);
        assert_eq!(ChangeRange::M1.next(), ChangeRange::H1);
    }

    #[test]
    fn market_cap_display_scales() {
        let mut coin = MarketCoin::for_test("btc", 65000.0);
        coin.market_cap = 1_280_000_000_000.0;
        assert_eq!(coin.market_cap_display(), "$1.28T");
        coin.market_cap = 4_500_000_000.0;
        assert_eq!(coin.market_cap_display(), "$4.50B");
        coin.market_cap = 750.0;
        assert_eq!(coin.market_cap_display(), "$750.00");
    }

    #[test]
    fn missing_change_series_reads_as_zero() {
        let coin = MarketCoin::for_test("btc", 65000.0);
        assert_eq!(coin.change_for(ChangeRange::W1), 0.0);
    }
}
