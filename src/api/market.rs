// ============================================================================
// API client: market data (CoinGecko)
// ============================================================================
// Fetches live USD prices for the fixed asset list the backend supports.
// Poll failures are the caller's problem to swallow: the aggregator keeps
// operating on the last table it received.
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument};

use crate::models::MarketCoin;

/// The assets we price, as provider ids. Tether covers the `trc20` code,
/// euro-coin the `eur` proxy.
pub const MARKET_IDS: &str = "tether,bitcoin,ethereum,euro-coin,dash";

/// Hard ceiling on any single request; a hung poll must not wedge the loop.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the current market snapshot.
///
/// # Arguments
/// * `market_url` - full endpoint URL (usually `/coins/markets`)
#[instrument(skip(market_url))]
pub async fn fetch_market_data(market_url: &str) -> Result<Vec<MarketCoin>> {
    debug!(url = %market_url, ids = MARKET_IDS, "Fetching market data");

    let client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent("paydash/0.1")
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(market_url)
        .query(&[
            ("vs_currency", "usd"),
            ("ids", MARKET_IDS),
            ("order", "market_cap_desc"),
            ("per_page", "6"),
            ("page", "1"),
            ("sparkline", "false"),
            ("price_change_percentage", "1h,24h,7d,30d"),
        ])
        .send()
        .await
        .context("Market data request failed")?;

    let status = response.status();
    if !status.is_success() {
        error!(status = %status, "Market data endpoint returned an error");
        anyhow::bail!("Market data endpoint returned HTTP {}", status);
    }

    let coins: Vec<MarketCoin> = response
        .json()
        .await
        .context("Failed to parse market data response")?;

    info!(coins = coins.len(), "Market data fetched");
    Ok(coins)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_ids_cover_every_balance_currency() {
        // usd is pegged and needs no id; everything else must be polled.
        for id in ["tether", "bitcoin", "ethereum", "euro-coin", "dash"] {
            assert!(MARKET_IDS.contains(id));
        }
    }

    #[test]
    fn coin_rows_deserialize_from_provider_shape() {
        let raw = r#"[{
            "id": "bitcoin",
            "name": "Bitcoin",
            "symbol": "btc",
            "current_price": 65000.0,
            "price_change_percentage_1h_in_currency": 0.1,
            "price_change_percentage_24h": -1.2,
            "price_change_percentage_7d_in_currency": null,
            "price_change_percentage_30d_in_currency": 4.5,
            "market_cap": 1280000000000.0
        }]"#;

        let coins: Vec<MarketCoin> = serde_json::from_str(raw).unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].symbol, "btc");
        assert_eq!(coins[0].current_price, 65000.0);
        assert_eq!(coins[0].price_change_percentage_7d_in_currency, None);
    }
}
