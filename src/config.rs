// ============================================================================
// Configuration
// ============================================================================
// Everything comes from environment variables with sensible defaults; the
// bearer token can also live in a file under the user's config directory so
// a login survives across sessions.
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

/// Default REST API base (the payments backend).
pub const DEFAULT_API_BASE: &str = "https://api.international-payments.cc/api";

/// Default market-data endpoint (CoinGecko).
pub const DEFAULT_MARKET_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";

/// Market poll interval: 5 minutes keeps us inside the provider's rate
/// limits.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Runtime configuration for both binaries.
#[derive(Debug, Clone)]
pub struct Config {
    /// Payments backend base URL, without trailing slash.
    pub api_base: String,
    /// Market-data endpoint URL.
    pub market_url: String,
    /// Bearer token for the user API (None until login).
    pub token: Option<String>,
    /// Interval between market polls.
    pub poll_interval: Duration,
}

impl Config {
    /// Builds the configuration from `PAYDASH_*` environment variables,
    /// falling back to the saved token file and built-in defaults.
    pub fn from_env() -> Self {
        let api_base = std::env::var("PAYDASH_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let market_url =
            std::env::var("PAYDASH_MARKET_URL").unwrap_or_else(|_| DEFAULT_MARKET_URL.to_string());

        let token = std::env::var("PAYDASH_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| read_saved_token("token"));

        let poll_interval = std::env::var("PAYDASH_POLL_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        debug!(%api_base, poll_secs = poll_interval.as_secs(), token_present = token.is_some(), "Configuration loaded");

        Self {
            api_base,
            market_url,
            token,
            poll_interval,
        }
    }
}

/// Directory for persisted tokens: `~/.config/paydash` (platform dependent).
fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("paydash"))
}

/// Reads a previously saved token, ignoring any I/O failure — a missing
/// token just means "not logged in".
pub fn read_saved_token(name: &str) -> Option<String> {
    let path = config_dir()?.join(name);
    let token = std::fs::read_to_string(path).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Persists a token under the config directory.
pub fn save_token(name: &str, token: &str) -> Result<()> {
    let dir = config_dir().context("Could not resolve a config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, token)
        .with_context(|| format!("Failed to write token to {}", path.display()))?;
    Ok(())
}

/// Directory for log files: `<data dir>/paydash/logs`, falling back to
/// `./logs` when no platform data directory exists.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("paydash").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_trailing_slash() {
        assert!(!DEFAULT_API_BASE.ends_with('/'));
    }

    #[test]
    fn log_dir_is_always_resolvable() {
        let dir = log_dir();
        assert!(dir.to_string_lossy().contains("logs"));
    }
}
