// ============================================================================
// API client: payments backend (user surface)
// ============================================================================
// Thin REST client over the user-facing endpoints: login, profile, the mail
// relay, and the public deposit/status metadata. All durable state lives on
// the server; this client only fetches and notifies.
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::models::UserProfile;

/// Hard ceiling on any single request so a hung call cannot wedge the
/// transfer pipeline at the Processing stage forever.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Payload for the mail relay. The relay is the sole realization of both
/// transfer requests and support messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MailRequest {
    pub email: String,
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub subject: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// One deposit address row from `GET /cryptodetails/public`.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositAddress {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub address: String,
}

/// One status label row from `GET /status/public`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusLabel {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub img: String,
}

/// Client for the user-facing backend. Cheap to clone; the inner reqwest
/// client pools connections.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent("paydash/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Exchanges credentials for a bearer token and stores it on the client.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<String> {
        let response = self
            .http
            .post(self.url("users/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .context("Login request failed")?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Login rejected");
            anyhow::bail!("Login failed: HTTP {}", status);
        }

        let body: LoginResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        info!("Login succeeded");
        self.token = Some(body.token.clone());
        Ok(body.token)
    }

    /// Fetches the authenticated user's profile (balances, transactions,
    /// blocked flag).
    #[instrument(skip(self))]
    pub async fn fetch_me(&self) -> Result<UserProfile> {
        let response = self
            .authorized(self.http.get(self.url("users/me")))
            .send()
            .await
            .context("Profile request failed")?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Profile fetch rejected");
            anyhow::bail!("Profile fetch failed: HTTP {}", status);
        }

        let profile: UserProfile = response
            .json()
            .await
            .context("Failed to parse profile response")?;

        debug!(account_id = profile.account_id, transactions = profile.transactions.len(), "Profile fetched");
        Ok(profile)
    }

    /// Posts a notification to the mail relay. This is the entire backend
    /// effect of a transfer or a support message — no ledger is touched.
    #[instrument(skip(self, mail), fields(subject = %mail.subject))]
    pub async fn send_mail(&self, mail: &MailRequest) -> Result<()> {
        let response = self
            .authorized(self.http.post(self.url("send-mail")).json(mail))
            .send()
            .await
            .context("Mail relay request failed")?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Mail relay rejected the request");
            anyhow::bail!("Mail relay returned HTTP {}", status);
        }

        info!("Mail relay accepted the request");
        Ok(())
    }

    /// Public deposit addresses (crypto asset metadata managed by the back
    /// office).
    #[instrument(skip(self))]
    pub async fn fetch_deposit_addresses(&self) -> Result<Vec<DepositAddress>> {
        let response = self
            .http
            .get(self.url("cryptodetails/public"))
            .send()
            .await
            .context("Deposit address request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Deposit address fetch failed: HTTP {}", status);
        }

        let addresses: Vec<DepositAddress> = response
            .json()
            .await
            .context("Failed to parse deposit addresses")?;

        debug!(count = addresses.len(), "Deposit addresses fetched");
        Ok(addresses)
    }

    /// Public status labels used to decorate history rows.
    #[instrument(skip(self))]
    pub async fn fetch_status_labels(&self) -> Result<Vec<StatusLabel>> {
        let response = self
            .http
            .get(self.url("status/public"))
            .send()
            .await
            .context("Status label request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Status label fetch failed: HTTP {}", status);
        }

        let labels: Vec<StatusLabel> = response
            .json()
            .await
            .context("Failed to parse status labels")?;

        debug!(count = labels.len(), "Status labels fetched");
        Ok(labels)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_cleanly() {
        let client = BackendClient::new("https://example.test/api/", None).unwrap();
        assert_eq!(client.url("users/me"), "https://example.test/api/users/me");
        assert_eq!(client.url("/send-mail"), "https://example.test/api/send-mail");
    }

    #[test]
    fn mail_payload_uses_backend_field_names() {
        let mail = MailRequest {
            email: "user@example.com".to_string(),
            message: "Currency: USDT".to_string(),
            user_id: "645434241".to_string(),
            subject: "Transfer - USDT".to_string(),
        };

        let json = serde_json::to_value(&mail).unwrap();
        // The relay expects camelCase `userId`; everything else is flat.
        assert_eq!(json["userId"], "645434241");
        assert_eq!(json["email"], "user@example.com");
        assert_eq!(json["subject"], "Transfer - USDT");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn deposit_addresses_accept_mongo_ids() {
        let raw = r#"[{"_id": "65f1", "label": "USDT", "network": "TRC20", "address": "TX123"}]"#;
        let rows: Vec<DepositAddress> = serde_json::from_str(raw).unwrap();
        assert_eq!(rows[0].id, "65f1");
        assert_eq!(rows[0].network, "TRC20");
    }

    #[test]
    fn token_is_tracked() {
        let mut client = BackendClient::new("https://example.test", None).unwrap();
        assert!(!client.has_token());
        client.set_token("abc".to_string());
        assert!(client.has_token());
    }
}
