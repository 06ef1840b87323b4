// ============================================================================
// API client: back-office administration
// ============================================================================
// Conventional resource-per-path REST: list/get/create/update/delete over
// four resources (users, admins, cryptodetails, status), bearer-token
// authorized with the admin token. Consumed by the paydash-admin CLI.
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::models::{BalanceSheet, Transaction};

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// The four administrable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Admins,
    CryptoDetails,
    Status,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Admins => "admins",
            Resource::CryptoDetails => "cryptodetails",
            Resource::Status => "status",
        }
    }
}

// ============================================================================
// Resource records
// ============================================================================

/// A user as the back office sees it (superset of the self-service profile).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub account_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub balance: BalanceSheet,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A back-office operator account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminAccount {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(rename = "lastLogin", default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

/// Metadata for one supported crypto asset (deposit address, colors, icon).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CryptoDetail {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub bg: String,
    #[serde(default)]
    pub image: String,
}

/// A status label (maps transaction status values to display labels/icons).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusRecord {
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

#[derive(Debug, Serialize)]
struct AdminLoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AdminIdentity {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: AdminIdentity,
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent("paydash-admin/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    fn item_url(&self, resource: Resource, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource.path(), id)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn expect_success(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            error!(status = %status, what, "Admin API returned an error");
            anyhow::bail!("{} failed: HTTP {}", what, status);
        }
        Ok(response)
    }

    /// Exchanges operator credentials for an admin token.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AdminLoginResponse> {
        let response = self
            .http
            .post(format!("{}/admins/login", self.base_url))
            .json(&AdminLoginRequest { email, password })
            .send()
            .await
            .context("Admin login request failed")?;

        let response = Self::expect_success(response, "Admin login").await?;
        let body: AdminLoginResponse = response
            .json()
            .await
            .context("Failed to parse admin login response")?;

        info!(role = %body.admin.role, "Admin login succeeded");
        self.token = Some(body.token.clone());
        Ok(body)
    }

    // ------------------------------------------------------------------
    // Generic CRUD. Every typed accessor below goes through these.
    // ------------------------------------------------------------------

    #[instrument(skip(self), fields(resource = resource.path()))]
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        let response = self
            .authorized(self.http.get(self.collection_url(resource)))
            .send()
            .await
            .with_context(|| format!("Listing {} failed", resource.path()))?;

        let response = Self::expect_success(response, "List").await?;
        let items: Vec<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} list", resource.path()))?;

        debug!(count = items.len(), "Resources listed");
        Ok(items)
    }

    #[instrument(skip(self), fields(resource = resource.path()))]
    pub async fn get<T: DeserializeOwned>(&self, resource: Resource, id: &str) -> Result<T> {
        let response = self
            .authorized(self.http.get(self.item_url(resource, id)))
            .send()
            .await
            .with_context(|| format!("Fetching {}/{} failed", resource.path(), id))?;

        let response = Self::expect_success(response, "Get").await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} record", resource.path()))
    }

    #[instrument(skip(self, body), fields(resource = resource.path()))]
    pub async fn create<B, T>(&self, resource: Resource, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .authorized(self.http.post(self.collection_url(resource)).json(body))
            .send()
            .await
            .with_context(|| format!("Creating {} failed", resource.path()))?;

        let response = Self::expect_success(response, "Create").await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse created {} record", resource.path()))
    }

    #[instrument(skip(self, body), fields(resource = resource.path()))]
    pub async fn update<B, T>(&self, resource: Resource, id: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .authorized(self.http.put(self.item_url(resource, id)).json(body))
            .send()
            .await
            .with_context(|| format!("Updating {}/{} failed", resource.path(), id))?;

        let response = Self::expect_success(response, "Update").await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse updated {} record", resource.path()))
    }

    #[instrument(skip(self), fields(resource = resource.path()))]
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<()> {
        let response = self
            .authorized(self.http.delete(self.item_url(resource, id)))
            .send()
            .await
            .with_context(|| format!("Deleting {}/{} failed", resource.path(), id))?;

        Self::expect_success(response, "Delete").await?;
        info!(resource = resource.path(), id, "Resource deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Typed convenience accessors
    // ------------------------------------------------------------------

    pub async fn list_users(&self) -> Result<Vec<AdminUser>> {
        self.list(Resource::Users).await
    }

    pub async fn list_admins(&self) -> Result<Vec<AdminAccount>> {
        self.list(Resource::Admins).await
    }

    pub async fn list_crypto_details(&self) -> Result<Vec<CryptoDetail>> {
        self.list(Resource::CryptoDetails).await
    }

    pub async fn list_status_records(&self) -> Result<Vec<StatusRecord>> {
        self.list(Resource::Status).await
    }

    /// Flips a user's blocked flag through a partial update.
    pub async fn set_user_blocked(&self, id: &str, blocked: bool) -> Result<AdminUser> {
        self.update(Resource::Users, id, &serde_json::json!({ "blocked": blocked }))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_paths_match_backend_routes() {
        assert_eq!(Resource::Users.path(), "users");
        assert_eq!(Resource::Admins.path(), "admins");
        assert_eq!(Resource::CryptoDetails.path(), "cryptodetails");
        assert_eq!(Resource::Status.path(), "status");
    }

    #[test]
    fn urls_follow_resource_per_path_convention() {
        let client = AdminClient::new("http://localhost:5000/api/", None).unwrap();
        assert_eq!(
            client.collection_url(Resource::CryptoDetails),
            "http://localhost:5000/api/cryptodetails"
        );
        assert_eq!(
            client.item_url(Resource::Users, "65f1"),
            "http://localhost:5000/api/users/65f1"
        );
    }

    #[test]
    fn admin_account_maps_backend_field_names() {
        let raw = r#"{"_id": "a1", "name": "Olga", "lastName": "K", "email": "op@example.com",
                      "role": "superadmin", "lastLogin": "2024-11-02T10:00:00Z"}"#;
        let account: AdminAccount = serde_json::from_str(raw).unwrap();
        assert_eq!(account.id, "a1");
        assert_eq!(account.last_name, "K");
        assert_eq!(account.last_login.as_deref(), Some("2024-11-02T10:00:00Z"));
    }

    #[test]
    fn login_response_carries_identity() {
        let raw = r#"{"token": "jwt", "admin": {"id": "a1", "role": "admin"}}"#;
        let body: AdminLoginResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.token, "jwt");
        assert_eq!(body.admin.role, "admin");
    }
}
