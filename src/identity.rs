//! Caller-identity lookup used by the login flow. The backend is injected so
//! tests can substitute canned profiles; the production implementation talks
//! to an internal profile service over HTTP.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::GateError;

/// Profile of a known caller, as returned by the profile service.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
}

#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Look up a customer by their 11-digit identity document number.
    async fn customer_by_document(&self, document: &str) -> Result<Option<Profile>, GateError>;

    /// Look up an employee by email address.
    async fn employee_by_email(&self, email: &str) -> Result<Option<Profile>, GateError>;
}

/// HTTP implementation against the internal profile service.
pub struct HttpIdentityBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpIdentityBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, path: &str) -> Result<Option<Profile>, GateError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::warn!(url, status = %response.status(), "Profile lookup failed");
            return Ok(None);
        }
        Ok(Some(response.json::<Profile>().await?))
    }
}

#[async_trait]
impl IdentityBackend for HttpIdentityBackend {
    async fn customer_by_document(&self, document: &str) -> Result<Option<Profile>, GateError> {
        if document.len() != 11 || !document.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(None);
        }
        self.fetch(&format!("/v1/customers/{document}")).await
    }

    async fn employee_by_email(&self, email: &str) -> Result<Option<Profile>, GateError> {
        if !email.contains('@') {
            return Ok(None);
        }
        self.fetch(&format!("/v1/employees/{email}")).await
    }
}

/// Stand-in used when no profile service is configured: every lookup misses,
/// so login always fails with an explicit warning rather than a panic.
pub struct UnconfiguredBackend;

#[async_trait]
impl IdentityBackend for UnconfiguredBackend {
    async fn customer_by_document(&self, _document: &str) -> Result<Option<Profile>, GateError> {
        tracing::warn!("No identity backend configured; rejecting customer login");
        Ok(None)
    }

    async fn employee_by_email(&self, _email: &str) -> Result<Option<Profile>, GateError> {
        tracing::warn!("No identity backend configured; rejecting employee login");
        Ok(None)
    }
}
