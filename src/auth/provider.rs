//! Identity provider collaborator and its HTTP implementation.
//!
//! Token issuance, cookies and password handling all live on the provider's
//! side of this trait; the client only sees sign-in outcomes and sessions.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::model::{Credentials, Session, SignInOutcome};

/// Failure token reported when a rejection response carries no parseable
/// body of its own.
const FALLBACK_REJECTION_TOKEN: &str = "CredentialsSignin";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider returned status {0}")]
    Status(StatusCode),
    #[error("identity provider response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Attempt a credentials sign-in. A rejection is an `Ok` outcome
    /// carrying the provider's error token; `Err` means the call itself
    /// failed.
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignInOutcome, ProviderError>;

    async fn get_session(&self) -> Result<Option<Session>, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;
}

pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
struct RejectionBody {
    error: Option<String>,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignInOutcome, ProviderError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let response = self.client.post(&url).json(credentials).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let token = response
                .json::<RejectionBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| FALLBACK_REJECTION_TOKEN.to_string());
            return Ok(SignInOutcome::rejected(token));
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }
        Ok(SignInOutcome::ok())
    }

    async fn get_session(&self) -> Result<Option<Session>, ProviderError> {
        let url = format!("{}/api/auth/session", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        // The provider reports "no session" as null or an empty object.
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        if value.get("user").is_none() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let url = format!("{}/api/auth/signout", self.base_url);
        let response = self.client.post(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }
        Ok(())
    }
}
