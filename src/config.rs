//! Client configuration, read from the environment.

use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("POST_MANAGER_BASE_URL must be set")]
    MissingBaseUrl,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    /// Read configuration from the environment, loading `.env` first if
    /// present. A trailing slash on the base URL is dropped so request
    /// paths can be joined naively.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let base_url = env::var("POST_MANAGER_BASE_URL")
            .map_err(|_| ConfigError::MissingBaseUrl)?
            .trim_end_matches('/')
            .to_string();
        Ok(Self { base_url })
    }

    /// Shared HTTP client for both collaborators. Cookies are kept so the
    /// identity provider's session transport works without this crate
    /// knowing its details.
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .cookie_store(true)
            .user_agent(concat!("post-manager-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client")
    }
}
