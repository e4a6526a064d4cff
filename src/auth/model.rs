use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid");
}

/// Authenticated identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

/// Sign-in input. Kept intact across failed attempts so the user can
/// correct and retry.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Shape check run before the provider is ever called. Verifying the
    /// credentials themselves is the provider's job.
    pub fn check_shape(&self) -> Result<(), AuthError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(AuthError::MalformedEmail);
        }
        Ok(())
    }
}

/// Outcome of a `sign_in` call that reached the provider. A present
/// `error` carries the provider's own failure token.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInOutcome {
    pub error: Option<String>,
}

impl SignInOutcome {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn rejected(token: impl Into<String>) -> Self {
        Self {
            error: Some(token.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("email address is malformed")]
    MalformedEmail,
    #[error("credentials rejected by the identity provider")]
    Rejected,
    #[error("sign-in failed: {0}")]
    Failed(String),
    #[error("a sign-in attempt is already in flight")]
    InFlight,
}

/// Translate a provider failure token into the client's own taxonomy.
///
/// This is the single place that knows the provider's error vocabulary;
/// tokens never travel past it and are never shown to the user.
pub fn map_provider_error(token: &str) -> AuthError {
    match token {
        "CredentialsSignin" | "AccessDenied" | "Verification" => AuthError::Rejected,
        other => AuthError::Failed(format!("provider error token '{}'", other)),
    }
}
