//! The sign-in form: credential state and the authentication state
//! machine.

use std::sync::Arc;
use std::time::Duration;

use super::model::{map_provider_error, AuthError, Credentials, Session};
use super::provider::{IdentityProvider, ProviderError};
use crate::session::SessionProvider;

const REJECTED_MESSAGE: &str = "Incorrect email or password";
const ERRORED_MESSAGE: &str = "Something went wrong while signing in. Please try again.";
const LANDING_ROUTE: &str = "/";

/// One retry covers the window where the provider has accepted the
/// credentials but the session is not visible to a fetch yet.
const SESSION_RETRY_DELAY: Duration = Duration::from_millis(150);

/// Navigation collaborator. Routing itself is external; the controller
/// only asks for a route change and a refresh of session-dependent UI.
pub trait Navigator: Send + Sync {
    fn push(&self, route: &str);
    fn refresh(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Idle,
    Authenticating,
    Authenticated,
    Rejected,
    Errored,
}

/// Result of a completed authentication attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The provider confirmed the session; navigation has happened.
    SignedIn(Session),
    /// The provider accepted the credentials but no session became
    /// visible. Not an error; no navigation occurs.
    SessionPending,
}

pub struct SignInForm {
    provider: Arc<dyn IdentityProvider>,
    sessions: Arc<SessionProvider>,
    navigator: Arc<dyn Navigator>,
    email: String,
    password: String,
    phase: AuthPhase,
    banner: Option<&'static str>,
}

impl SignInForm {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        sessions: Arc<SessionProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            provider,
            sessions,
            navigator,
            email: String::new(),
            password: String::new(),
            phase: AuthPhase::Idle,
            banner: None,
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// True exactly while the provider call is in flight; the submit
    /// control is disabled for this window.
    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Authenticating
    }

    /// User-facing banner message after a failed attempt, if any.
    pub fn banner(&self) -> Option<&str> {
        self.banner
    }

    /// Run one sign-in attempt. Credentials stay in place on every
    /// failure path so the user can correct and retry.
    pub async fn authenticate(&mut self) -> Result<AuthOutcome, AuthError> {
        if self.is_loading() {
            return Err(AuthError::InFlight);
        }

        let credentials = Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        if let Err(e) = credentials.check_shape() {
            self.banner = Some(match e {
                AuthError::MissingCredentials => "Enter your email and password",
                _ => "Enter a valid email address",
            });
            return Err(e);
        }

        self.banner = None;
        self.phase = AuthPhase::Authenticating;

        let outcome = match self.provider.sign_in(&credentials).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("sign-in call failed: {}", e);
                self.phase = AuthPhase::Errored;
                self.banner = Some(ERRORED_MESSAGE);
                return Err(AuthError::Failed(e.to_string()));
            }
        };

        if let Some(token) = outcome.error {
            let mapped = map_provider_error(&token);
            return match mapped {
                AuthError::Rejected => {
                    log::info!("sign-in rejected for {}", credentials.email);
                    self.phase = AuthPhase::Rejected;
                    self.banner = Some(REJECTED_MESSAGE);
                    Err(AuthError::Rejected)
                }
                other => {
                    log::error!("sign-in failed: {}", other);
                    self.phase = AuthPhase::Errored;
                    self.banner = Some(ERRORED_MESSAGE);
                    Err(other)
                }
            };
        }

        match self.confirm_session().await {
            Ok(Some(session)) => {
                self.phase = AuthPhase::Authenticated;
                log::info!("signed in as {}", session.user.email);
                self.navigator.push(LANDING_ROUTE);
                self.navigator.refresh();
                Ok(AuthOutcome::SignedIn(session))
            }
            Ok(None) => {
                log::warn!(
                    "sign-in for {} succeeded but no session is visible yet",
                    credentials.email
                );
                self.phase = AuthPhase::Idle;
                Ok(AuthOutcome::SessionPending)
            }
            Err(e) => {
                log::error!("session fetch after sign-in failed: {}", e);
                self.phase = AuthPhase::Errored;
                self.banner = Some(ERRORED_MESSAGE);
                Err(AuthError::Failed(e.to_string()))
            }
        }
    }

    /// Fetch the session through the shared provider so subscribers see
    /// the change, retrying once for the cookie-propagation window.
    async fn confirm_session(&self) -> Result<Option<Session>, ProviderError> {
        if let Some(session) = self.sessions.refresh().await? {
            return Ok(Some(session));
        }
        tokio::time::sleep(SESSION_RETRY_DELAY).await;
        self.sessions.refresh().await
    }
}
