//! Session context: the process-wide session owner and the pure
//! projection from session state to UI affordances.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::auth::model::Session;
use crate::auth::provider::{IdentityProvider, ProviderError};

/// What the page shell may offer the user, derived from the current
/// session. Recomputed whenever the session changes; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Affordances {
    pub can_create: bool,
    pub can_logout: bool,
    pub display_name: Option<String>,
}

/// Pure projection. No session means only the sign-in/sign-up actions
/// are offered; everything mutating stays hidden.
pub fn compute_affordances(session: Option<&Session>) -> Affordances {
    match session {
        Some(session) => Affordances {
            can_create: true,
            can_logout: true,
            display_name: Some(session.user.email.clone()),
        },
        None => Affordances {
            can_create: false,
            can_logout: false,
            display_name: None,
        },
    }
}

/// Single owner of the current session value.
///
/// Components receive this handle explicitly instead of reaching for
/// ambient state; they read `current()` or subscribe for changes.
pub struct SessionProvider {
    provider: Arc<dyn IdentityProvider>,
    tx: watch::Sender<Option<Session>>,
}

impl SessionProvider {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { provider, tx }
    }

    /// Last session value fetched, without touching the network.
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Stream of session changes. Yields the current value first, then
    /// every published change; dropping the stream unsubscribes.
    pub fn subscribe(&self) -> WatchStream<Option<Session>> {
        WatchStream::new(self.tx.subscribe())
    }

    /// Re-fetch the session from the identity provider and publish it to
    /// all subscribers. A fetch failure publishes the unauthenticated
    /// state so no stale session keeps gating the UI open.
    pub async fn refresh(&self) -> Result<Option<Session>, ProviderError> {
        match self.provider.get_session().await {
            Ok(session) => {
                self.tx.send_replace(session.clone());
                Ok(session)
            }
            Err(e) => {
                log::error!("session refresh failed: {}", e);
                self.tx.send_replace(None);
                Err(e)
            }
        }
    }

    /// Sign out at the provider, then publish the unauthenticated state.
    pub async fn sign_out(&self) -> Result<(), ProviderError> {
        self.provider.sign_out().await?;
        self.tx.send_replace(None);
        log::info!("signed out");
        Ok(())
    }
}
