//! Signed-in user state and its lifecycle.
//!
//! DESIGN
//! ======
//! One `Session` per process, shared by `Arc`. The user lives in a `watch`
//! channel so views can observe sign-in changes; the token lives in the
//! `TokenStore`. `bootstrap()` is explicit and nothing happens at
//! construction.
//!
//! A generation counter is bumped on every login, register and logout. A
//! profile response only applies if the generation it started under is still
//! current, so a late reply cannot bring back a session that was signed out
//! in the meantime.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::auth::AuthApi;
use crate::error::ClientError;
use crate::net::types::{ApiError, AuthResponse, LoginRequest, RegisterRequest, User};
use crate::routes::{AuthView, LOGIN_ROUTE, Navigator};
use crate::storage::TokenStore;

const UNAUTHORIZED: u16 = 401;

/// What `bootstrap()` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No stored token; nothing to restore.
    SignedOut,
    /// The stored token was accepted and the user restored.
    Restored(User),
    /// The server rejected the stored token; the session was cleared.
    Invalidated,
    /// The profile could not be loaded for another reason; the token is kept.
    Kept(ApiError),
    /// The session changed while the profile was loading; the reply was dropped.
    Superseded,
}

pub struct Session {
    api: AuthApi,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    user: watch::Sender<Option<User>>,
    generation: AtomicU64,
}

impl Session {
    #[must_use]
    pub fn new(api: AuthApi, tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        let (user, _) = watch::channel(None);
        Self { api, tokens, navigator, user, generation: AtomicU64::new(0) }
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    /// Stored token, read straight from the token store.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    /// Restore the user from a stored token, if there is one.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        if self.tokens.get().is_none() {
            tracing::debug!("no stored token; starting signed out");
            return BootstrapOutcome::SignedOut;
        }
        match self.load_profile().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                BootstrapOutcome::Restored(user)
            }
            Err(ClientError::SessionChanged) => BootstrapOutcome::Superseded,
            Err(ClientError::Api(err)) if err.status == UNAUTHORIZED => BootstrapOutcome::Invalidated,
            Err(ClientError::Api(err)) => {
                tracing::warn!(status = err.status, error = %err, "profile load failed; keeping session");
                BootstrapOutcome::Kept(err)
            }
            Err(other) => {
                tracing::warn!(error = %other, "profile load failed; keeping session");
                BootstrapOutcome::Kept(ApiError::synthesized(0, "Client Error", other.to_string()))
            }
        }
    }

    /// Sign in and remember the returned token.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error unchanged; the session is untouched.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, ClientError> {
        let response = self.api.login(credentials).await?;
        self.establish(response.data)
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error unchanged; the session is untouched.
    pub async fn register(&self, user_data: &RegisterRequest) -> Result<User, ClientError> {
        let response = self.api.register(user_data).await?;
        self.establish(response.data)
    }

    /// Reload the current user from the server.
    ///
    /// # Errors
    ///
    /// Returns the API error; a 401 also signs the user out.
    pub async fn refresh_profile(&self) -> Result<User, ClientError> {
        self.load_profile().await
    }

    /// Forget the token and the user and go to the sign-in screen.
    pub fn logout(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(err) = self.tokens.clear() {
            tracing::warn!(error = %err, "failed to clear stored token");
        }
        let previous = self.user.send_replace(None);
        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "signed out");
        }
        self.navigator.navigate(LOGIN_ROUTE);
    }

    async fn load_profile(&self) -> Result<User, ClientError> {
        let started = self.generation.load(Ordering::SeqCst);
        let result = self.api.profile().await;
        if self.generation.load(Ordering::SeqCst) != started {
            tracing::debug!("session changed during profile load; dropping reply");
            return Err(ClientError::SessionChanged);
        }
        match result {
            Ok(response) => {
                self.user.send_replace(Some(response.data.clone()));
                Ok(response.data)
            }
            Err(ClientError::Api(err)) if err.status == UNAUTHORIZED => {
                tracing::warn!("stored token rejected; signing out");
                self.logout();
                Err(ClientError::Api(err))
            }
            Err(err) => Err(err),
        }
    }

    fn establish(&self, auth: AuthResponse) -> Result<User, ClientError> {
        self.tokens.set(&auth.token)?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.user.send_replace(Some(auth.user.clone()));
        tracing::info!(user_id = %auth.user.id, "signed in");
        Ok(auth.user)
    }
}

impl AuthView for Session {
    fn is_authenticated(&self) -> bool {
        Session::is_authenticated(self)
    }
}
