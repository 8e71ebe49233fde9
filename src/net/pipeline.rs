//! Request pipeline: token attachment on the way out, failure normalization
//! on the way back.
//!
//! ARCHITECTURE
//! ============
//! `AuthStage` reads the token straight from the `TokenStore`, never from the
//! session manager, which itself sends requests through this pipeline.
//! `ErrorStage` is the single place raw failures become `ApiError`s.
//!
//! SESSION INVALIDATION
//! ====================
//! Only a 401 from a protected auth-domain endpoint (e.g. `/auth/profile`)
//! means the stored token is stale. A 401 from `/auth/login` or
//! `/auth/register` is a credential rejection, and a 401 elsewhere is an
//! ordinary error; neither touches the session. The sign-out only happens
//! while the stored token is still the one the request carried; a 401 for a
//! token that has since been replaced or cleared is dropped silently.

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

use std::borrow::Cow;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::de::DeserializeOwned;

use super::request::ApiRequest;
use super::transport::{RawResponse, Transport, TransportError};
use super::types::ApiError;
use crate::error::ClientError;
use crate::notify::NotificationQueue;
use crate::routes::{LOGIN_ROUTE, Navigator};
use crate::storage::TokenStore;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

const UNAUTHORIZED: u16 = 401;
const AUTH_PREFIX: &str = "auth";
const PUBLIC_AUTH_ENDPOINTS: [&str; 2] = ["login", "register"];

/// True for paths under `/auth/` other than the login and register endpoints.
#[must_use]
pub fn is_protected_auth_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    if segments.next() != Some(AUTH_PREFIX) {
        return false;
    }
    match segments.next() {
        Some(endpoint) => !PUBLIC_AUTH_ENDPOINTS.contains(&endpoint),
        None => false,
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

pub struct AuthStage {
    tokens: Arc<dyn TokenStore>,
}

impl AuthStage {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    /// Return the request to send: a copy with `Authorization: Bearer <token>`
    /// when a token is stored, otherwise the original untouched.
    pub fn apply<'a>(&self, request: &'a ApiRequest) -> Cow<'a, ApiRequest> {
        let Some(token) = self.tokens.get().filter(|t| !t.is_empty()) else {
            return Cow::Borrowed(request);
        };
        let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) else {
            tracing::warn!("stored token is not a valid header value; sending request without it");
            return Cow::Borrowed(request);
        };
        let mut authorized = request.clone();
        authorized.headers.insert(AUTHORIZATION, value);
        Cow::Owned(authorized)
    }
}

// =============================================================================
// INBOUND
// =============================================================================

pub struct ErrorStage {
    tokens: Arc<dyn TokenStore>,
    notifications: NotificationQueue,
    navigator: Arc<dyn Navigator>,
}

impl ErrorStage {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>, notifications: NotificationQueue, navigator: Arc<dyn Navigator>) -> Self {
        Self { tokens, notifications, navigator }
    }

    /// Pass successes through; turn every failure into an `ApiError`,
    /// applying the matching side effects first.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for transport failures and non-2xx
    /// responses.
    pub fn intercept(
        &self,
        request: &ApiRequest,
        sent_token: Option<&str>,
        outcome: Result<RawResponse, TransportError>,
    ) -> Result<RawResponse, ApiError> {
        let response = match outcome {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => response,
            Err(err) => {
                let api_error = ApiError::synthesized(0, "Unknown Error", err.message);
                tracing::warn!(method = %request.method, path = %request.path, error = %api_error, "request failed before reaching the server");
                self.notifications.error(api_error.display_message());
                return Err(api_error);
            }
        };

        let api_error = ApiError::from_body(response.status, &response.body).unwrap_or_else(|| {
            ApiError::synthesized(
                response.status,
                &response.status_text,
                format!(
                    "Http failure response for {}: {} {}",
                    request.path, response.status, response.status_text
                ),
            )
        });

        if response.status == UNAUTHORIZED && is_protected_auth_path(&request.path) {
            if self.tokens.get().as_deref() != sent_token {
                tracing::debug!(path = %request.path, "401 for a token that is no longer stored; ignoring");
                return Err(api_error);
            }
            tracing::warn!(path = %request.path, "session rejected by server; signing out");
            if let Err(err) = self.tokens.clear() {
                tracing::warn!(error = %err, "failed to clear stored token");
            }
            self.notifications.warning(SESSION_EXPIRED_MESSAGE);
            self.navigator.navigate(LOGIN_ROUTE);
            return Err(api_error);
        }

        tracing::info!(
            method = %request.method,
            path = %request.path,
            status = api_error.status,
            message = %api_error.message,
            "request failed"
        );
        self.notifications.error(api_error.display_message());
        Err(api_error)
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

pub struct HttpPipeline {
    transport: Arc<dyn Transport>,
    auth: AuthStage,
    errors: ErrorStage,
}

impl HttpPipeline {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, auth: AuthStage, errors: ErrorStage) -> Self {
        Self { transport, auth, errors }
    }

    /// Run a request through both stages.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failed request.
    pub async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let outgoing = self.auth.apply(&request).into_owned();
        let sent_token = outgoing.bearer_token().map(str::to_owned);
        tracing::debug!(method = %outgoing.method, path = %outgoing.path, "sending request");
        let outcome = self.transport.send(outgoing).await;
        self.errors.intercept(&request, sent_token.as_deref(), outcome)
    }

    /// Run a request and decode its JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for failed requests and
    /// `ClientError::Decode` when a successful body has the wrong shape.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let path = request.path.clone();
        let response = self.execute(request).await?;
        serde_json::from_slice(&response.body).map_err(|e| {
            tracing::warn!(%path, error = %e, "unexpected response body");
            ClientError::Decode(format!("{path}: {e}"))
        })
    }
}
