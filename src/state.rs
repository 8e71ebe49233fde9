//! Shared client state.
//!
//! DESIGN
//! ======
//! `ClientState` owns exactly one token store, notification queue, router,
//! pipeline and session, and hands the same instances to every API client.
//! Clone is cheap: all inner fields are `Arc`-wrapped or handles.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::net::pipeline::{AuthStage, ErrorStage, HttpPipeline};
use crate::net::transport::{ReqwestTransport, Transport};
use crate::notify::NotificationQueue;
use crate::routes::{Navigator, Router};
use crate::services::auth::AuthApi;
use crate::services::cars::CarsApi;
use crate::services::catalog::CatalogApi;
use crate::services::session::Session;
use crate::storage::{FileTokenStore, TokenStore};

#[derive(Clone)]
pub struct ClientState {
    pub tokens: Arc<dyn TokenStore>,
    pub notifications: NotificationQueue,
    pub router: Arc<Router>,
    pub pipeline: Arc<HttpPipeline>,
    pub session: Arc<Session>,
    pub cars: CarsApi,
    pub catalog: CatalogApi,
}

impl ClientState {
    /// Wire a client against the real backend with a file-backed token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(config.api_url.clone(), config.timeouts)?;
        let tokens = Arc::new(FileTokenStore::new(config.storage_path.clone()));
        tracing::debug!(api_url = %config.api_url, storage = %config.storage_path.display(), "client configured");
        Ok(Self::with_parts(Arc::new(transport), tokens))
    }

    /// Wire a client over any transport and token store.
    #[must_use]
    pub fn with_parts(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        let notifications = NotificationQueue::new();
        let router = Arc::new(Router::new());
        let navigator: Arc<dyn Navigator> = router.clone();

        let pipeline = Arc::new(HttpPipeline::new(
            transport,
            AuthStage::new(tokens.clone()),
            ErrorStage::new(tokens.clone(), notifications.clone(), navigator.clone()),
        ));
        let session = Arc::new(Session::new(AuthApi::new(pipeline.clone()), tokens.clone(), navigator));

        Self {
            tokens,
            notifications,
            router,
            cars: CarsApi::new(pipeline.clone()),
            catalog: CatalogApi::new(pipeline.clone()),
            pipeline,
            session,
        }
    }
}
