//! Client core for a car-inventory REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! ```text
//! CLI / caller
//!     │
//!     ▼
//! ClientState ── Session ──┐
//!     │          CarsApi ──┼──► HttpPipeline ──► Transport ──► backend
//!     │       CatalogApi ──┘     │       │
//!     │                     AuthStage  ErrorStage ──► NotificationQueue
//!     │                          │       │        ──► Router (/login)
//!     └──────────────────────► TokenStore (auth_token)
//! ```
//!
//! The pipeline reads the token store directly, never the session, so the
//! session can depend on the pipeline without a cycle.

pub mod config;
pub mod error;
pub mod net;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;
