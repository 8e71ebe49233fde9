//! Typed clients for the backend resources, plus the session manager.
//!
//! ARCHITECTURE
//! ============
//! Every client sends through the shared `HttpPipeline`, so token attachment
//! and failure normalization happen in one place. Clients return the
//! backend's response envelope untouched.

pub mod auth;
pub mod cars;
pub mod catalog;
pub mod session;
