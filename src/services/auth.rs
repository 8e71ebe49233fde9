//! Auth resource calls. State changes live in `session`.

use std::sync::Arc;

use crate::error::ClientError;
use crate::net::pipeline::HttpPipeline;
use crate::net::request::ApiRequest;
use crate::net::types::{ApiResponse, AuthResponse, LoginRequest, RegisterRequest, User};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const PROFILE_PATH: &str = "/auth/profile";

#[derive(Clone)]
pub struct AuthApi {
    pipeline: Arc<HttpPipeline>,
}

impl AuthApi {
    #[must_use]
    pub fn new(pipeline: Arc<HttpPipeline>) -> Self {
        Self { pipeline }
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<AuthResponse>, ClientError> {
        let body = serde_json::to_value(credentials).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.pipeline.fetch(ApiRequest::post(LOGIN_PATH).json(body)).await
    }

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn register(&self, user_data: &RegisterRequest) -> Result<ApiResponse<AuthResponse>, ClientError> {
        let body = serde_json::to_value(user_data).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.pipeline.fetch(ApiRequest::post(REGISTER_PATH).json(body)).await
    }

    /// `GET /auth/profile`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn profile(&self) -> Result<ApiResponse<User>, ClientError> {
        self.pipeline.fetch(ApiRequest::get(PROFILE_PATH)).await
    }
}
