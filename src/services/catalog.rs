//! Brand, model and year lookups.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::sync::Arc;

use crate::error::ClientError;
use crate::net::pipeline::HttpPipeline;
use crate::net::request::{ApiRequest, encode_segment};
use crate::net::types::{ApiResponse, BrandsResponse, CatalogList, InitializeResponse, ModelsResponse, YearsResponse};

pub const CATALOGS_PATH: &str = "/catalogs";

#[derive(Clone)]
pub struct CatalogApi {
    pipeline: Arc<HttpPipeline>,
}

impl CatalogApi {
    #[must_use]
    pub fn new(pipeline: Arc<HttpPipeline>) -> Self {
        Self { pipeline }
    }

    /// `GET /catalogs`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn list(&self) -> Result<ApiResponse<CatalogList>, ClientError> {
        self.pipeline.fetch(ApiRequest::get(CATALOGS_PATH)).await
    }

    /// `GET /catalogs/brands`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn brands(&self) -> Result<ApiResponse<BrandsResponse>, ClientError> {
        self.pipeline.fetch(ApiRequest::get(format!("{CATALOGS_PATH}/brands"))).await
    }

    /// `GET /catalogs/models/:marca`. The brand is sent as one path segment.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn models(&self, marca: &str) -> Result<ApiResponse<ModelsResponse>, ClientError> {
        let path = format!("{CATALOGS_PATH}/models/{}", encode_segment(marca));
        self.pipeline.fetch(ApiRequest::get(path)).await
    }

    /// `GET /catalogs/years`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn years(&self) -> Result<ApiResponse<YearsResponse>, ClientError> {
        self.pipeline.fetch(ApiRequest::get(format!("{CATALOGS_PATH}/years"))).await
    }

    /// `POST /catalogs/initialize` with an empty JSON object.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn initialize(&self) -> Result<ApiResponse<InitializeResponse>, ClientError> {
        let request = ApiRequest::post(format!("{CATALOGS_PATH}/initialize")).json(serde_json::json!({}));
        self.pipeline.fetch(request).await
    }
}
