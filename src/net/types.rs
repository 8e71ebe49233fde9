//! Wire types shared by the REST clients.
//!
//! Field names follow the backend's JSON (Spanish domain names, camelCase
//! keys); Rust fields are snake_case with serde renames.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Fallback human-readable message for failures without a usable body.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

// =============================================================================
// ENVELOPES
// =============================================================================

/// Envelope wrapping every response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

// =============================================================================
// API ERROR
// =============================================================================

/// Normalized failure surfaced to callers, whatever the transport or server
/// error format was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("request failed with status {status} ({name}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub name: String,
    pub message: String,
    pub custom_message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Some backends send a word here (`"error"`); only numbers are used.
    #[serde(default)]
    status: Option<serde_json::Value>,
    name: Option<String>,
    message: String,
    custom_message: Option<String>,
}

impl ApiError {
    /// Take a server error payload as-is. Returns `None` when the body is not
    /// a JSON object carrying at least a `message`.
    #[must_use]
    pub fn from_body(status: u16, body: &[u8]) -> Option<Self> {
        let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
        Some(Self {
            status: parsed
                .status
                .as_ref()
                .and_then(serde_json::Value::as_u64)
                .and_then(|n| u16::try_from(n).ok())
                .unwrap_or(status),
            name: parsed.name.unwrap_or_default(),
            message: parsed.message,
            custom_message: parsed.custom_message.unwrap_or_default(),
        })
    }

    /// Build an error for a failure with no usable server payload.
    #[must_use]
    pub fn synthesized(status: u16, status_text: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            name: status_text.to_owned(),
            message: message.into(),
            custom_message: DEFAULT_ERROR_MESSAGE.to_owned(),
        }
    }

    /// Text to show the user: `customMessage`, then `message`, then the
    /// default.
    #[must_use]
    pub fn display_message(&self) -> &str {
        if !self.custom_message.is_empty() {
            &self.custom_message
        } else if !self.message.is_empty() {
            &self.message
        } else {
            DEFAULT_ERROR_MESSAGE
        }
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

// =============================================================================
// CARS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(rename = "_id")]
    pub id: String,
    pub marca: String,
    pub modelo: String,
    pub anio: u32,
    pub precio: f64,
    pub kilometraje: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub email: String,
    pub telefono: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto: Option<String>,
    pub fecha_alta: String,
    pub fecha_modificacion: String,
    #[serde(default)]
    pub fecha_eliminacion: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Precio,
    Anio,
    Kilometraje,
    FechaAlta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query filters for the car list. Absent and empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarFilters {
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub anio: Option<u32>,
    pub min_precio: Option<f64>,
    pub max_precio: Option<f64>,
    pub color: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarStats {
    pub total: u64,
    pub deleted: u64,
    pub active: u64,
    pub average_price: f64,
    pub average_km: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCar {
    pub id: String,
    pub fecha_eliminacion: String,
}

// =============================================================================
// CATALOGS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "_id")]
    pub id: String,
    pub marca: String,
    pub modelos: Vec<CatalogModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModel {
    pub nombre: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogList {
    pub catalogs: Vec<Catalog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandsResponse {
    pub marcas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub marca: String,
    pub modelos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearsResponse {
    pub anios: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub message: String,
}
