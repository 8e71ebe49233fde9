//! Car inventory client.
//!
//! Create and update send multipart bodies: scalar fields become text parts,
//! the photo becomes a file part named `foto`, and absent fields are left out
//! entirely rather than sent as empty strings.

#[cfg(test)]
#[path = "cars_test.rs"]
mod cars_test;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::net::pipeline::HttpPipeline;
use crate::net::request::{ApiRequest, FormPart, encode_segment};
use crate::net::types::{ApiResponse, Car, CarFilters, CarStats, DeletedCar, Paginated};

pub const CARS_PATH: &str = "/cars";
pub const PHOTO_FIELD: &str = "foto";
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

// =============================================================================
// PHOTO UPLOAD
// =============================================================================

/// A validated image ready to be attached as the `foto` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Read and validate an image from disk.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhoto` for unreadable files, unsupported extensions or
    /// files over the size limit.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::InvalidPhoto(format!("{} has no file name", path.display())))?
            .to_owned();
        // Check type and size before reading the whole file.
        mime_for(&file_name)?;
        let len = std::fs::metadata(path)
            .map_err(|e| ClientError::InvalidPhoto(format!("{}: {e}", path.display())))?
            .len();
        if usize::try_from(len).map_or(true, |len| len > MAX_PHOTO_BYTES) {
            return Err(too_large(&file_name));
        }
        let bytes = std::fs::read(path).map_err(|e| ClientError::InvalidPhoto(format!("{}: {e}", path.display())))?;
        Self::from_bytes(file_name, bytes)
    }

    /// Validate an in-memory image. The MIME type comes from the extension.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhoto` for unsupported extensions or oversized data.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ClientError> {
        let file_name = file_name.into();
        let mime = mime_for(&file_name)?.to_owned();
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(too_large(&file_name));
        }
        Ok(Self { file_name, mime, bytes })
    }

    fn into_part(self) -> FormPart {
        FormPart::File { name: PHOTO_FIELD.to_owned(), file_name: self.file_name, mime: self.mime, bytes: self.bytes }
    }
}

fn mime_for(file_name: &str) -> Result<&'static str, ClientError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        _ => Err(ClientError::InvalidPhoto(format!("{file_name}: only JPEG, PNG and WebP images are accepted"))),
    }
}

fn too_large(file_name: &str) -> ClientError {
    ClientError::InvalidPhoto(format!("{file_name}: images must be 5 MB or smaller"))
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCarRequest {
    pub marca: String,
    pub modelo: String,
    pub anio: u32,
    pub precio: f64,
    pub kilometraje: u64,
    pub color: Option<String>,
    pub email: String,
    pub telefono: String,
    #[serde(skip)]
    pub foto: Option<PhotoUpload>,
}

/// Partial update. Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateCarRequest {
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub anio: Option<u32>,
    pub precio: Option<f64>,
    pub kilometraje: Option<u64>,
    pub color: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    #[serde(skip)]
    pub foto: Option<PhotoUpload>,
}

/// Multipart parts for a car body: scalars as text, nulls skipped, photo last.
///
/// # Errors
///
/// Returns `Decode` if the fields do not serialize to a JSON object.
pub fn form_parts<T: Serialize>(fields: &T, photo: Option<PhotoUpload>) -> Result<Vec<FormPart>, ClientError> {
    let mut parts: Vec<FormPart> = scalar_pairs(fields)?
        .into_iter()
        .map(|(name, value)| FormPart::Text { name, value })
        .collect();
    parts.extend(photo.map(PhotoUpload::into_part));
    Ok(parts)
}

/// Query pairs for the car list; absent and empty filters are left out.
///
/// # Errors
///
/// Returns `Decode` if the filters do not serialize to a JSON object.
pub fn filter_query(filters: &CarFilters) -> Result<Vec<(String, String)>, ClientError> {
    Ok(scalar_pairs(filters)?.into_iter().filter(|(_, value)| !value.is_empty()).collect())
}

fn scalar_pairs<T: Serialize>(value: &T) -> Result<Vec<(String, String)>, ClientError> {
    let Value::Object(map) = serde_json::to_value(value).map_err(|e| ClientError::Decode(e.to_string()))? else {
        return Err(ClientError::Decode("expected an object of fields".into()));
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s,
                // f64 Display drops a zero fraction: 15000.0 goes out as "15000".
                Value::Number(n) => n.as_f64().filter(|_| n.is_f64()).map_or_else(|| n.to_string(), |f| f.to_string()),
                other => other.to_string(),
            };
            Some((key, text))
        })
        .collect())
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct CarsApi {
    pipeline: Arc<HttpPipeline>,
}

impl CarsApi {
    #[must_use]
    pub fn new(pipeline: Arc<HttpPipeline>) -> Self {
        Self { pipeline }
    }

    /// `GET /cars` with the given filters.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn list(&self, filters: &CarFilters) -> Result<ApiResponse<Paginated<Car>>, ClientError> {
        let query = filter_query(filters)?;
        self.pipeline.fetch(ApiRequest::get(CARS_PATH).query_pairs(query)).await
    }

    /// `GET /cars/:id`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn get(&self, id: &str) -> Result<ApiResponse<Car>, ClientError> {
        self.pipeline.fetch(ApiRequest::get(car_path(id))).await
    }

    /// `POST /cars` as multipart.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn create(&self, mut car: CreateCarRequest) -> Result<ApiResponse<Car>, ClientError> {
        let photo = car.foto.take();
        let parts = form_parts(&car, photo)?;
        self.pipeline.fetch(ApiRequest::post(CARS_PATH).multipart(parts)).await
    }

    /// `PUT /cars/:id` as multipart.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn update(&self, id: &str, mut car: UpdateCarRequest) -> Result<ApiResponse<Car>, ClientError> {
        let photo = car.foto.take();
        let parts = form_parts(&car, photo)?;
        self.pipeline.fetch(ApiRequest::put(car_path(id)).multipart(parts)).await
    }

    /// `DELETE /cars/:id`. The backend soft-deletes.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn delete(&self, id: &str) -> Result<ApiResponse<DeletedCar>, ClientError> {
        self.pipeline.fetch(ApiRequest::delete(car_path(id))).await
    }

    /// `GET /cars/search?q=`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn search(&self, query: &str) -> Result<ApiResponse<Vec<Car>>, ClientError> {
        let request = ApiRequest::get(format!("{CARS_PATH}/search")).query_pairs(vec![("q".into(), query.to_owned())]);
        self.pipeline.fetch(request).await
    }

    /// `GET /cars/stats`.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error or a decode error.
    pub async fn stats(&self) -> Result<ApiResponse<CarStats>, ClientError> {
        self.pipeline.fetch(ApiRequest::get(format!("{CARS_PATH}/stats"))).await
    }
}

fn car_path(id: &str) -> String {
    format!("{CARS_PATH}/{}", encode_segment(id))
}
